//! User domain type.

use locsent_core::{PageId, Role, UserId, Username};

use crate::models::SessionUser;

/// An account as stored in the users database.
///
/// Carries both identifiers: `id` is the application-level ID written into
/// the `UserID` title property, `page_id` is the store's own document ID and
/// the one every other database references. Implements `Debug` manually to
/// keep the password hash out of logs.
#[derive(Clone)]
pub struct User {
    /// Application-level ID (e.g. `user-3fa9c2`).
    pub id: UserId,
    /// Document ID in the store; target of location relations.
    pub page_id: PageId,
    /// Login name, unique across active accounts.
    pub username: Username,
    /// Permission level.
    pub role: Role,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl User {
    /// The minimal identity stored in the session for this user.
    #[must_use]
    pub fn to_session(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            page_id: self.page_id.clone(),
            username: self.username.clone(),
            role: self.role,
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("page_id", &self.page_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: UserId::new("user-3fa9c2"),
            page_id: PageId::new("abc-123"),
            username: Username::parse("alice").unwrap(),
            role: Role::User,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let debug_output = format!("{:?}", test_user());
        assert!(debug_output.contains("alice"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("argon2id"));
    }

    #[test]
    fn test_to_session_carries_identity() {
        let user = test_user();
        let session = user.to_session();
        assert_eq!(session.id, user.id);
        assert_eq!(session.page_id, user.page_id);
        assert_eq!(session.username, user.username);
        assert_eq!(session.role, user.role);
    }
}
