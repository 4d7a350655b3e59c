//! User repository for store operations.
//!
//! One page per account in the users database. The `Username` rich text
//! property is the login key; the page ID is what location logs relate to.

use locsent_core::{PageId, Role, UserId, Username};
use tracing::instrument;

use super::StoreError;
use crate::models::User;
use crate::notion::{NotionClient, NotionError, Page, QueryRequest, props, rich_text_equals};

const PROP_USER_ID: &str = "UserID";
const PROP_USERNAME: &str = "Username";
const PROP_PASSWORD_HASH: &str = "PasswordHash";
const PROP_ROLE: &str = "Role";

/// Repository for user store operations.
pub struct UserRepository<'a> {
    client: &'a NotionClient,
    database_id: &'a str,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(client: &'a NotionClient, database_id: &'a str) -> Self {
        Self {
            client,
            database_id,
        }
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the query fails.
    /// Returns `StoreError::DataCorruption` if the matched page is missing
    /// required properties.
    pub async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, StoreError> {
        let request = QueryRequest {
            filter: Some(rich_text_equals(PROP_USERNAME, username.as_str())),
            page_size: Some(1),
            ..Default::default()
        };
        let response = self.client.query_database(self.database_id, &request).await?;

        match response.results.first() {
            Some(page) => Ok(Some(parse_user(page)?)),
            None => Ok(None),
        }
    }

    /// Get a user by their page ID.
    ///
    /// Returns `None` for unknown and for archived pages, so stale sessions
    /// belonging to deleted accounts stop resolving.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the fetch fails.
    /// Returns `StoreError::DataCorruption` if the page is missing required
    /// properties.
    pub async fn find_by_page_id(&self, page_id: &PageId) -> Result<Option<User>, StoreError> {
        let page = match self.client.get_page(page_id).await {
            Ok(page) => page,
            Err(NotionError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if page.archived {
            return Ok(None);
        }
        Ok(Some(parse_user(&page)?))
    }

    /// Create a new user account with the `User` role.
    ///
    /// The uniqueness check and the page creation are two separate calls; the
    /// store has no unique constraint, so two concurrent signups for the same
    /// name can both pass the check.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the username is already taken.
    /// Returns `StoreError::Api` if a store call fails.
    #[instrument(skip(self, password_hash), fields(username = %username))]
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        if self.find_by_username(username).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "username '{username}' already exists"
            )));
        }

        let user_id = UserId::generate();
        let mut properties = serde_json::Map::new();
        properties.insert(PROP_USER_ID.to_string(), props::title(user_id.as_str()));
        properties.insert(
            PROP_USERNAME.to_string(),
            props::rich_text(username.as_str()),
        );
        properties.insert(
            PROP_PASSWORD_HASH.to_string(),
            props::rich_text(password_hash),
        );
        properties.insert(
            PROP_ROLE.to_string(),
            props::select(&Role::User.to_string()),
        );

        let page = self.client.create_page(self.database_id, properties).await?;
        parse_user(&page)
    }

    /// Archive a user account (soft delete).
    ///
    /// The user's location logs stay in the locations database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the page does not exist.
    /// Returns `StoreError::Api` for other store failures.
    #[instrument(skip(self), fields(page_id = %page_id))]
    pub async fn archive(&self, page_id: &PageId) -> Result<(), StoreError> {
        match self.client.archive_page(page_id).await {
            Ok(()) => Ok(()),
            Err(NotionError::NotFound(_)) => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// List every active user account, following pagination.
    ///
    /// Pages that fail to parse are logged and skipped rather than failing
    /// the whole listing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if a query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let pages = self
            .client
            .query_database_all(self.database_id, QueryRequest::default())
            .await?;

        let mut users = Vec::with_capacity(pages.len());
        for page in &pages {
            match parse_user(page) {
                Ok(user) => users.push(user),
                Err(e) => {
                    tracing::warn!(page_id = %page.id, "skipping malformed user page: {e}");
                }
            }
        }
        Ok(users)
    }
}

/// Build a domain user from a store page.
fn parse_user(page: &Page) -> Result<User, StoreError> {
    let props = &page.properties;

    let id = props::extract_title(props, PROP_USER_ID).ok_or_else(|| {
        StoreError::DataCorruption(format!("user page {} has no UserID", page.id))
    })?;

    let raw_username = props::extract_rich_text(props, PROP_USERNAME).ok_or_else(|| {
        StoreError::DataCorruption(format!("user page {} has no Username", page.id))
    })?;
    let username = Username::parse(&raw_username).map_err(|e| {
        StoreError::DataCorruption(format!("invalid username in store: {e}"))
    })?;

    let password_hash = props::extract_rich_text(props, PROP_PASSWORD_HASH).ok_or_else(|| {
        StoreError::DataCorruption(format!("user page {} has no PasswordHash", page.id))
    })?;

    // A missing or unknown role demotes rather than failing the row. Admins
    // are provisioned by hand in the store, so typos here must not lock up
    // parsing, and the safe reading is always the unprivileged one.
    let role = props::extract_select(props, PROP_ROLE)
        .and_then(|raw| {
            raw.parse::<Role>()
                .map_err(|e| tracing::warn!(page_id = %page.id, "{e}, defaulting to User"))
                .ok()
        })
        .unwrap_or_default();

    Ok(User {
        id: UserId::new(id),
        page_id: page.id.clone(),
        username,
        role,
        password_hash,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_page(role: serde_json::Value) -> Page {
        serde_json::from_value(json!({
            "id": "page-1",
            "archived": false,
            "properties": {
                "UserID": { "title": [{ "text": { "content": "user-3fa9c2" } }] },
                "Username": { "rich_text": [{ "text": { "content": "alice" } }] },
                "PasswordHash": { "rich_text": [{ "text": { "content": "$argon2id$v=19$test" } }] },
                "Role": { "select": role },
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_user_complete_page() {
        let user = parse_user(&user_page(json!({ "name": "Admin" }))).unwrap();
        assert_eq!(user.id.as_str(), "user-3fa9c2");
        assert_eq!(user.page_id.as_str(), "page-1");
        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.password_hash, "$argon2id$v=19$test");
    }

    #[test]
    fn test_parse_user_unknown_role_defaults_to_user() {
        let user = parse_user(&user_page(json!({ "name": "Moderator" }))).unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_parse_user_missing_role_defaults_to_user() {
        let user = parse_user(&user_page(json!(null))).unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_parse_user_missing_hash_is_corruption() {
        let page: Page = serde_json::from_value(json!({
            "id": "page-1",
            "properties": {
                "UserID": { "title": [{ "text": { "content": "user-3fa9c2" } }] },
                "Username": { "rich_text": [{ "text": { "content": "alice" } }] },
            }
        }))
        .unwrap();

        let err = parse_user(&page).unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(_)));
    }

    #[test]
    fn test_parse_user_invalid_username_is_corruption() {
        let page: Page = serde_json::from_value(json!({
            "id": "page-1",
            "properties": {
                "UserID": { "title": [{ "text": { "content": "user-3fa9c2" } }] },
                "Username": { "rich_text": [{ "text": { "content": "has spaces!" } }] },
                "PasswordHash": { "rich_text": [{ "text": { "content": "$argon2id$v=19$test" } }] },
            }
        }))
        .unwrap();

        let err = parse_user(&page).unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(_)));
    }
}
