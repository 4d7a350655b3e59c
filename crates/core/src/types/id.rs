//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use uuid::Uuid;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use locsent_core::define_id;
/// define_id!(PageId);
/// define_id!(ZoneId);
///
/// let page_id = PageId::new("4f2a1b3c-0001");
/// let zone_id = ZoneId::new("4f2a1b3c-0001");
///
/// // These are different types, so this won't compile:
/// // let _: PageId = zone_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs.
//
// `PageId` is the remote store's own identifier for a document; the others
// are application-level identifiers stored inside documents.
define_id!(PageId);
define_id!(UserId);
define_id!(LogId);

impl UserId {
    /// Prefix carried by every generated user ID.
    pub const PREFIX: &'static str = "user-";

    /// Generate a fresh short user ID, e.g. `user-3fa9c2`.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        let short = hex.get(..6).unwrap_or(&hex);
        Self(format!("{}{short}", Self::PREFIX))
    }
}

impl LogId {
    /// Build a log ID from the owning page's ID and a unix timestamp.
    ///
    /// Uses the first dash-separated segment of the page ID, so related
    /// records remain visually groupable in the store's UI.
    #[must_use]
    pub fn from_page_and_timestamp(page_id: &PageId, unix_ts: i64) -> Self {
        let prefix = page_id.as_str().split('-').next().unwrap_or("log");
        Self(format!("{prefix}-{unix_ts}"))
    }
}
