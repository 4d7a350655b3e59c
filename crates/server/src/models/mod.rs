//! Domain models for the location service.
//!
//! These are validated domain objects, separate from the raw property maps
//! the document store returns.

pub mod location;
pub mod session;
pub mod user;

pub use location::{LocationRecord, NewLocation};
pub use session::SessionUser;
pub use user::User;
