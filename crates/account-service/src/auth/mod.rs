//! Caller authentication and authorization for the account service.
//!
//! Tokens are never verified locally. The raw `Authorization` header value
//! is forwarded to the authentication service (see
//! [`crate::services::identity`]); this module only carries the credential
//! and decides what a resolved caller may touch.

pub mod credential;
pub mod guard;

pub use credential::Credential;
pub use guard::{authorize, require_admin};
