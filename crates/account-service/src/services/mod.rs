//! Service layer for the account service.
//!
//! # Components
//!
//! - `auth_client` - HTTP client for the authentication service
//! - `identity` - resolves the caller behind a credential
//! - `account_directory` - account reads, saves and deactivation
//! - `traveler_directory` - traveler CRUD scoped to an account

pub mod account_directory;
pub mod auth_client;
pub mod identity;
pub mod traveler_directory;

pub use account_directory::AccountDirectory;
pub use auth_client::{AuthClient, AuthClientTrait, RemoteIdentity};
pub use identity::IdentityResolver;
pub use traveler_directory::TravelerDirectory;
