//! Access to the remote user directory.
//!
//! The resolver only depends on the traits in this module; the OCS client is
//! the default implementation used by the binary.

/// OCS-over-HTTP directory client.
mod ocs;

use std::sync::Arc;

use crate::errors::Result;
use crate::types::{Account, UserResponse};

pub use ocs::{OcsApiProvider, OcsApiProviderFactory, OcsDirectoryClient, DEFAULT_BASE_PATH};

/// Looks up user records by username.
///
/// A single instance is shared by all lookups of a batch, so implementations
/// must be safe to call concurrently. Unsuccessful HTTP statuses are reported
/// through [`UserResponse::status`]; `Err` is reserved for failures to reach
/// the directory at all.
pub trait DirectoryClient: Send + Sync {
    fn get_user(&self, username: &str) -> Result<UserResponse>;
}

/// Owns the connection state for one account and hands out its client.
///
/// Dropping the provider releases whatever the connection holds.
pub trait ApiProvider: Send + Sync {
    fn get_api(&self) -> Arc<dyn DirectoryClient>;
}

/// Creates [`ApiProvider`]s for an account and API base path.
pub trait ApiProviderFactory: Send + Sync {
    fn create_api_provider(&self, account: &Account, base_path: &str)
        -> Result<Box<dyn ApiProvider>>;
}
