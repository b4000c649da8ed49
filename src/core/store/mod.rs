//! Remote secret store abstraction.
//!
//! The engine talks to the store only through [`RemoteStore`]. Paths are the
//! full resource names produced by
//! [`RemoteIdentity`](crate::core::domain::RemoteIdentity).
//!
//! ## Adding a New Store
//!
//! 1. Implement the `RemoteStore` trait
//! 2. Map the backend's "does not exist" answer to `RemoteError::NotFound`
//!    and a duplicate create to `RemoteError::AlreadyExists`
//! 3. Re-export from this module

mod gcloud;
mod memory;

pub use gcloud::GcloudStore;
pub use memory::{Call, MemoryStore};

use crate::core::cancel::Cancel;
use crate::core::domain::{Labels, Lookup, SecretRecord, VersionRef};
use crate::error::RemoteError;

/// Remote secret store trait.
///
/// Records are append-only: versions are never modified once added.
pub trait RemoteStore {
    /// Look up the secret container at `secret_path`.
    ///
    /// Not-found is reported as `Lookup::Absent`, never as a failure.
    fn get(&self, secret_path: &str, cancel: &Cancel) -> Lookup;

    /// Create an empty secret container `secret_id` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::AlreadyExists` if the container exists.
    fn create(
        &self,
        parent: &str,
        secret_id: &str,
        labels: &Labels,
        cancel: &Cancel,
    ) -> Result<SecretRecord, RemoteError>;

    /// Append `payload` as the newest version of `record`.
    fn add_version(
        &self,
        record: &SecretRecord,
        payload: &[u8],
        cancel: &Cancel,
    ) -> Result<VersionRef, RemoteError>;

    /// Fetch the payload at `version_path`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the secret or version is missing.
    fn access_version(&self, version_path: &str, cancel: &Cancel)
        -> Result<Vec<u8>, RemoteError>;

    /// Store name for logs.
    fn name(&self) -> &'static str;
}
