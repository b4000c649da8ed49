//! Remote secret synchronization.
//!
//! Reconciles one [`SecretHandle`] against a [`RemoteStore`]: existence
//! checks, create-if-absent followed by an unconditional append, and
//! retrieval of the latest version.

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::cancel::Cancel;
use crate::core::domain::{owner_labels, Lookup, RemoteIdentity, SecretHandle, SecretRecord, VersionRef};
use crate::core::project::Context;
use crate::core::store::RemoteStore;
use crate::error::{Error, Operation, RemoteError, Result};

/// Synchronizes secret handles with a remote store.
///
/// Holds no secret state of its own. At most one synchronization per
/// handle may be in flight; callers must serialize work on the same handle.
#[derive(Debug)]
pub struct Synchronizer<S> {
    store: S,
    context: Context,
}

impl<S: RemoteStore> Synchronizer<S> {
    pub fn new(store: S, context: Context) -> Self {
        Self { store, context }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The process context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Validate `handle` and derive its remote identity.
    ///
    /// Validation runs before the project is resolved, so a bad handle never
    /// triggers any external call.
    pub fn identity(&self, handle: &SecretHandle) -> Result<RemoteIdentity> {
        handle.validate()?;
        let project = self.context.project_id()?;
        Ok(RemoteIdentity::resolve(project, handle)?)
    }

    /// Check whether a record exists for `handle`.
    ///
    /// Absence is `Ok(false)`. Any other store failure is an error, never
    /// treated as absence.
    pub fn exists(&self, handle: &SecretHandle, cancel: &Cancel) -> Result<bool> {
        let identity = self.identity(handle)?;
        match self.store.get(&identity.secret_path(), cancel) {
            Lookup::Found(_) => Ok(true),
            Lookup::Absent => Ok(false),
            Lookup::Failure(source) => Err(sync_error(handle, Operation::Lookup, source)),
        }
    }

    /// Store `payload` as the newest version for `handle`.
    ///
    /// Creates the record when absent, then appends. Every call adds a
    /// version, even when the payload equals the current one.
    pub fn set(&self, handle: &SecretHandle, payload: &[u8], cancel: &Cancel) -> Result<VersionRef> {
        let identity = self.identity(handle)?;
        let record = self.ensure_record(handle, &identity, cancel)?;

        info!(handle = %handle, store = self.store.name(), "adding secret version");
        let version = self
            .store
            .add_version(&record, payload, cancel)
            .map_err(|source| sync_error(handle, Operation::AddVersion, source))?;

        debug!(version = %version.name, payload_len = payload.len(), "secret version added");
        Ok(version)
    }

    /// Fetch the latest payload stored for `handle`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if nothing was ever stored for the handle.
    pub fn unveil(&self, handle: &SecretHandle, cancel: &Cancel) -> Result<Zeroizing<Vec<u8>>> {
        let identity = self.identity(handle)?;
        match self.store.access_version(&identity.latest_path(), cancel) {
            Ok(payload) => {
                debug!(handle = %handle, payload_len = payload.len(), "secret unveiled");
                Ok(Zeroizing::new(payload))
            }
            Err(e) if e.is_not_found() => Err(Error::NotFound {
                handle: handle.to_string(),
            }),
            Err(source) => Err(sync_error(handle, Operation::Access, source)),
        }
    }

    /// Look up the record, creating it when absent.
    ///
    /// A create that loses a race to another writer answers "already
    /// exists"; the record is then looked up again instead of retrying
    /// create.
    fn ensure_record(
        &self,
        handle: &SecretHandle,
        identity: &RemoteIdentity,
        cancel: &Cancel,
    ) -> Result<SecretRecord> {
        let secret_path = identity.secret_path();
        match self.store.get(&secret_path, cancel) {
            Lookup::Found(record) => return Ok(record),
            Lookup::Failure(source) => return Err(sync_error(handle, Operation::Lookup, source)),
            Lookup::Absent => {}
        }

        info!(handle = %handle, parent = %identity.parent_path(), "no secret matching handle; creating");
        let created = self.store.create(
            &identity.parent_path(),
            identity.remote_name(),
            &owner_labels(),
            cancel,
        );

        match created {
            Ok(record) => Ok(record),
            Err(RemoteError::AlreadyExists(_)) => {
                warn!(handle = %handle, "secret created concurrently; looking it up again");
                match self.store.get(&secret_path, cancel) {
                    Lookup::Found(record) => Ok(record),
                    Lookup::Absent => Err(sync_error(
                        handle,
                        Operation::Lookup,
                        RemoteError::NotFound(secret_path),
                    )),
                    Lookup::Failure(source) => Err(sync_error(handle, Operation::Lookup, source)),
                }
            }
            Err(source) => Err(sync_error(handle, Operation::Create, source)),
        }
    }
}

fn sync_error(handle: &SecretHandle, op: Operation, source: RemoteError) -> Error {
    Error::Sync {
        handle: handle.to_string(),
        op,
        source,
    }
}
