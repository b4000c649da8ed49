//! In-process secret store.
//!
//! Keeps records in memory with the same append-only semantics as the cloud
//! store. Records every call and can be told to fail specific operations,
//! which makes it the store of choice for tests and embedding.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use super::RemoteStore;
use crate::core::cancel::Cancel;
use crate::core::constants::LATEST_VERSION;
use crate::core::domain::{Labels, Lookup, SecretRecord, VersionRef};
use crate::error::{Operation, RemoteError};

/// A call observed by [`MemoryStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Create { parent: String, secret_id: String },
    AddVersion(String),
    Access(String),
}

impl Call {
    fn operation(&self) -> Operation {
        match self {
            Call::Get(_) => Operation::Lookup,
            Call::Create { .. } => Operation::Create,
            Call::AddVersion(_) => Operation::AddVersion,
            Call::Access(_) => Operation::Access,
        }
    }
}

#[derive(Debug, Default)]
struct Entry {
    labels: Labels,
    versions: Vec<Vec<u8>>,
}

/// Thread-safe in-memory [`RemoteStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Entry>>,
    failures: Mutex<Vec<(Operation, RemoteError)>>,
    journal: Mutex<Vec<Call>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of kind `op` fail with `error`.
    ///
    /// Queued failures for the same operation fire in order.
    pub fn fail_next(&self, op: Operation, error: RemoteError) {
        lock(&self.failures).push((op, error));
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.journal).clone()
    }

    /// Number of versions stored under `secret_path`, if the record exists.
    pub fn version_count(&self, secret_path: &str) -> Option<usize> {
        lock(&self.records).get(secret_path).map(|e| e.versions.len())
    }

    /// Labels of the record at `secret_path`, if it exists.
    pub fn labels(&self, secret_path: &str) -> Option<Labels> {
        lock(&self.records)
            .get(secret_path)
            .map(|e| e.labels.clone())
    }

    /// Journal the call, then apply cancellation and injected failures.
    fn enter(&self, call: Call, cancel: &Cancel) -> Result<(), RemoteError> {
        let op = call.operation();
        trace!(?call, "memory store call");
        lock(&self.journal).push(call);

        cancel.check()?;

        let mut failures = lock(&self.failures);
        if let Some(pos) = failures.iter().position(|(o, _)| *o == op) {
            let (_, error) = failures.remove(pos);
            return Err(error);
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn get(&self, secret_path: &str, cancel: &Cancel) -> Lookup {
        let result = self
            .enter(Call::Get(secret_path.to_string()), cancel)
            .and_then(|()| {
                lock(&self.records)
                    .get(secret_path)
                    .map(|entry| SecretRecord {
                        name: secret_path.to_string(),
                        labels: entry.labels.clone(),
                    })
                    .ok_or_else(|| RemoteError::NotFound(secret_path.to_string()))
            });
        Lookup::from_result(result)
    }

    fn create(
        &self,
        parent: &str,
        secret_id: &str,
        labels: &Labels,
        cancel: &Cancel,
    ) -> Result<SecretRecord, RemoteError> {
        self.enter(
            Call::Create {
                parent: parent.to_string(),
                secret_id: secret_id.to_string(),
            },
            cancel,
        )?;

        let name = format!("{}/secrets/{}", parent, secret_id);
        let mut records = lock(&self.records);
        if records.contains_key(&name) {
            return Err(RemoteError::AlreadyExists(name));
        }
        records.insert(
            name.clone(),
            Entry {
                labels: labels.clone(),
                versions: Vec::new(),
            },
        );

        Ok(SecretRecord {
            name,
            labels: labels.clone(),
        })
    }

    fn add_version(
        &self,
        record: &SecretRecord,
        payload: &[u8],
        cancel: &Cancel,
    ) -> Result<VersionRef, RemoteError> {
        self.enter(Call::AddVersion(record.name.clone()), cancel)?;

        let mut records = lock(&self.records);
        let entry = records
            .get_mut(&record.name)
            .ok_or_else(|| RemoteError::NotFound(record.name.clone()))?;
        entry.versions.push(payload.to_vec());

        Ok(VersionRef {
            name: format!("{}/versions/{}", record.name, entry.versions.len()),
        })
    }

    fn access_version(
        &self,
        version_path: &str,
        cancel: &Cancel,
    ) -> Result<Vec<u8>, RemoteError> {
        self.enter(Call::Access(version_path.to_string()), cancel)?;

        let (secret_path, version) = version_path
            .rsplit_once("/versions/")
            .ok_or_else(|| RemoteError::Malformed(format!("not a version path: {version_path}")))?;

        let records = lock(&self.records);
        let entry = records
            .get(secret_path)
            .ok_or_else(|| RemoteError::NotFound(secret_path.to_string()))?;

        let index = if version == LATEST_VERSION {
            entry.versions.len().checked_sub(1)
        } else {
            let n: usize = version
                .parse()
                .map_err(|_| RemoteError::Malformed(format!("invalid version: {version}")))?;
            n.checked_sub(1)
        };

        index
            .and_then(|i| entry.versions.get(i))
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(version_path.to_string()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
