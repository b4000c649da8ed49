//! Store-side record types.

use std::collections::BTreeMap;

use crate::core::constants::OWNER_LABELS;
use crate::error::RemoteError;

/// Labels attached to a secret container.
pub type Labels = BTreeMap<String, String>;

/// Fixed label set marking a container as created by kloak.
pub fn owner_labels() -> Labels {
    OWNER_LABELS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A secret container as reported by the store.
///
/// Holds no payload; versions are fetched by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Full resource name, e.g. `projects/123/secrets/kloak_...`
    pub name: String,
    pub labels: Labels,
}

/// Reference to a version created by an append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRef {
    /// Full resource name, e.g. `projects/123/secrets/kloak_.../versions/4`
    pub name: String,
}

impl VersionRef {
    /// Trailing version token of the resource name.
    pub fn version(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Outcome of looking up a secret container.
///
/// Absence is an ordinary answer, kept apart from failures so a transient
/// error can never be read as "not there".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(SecretRecord),
    Absent,
    Failure(RemoteError),
}

impl Lookup {
    /// Translate a raw store result, mapping not-found to `Absent`.
    pub fn from_result(result: Result<SecretRecord, RemoteError>) -> Self {
        match result {
            Ok(record) => Lookup::Found(record),
            Err(e) if e.is_not_found() => Lookup::Absent,
            Err(e) => Lookup::Failure(e),
        }
    }
}
