//! Error types.
//!
//! Every failure the engine can produce is one of these variants. Remote
//! store failures keep their cause; payload bytes never appear in messages.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A store call failed while synchronizing a handle.
    #[error("{op} failed for {handle}: {source}")]
    Sync {
        handle: String,
        op: Operation,
        #[source]
        source: RemoteError,
    },

    /// The handle has no version stored remotely.
    #[error("no secret stored for {handle}")]
    NotFound { handle: String },

    /// Refused to write secret material to an interactive terminal.
    #[error("secret unveiling cancelled: output is a terminal (pipe or redirect it instead)")]
    CancelledForSafety,

    #[error("secret for {handle} is not valid UTF-8")]
    NotUtf8 { handle: String },

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store operation attempted when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Lookup,
    Create,
    AddVersion,
    Access,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Lookup => "lookup",
            Operation::Create => "create",
            Operation::AddVersion => "add version",
            Operation::Access => "access",
        };
        f.write_str(name)
    }
}

/// Caller-input defects, detected before any remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid name for Kubernetes Secret: {0:?}")]
    InvalidName(String),

    #[error("key name cannot be empty")]
    EmptyKey,
}

/// Failures reported by a remote secret store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("{0}")]
    Backend(String),
}

impl RemoteError {
    /// Whether the store reported that the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }
}

/// Project identifier discovery failures.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("failed to invoke gcloud: {0}")]
    Gcloud(String),

    #[error("failed to parse gcloud output: {0}")]
    Parse(String),

    #[error("no project configured (set KLOAK_PROJECT or run `gcloud config set project`)")]
    Unset,
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Manifest loading errors.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("manifest directory not found: {0}")]
    MissingDir(PathBuf),
}

/// Raw payload source errors.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("value should be a string, an absolute path or a single hyphen for stdin")]
    Empty,

    #[error("failed to read {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_names_handle_and_operation() {
        let err = Error::Sync {
            handle: "db password".to_string(),
            op: Operation::AddVersion,
            source: RemoteError::PermissionDenied("caller lacks access".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("add version"));
        assert!(msg.contains("db password"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_remote_not_found_predicate() {
        assert!(RemoteError::NotFound("x".into()).is_not_found());
        assert!(!RemoteError::Unavailable("x".into()).is_not_found());
        assert!(!RemoteError::Cancelled.is_not_found());
    }
}
