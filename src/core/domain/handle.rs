//! Secret handle type.
//!
//! Points at one value of one Secret manifest; the value itself lives in the
//! remote store.

use sha2::{Digest, Sha256};

use crate::core::constants::REMOTE_NAME_PREFIX;
use crate::core::validation;
use crate::error::ValidationError;

/// Local identity of one secret value: resource name plus key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretHandle {
    metadata_name: String,
    key: String,
}

impl SecretHandle {
    /// Create a handle without validating it.
    ///
    /// Every synchronizer operation validates before touching the store.
    pub fn new(metadata_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            metadata_name: metadata_name.into(),
            key: key.into(),
        }
    }

    /// Create a handle, rejecting invalid names and empty keys.
    pub fn parse(
        metadata_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let handle = Self::new(metadata_name, key);
        handle.validate()?;
        Ok(handle)
    }

    /// Name of the owning Secret resource.
    pub fn metadata_name(&self) -> &str {
        &self.metadata_name
    }

    /// Key within the resource's data map.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Check the name grammar and key presence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_handle(&self.metadata_name, &self.key)
    }

    /// Remote identifier: `kloak_<sha256 hex of "{name} {key}">`.
    ///
    /// Pure; the hex digest always satisfies the store's naming rules no
    /// matter what the key contains.
    pub fn remote_name(&self) -> String {
        let digest = Sha256::digest(self.to_string().as_bytes());
        format!("{}_{:x}", REMOTE_NAME_PREFIX, digest)
    }
}

impl std::fmt::Display for SecretHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.metadata_name, self.key)
    }
}
