//! Generator literal sources.
//!
//! Builds the `key=value` pairs a secret generator embeds into a deployment
//! descriptor, one set per Secret manifest.

use serde::Serialize;
use tracing::debug;
use zeroize::Zeroize;

use crate::core::cancel::Cancel;
use crate::core::manifest::SecretManifest;
use crate::core::store::RemoteStore;
use crate::core::sync::Synchronizer;
use crate::error::{Error, Result};

/// Literal sources for one Secret.
///
/// The literals hold plaintext values and are wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretLiterals {
    pub name: String,
    pub literals: Vec<String>,
}

impl Zeroize for SecretLiterals {
    fn zeroize(&mut self) {
        self.literals.zeroize();
    }
}

impl Drop for SecretLiterals {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Unveil every key of `manifest` and format it as `key=value`.
///
/// Aborts on the first key that cannot be unveiled or is not UTF-8.
pub fn literals<S: RemoteStore>(
    sync: &Synchronizer<S>,
    manifest: &SecretManifest,
    cancel: &Cancel,
) -> Result<SecretLiterals> {
    let mut out = SecretLiterals {
        name: manifest.name().to_string(),
        literals: Vec::new(),
    };
    for handle in manifest.handles() {
        let payload = sync.unveil(&handle, cancel)?;
        let value = std::str::from_utf8(&payload).map_err(|_| Error::NotUtf8 {
            handle: handle.to_string(),
        })?;
        out.literals.push(format!("{}={}", handle.key(), value));
    }

    debug!(secret = %out.name, count = out.literals.len(), "literal sources built");
    Ok(out)
}
