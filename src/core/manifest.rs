//! Secret manifest loading.
//!
//! Reads Kubernetes Secret manifests and enumerates their keys as
//! [`SecretHandle`]s. Values in the manifests are ignored; only key presence
//! matters.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::core::domain::SecretHandle;
use crate::error::ManifestError;

/// One Secret declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretManifest {
    name: String,
    keys: BTreeSet<String>,
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    kind: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
    data: Option<BTreeMap<String, serde_yaml::Value>>,
    #[serde(rename = "stringData")]
    string_data: Option<BTreeMap<String, serde_yaml::Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    name: String,
}

impl SecretManifest {
    pub fn new(name: impl Into<String>, keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().collect(),
            path: PathBuf::new(),
        }
    }

    /// `metadata.name` of the Secret.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys of `data` and `stringData`, sorted and deduplicated.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// File the manifest was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One handle per key.
    pub fn handles(&self) -> Vec<SecretHandle> {
        self.keys
            .iter()
            .map(|key| SecretHandle::new(self.name.clone(), key.clone()))
            .collect()
    }
}

/// Parse every Secret document in `contents`.
///
/// Documents of another `kind` are skipped; a document without `kind` is
/// read as a Secret.
pub fn parse_str(contents: &str, path: &Path) -> Result<Vec<SecretManifest>, ManifestError> {
    let parse_err = |source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut manifests = Vec::new();
    for document in serde_yaml::Deserializer::from_str(contents) {
        let value = serde_yaml::Value::deserialize(document).map_err(parse_err)?;
        if value.is_null() {
            continue;
        }
        let raw: RawManifest = serde_yaml::from_value(value).map_err(parse_err)?;
        if raw.kind.as_deref().is_some_and(|kind| kind != "Secret") {
            trace!(path = %path.display(), kind = ?raw.kind, "skipping non-Secret document");
            continue;
        }

        let keys = raw
            .data
            .into_iter()
            .chain(raw.string_data)
            .flat_map(BTreeMap::into_keys)
            .collect();

        manifests.push(SecretManifest {
            name: raw.metadata.name,
            keys,
            path: path.to_path_buf(),
        });
    }
    Ok(manifests)
}

/// Load Secret manifests from every `*.yaml` / `*.yml` file in `dir`.
///
/// Files are read in name order.
pub fn load_dir(dir: &Path) -> Result<Vec<SecretManifest>, ManifestError> {
    if !dir.is_dir() {
        return Err(ManifestError::MissingDir(dir.to_path_buf()));
    }

    let read_err = |source| ManifestError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(read_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yaml") | Some("yml")
                )
        })
        .collect();
    paths.sort();

    let mut manifests = Vec::new();
    for path in paths {
        let contents = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        manifests.extend(parse_str(&contents, &path)?);
    }

    debug!(dir = %dir.display(), count = manifests.len(), "manifests loaded");
    Ok(manifests)
}
