//! Remote identity of a secret handle.
//!
//! Derives the store's resource paths from a project identifier and a
//! handle. No I/O.

use super::SecretHandle;
use crate::core::constants::LATEST_VERSION;
use crate::error::ValidationError;

/// Resource paths addressing one handle's record in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    project: String,
    remote_name: String,
}

impl RemoteIdentity {
    /// Resolve the identity of `handle` within `project`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the handle is invalid; no path is
    /// derived for an invalid handle.
    pub fn resolve(project: &str, handle: &SecretHandle) -> Result<Self, ValidationError> {
        handle.validate()?;
        Ok(Self {
            project: project.to_string(),
            remote_name: handle.remote_name(),
        })
    }

    /// Project the identity lives in.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Secret identifier within the project.
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    /// `projects/{project}`
    pub fn parent_path(&self) -> String {
        parent_path(&self.project)
    }

    /// `projects/{project}/secrets/{remote_name}`
    pub fn secret_path(&self) -> String {
        format!("{}/secrets/{}", self.parent_path(), self.remote_name)
    }

    /// `projects/{project}/secrets/{remote_name}/versions/{version}`
    pub fn version_path(&self, version: &str) -> String {
        format!("{}/versions/{}", self.secret_path(), version)
    }

    /// Path of the most recently added version.
    pub fn latest_path(&self) -> String {
        self.version_path(LATEST_VERSION)
    }
}

/// Parent path for secrets of a project.
pub fn parent_path(project: &str) -> String {
    format!("projects/{}", project)
}
