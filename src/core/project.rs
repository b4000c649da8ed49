//! Project identifier discovery.
//!
//! The project is resolved lazily and at most once per [`Context`].

use std::process::{Command, Stdio};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, info};

use crate::core::constants::{GCLOUD_PROJECT_ENVS, PROJECT_ENV};
use crate::error::ProjectError;

/// Source of the project identifier.
pub trait ProjectResolver: Send + Sync {
    /// Discover the project identifier.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError` when no project can be determined.
    fn resolve(&self) -> Result<String, ProjectError>;
}

/// A project identifier known up front.
#[derive(Debug, Clone)]
pub struct FixedProject(pub String);

impl ProjectResolver for FixedProject {
    fn resolve(&self) -> Result<String, ProjectError> {
        non_empty(self.0.clone())
    }
}

/// Discovers the project from the environment or the gcloud CLI.
///
/// Order: `KLOAK_PROJECT`, `GOOGLE_CLOUD_PROJECT`, `CLOUDSDK_CORE_PROJECT`,
/// then `gcloud config list core/project`.
#[derive(Debug, Clone)]
pub struct GcloudProject {
    gcloud: String,
}

#[derive(Deserialize)]
struct GcloudConfigOutput {
    #[serde(default)]
    core: GcloudCore,
}

#[derive(Deserialize, Default)]
struct GcloudCore {
    project: Option<String>,
}

impl GcloudProject {
    pub fn new(gcloud: impl Into<String>) -> Self {
        Self {
            gcloud: gcloud.into(),
        }
    }

    fn query_gcloud(&self) -> Result<String, ProjectError> {
        let bin = which::which(&self.gcloud).map_err(|_| {
            ProjectError::Gcloud(format!(
                "{} not found. Install it from https://cloud.google.com/sdk/docs/install",
                self.gcloud
            ))
        })?;

        debug!(gcloud = %bin.display(), "asking gcloud for the project");
        let output = Command::new(bin)
            .args(["-q", "config", "list", "core/project", "--format=json"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ProjectError::Gcloud(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProjectError::Gcloud(stderr.trim().to_string()));
        }

        parse_gcloud_config(&output.stdout)
    }
}

impl ProjectResolver for GcloudProject {
    fn resolve(&self) -> Result<String, ProjectError> {
        if let Some(project) = project_from_env(|name| std::env::var(name).ok()) {
            debug!("project taken from environment");
            return Ok(project);
        }
        self.query_gcloud()
    }
}

/// First non-empty project variable, in precedence order.
fn project_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    std::iter::once(PROJECT_ENV)
        .chain(GCLOUD_PROJECT_ENVS.iter().copied())
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn parse_gcloud_config(stdout: &[u8]) -> Result<String, ProjectError> {
    let out: GcloudConfigOutput =
        serde_json::from_slice(stdout).map_err(|e| ProjectError::Parse(e.to_string()))?;
    non_empty(out.core.project.unwrap_or_default())
}

fn non_empty(project: String) -> Result<String, ProjectError> {
    let project = project.trim().to_string();
    if project.is_empty() {
        return Err(ProjectError::Unset);
    }
    Ok(project)
}

/// Process context shared by all operations.
///
/// Owns the memoized project identifier: populated on first successful
/// resolution and never invalidated.
pub struct Context {
    resolver: Box<dyn ProjectResolver>,
    project: OnceLock<String>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("project", &self.project.get())
            .finish()
    }
}

impl Context {
    pub fn new(resolver: impl ProjectResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            project: OnceLock::new(),
        }
    }

    /// Context with a fixed project.
    pub fn with_project(project: impl Into<String>) -> Self {
        Self::new(FixedProject(project.into()))
    }

    /// The project identifier, resolving it on first use.
    ///
    /// Failed resolutions are not memoized; the next call tries again.
    pub fn project_id(&self) -> Result<&str, ProjectError> {
        if let Some(project) = self.project.get() {
            return Ok(project);
        }
        let resolved = self.resolver.resolve()?;
        // first writer wins if another thread raced us
        let project = self.project.get_or_init(|| resolved);
        info!(project = %project, "using project");
        Ok(project)
    }
}
