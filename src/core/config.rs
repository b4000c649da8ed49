//! Configuration file management.
//!
//! Reads and validates the optional `.kloak.toml` configuration file. A
//! missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::cancel::Cancel;
use crate::core::constants;
use crate::core::project::{Context, FixedProject, GcloudProject};
use crate::core::store::GcloudStore;
use crate::error::{ConfigError, Result};

/// On-disk layout of `.kloak.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    kloak: Settings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    project: Option<String>,
    manifests: Option<PathBuf>,
    gcloud: Option<String>,
    timeout_secs: Option<u64>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    project: Option<String>,
    manifests: PathBuf,
    gcloud: String,
    timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: None,
            manifests: PathBuf::from(constants::DEFAULT_MANIFEST_DIR),
            gcloud: constants::DEFAULT_GCLOUD.to_string(),
            timeout: Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Path to the configuration file in the current directory
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load `.kloak.toml` from the current directory, or defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, is malformed, or
    /// holds invalid values.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Ok(Self::from_toml(&contents)?)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(contents: &str) -> std::result::Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        let defaults = Self::default();
        let settings = file.kloak;

        if let Some(project) = &settings.project {
            if project.trim().is_empty() {
                return Err(ConfigError::Invalid("project cannot be empty".into()));
            }
        }
        if let Some(dir) = &settings.manifests {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("manifests cannot be empty".into()));
            }
        }
        if let Some(gcloud) = &settings.gcloud {
            if gcloud.trim().is_empty() {
                return Err(ConfigError::Invalid("gcloud cannot be empty".into()));
            }
        }
        if settings.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(Self {
            project: settings.project.map(|p| p.trim().to_string()),
            manifests: settings.manifests.unwrap_or(defaults.manifests),
            gcloud: settings.gcloud.unwrap_or(defaults.gcloud),
            timeout: settings
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        })
    }

    /// Override the project (e.g. from `--project`).
    pub fn with_project(mut self, project: Option<String>) -> Self {
        if let Some(project) = project.filter(|p| !p.trim().is_empty()) {
            self.project = Some(project.trim().to_string());
        }
        self
    }

    /// Override the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            self.timeout = timeout;
        }
        self
    }

    /// Explicitly configured project, if any.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Directory holding Secret manifests.
    pub fn manifests(&self) -> &Path {
        &self.manifests
    }

    /// gcloud executable.
    pub fn gcloud(&self) -> &str {
        &self.gcloud
    }

    /// Deadline applied to each remote operation.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Process context resolving the configured or discovered project.
    pub fn context(&self) -> Context {
        match &self.project {
            Some(project) => Context::new(FixedProject(project.clone())),
            None => Context::new(GcloudProject::new(self.gcloud.clone())),
        }
    }

    /// Store talking to Secret Manager through gcloud.
    pub fn store(&self) -> GcloudStore {
        GcloudStore::new(self.gcloud.clone())
    }

    /// Fresh cancellation signal carrying the configured deadline.
    ///
    /// One signal covers every remote call of a single operation, so `set`
    /// finishes its lookup, create and append within one deadline.
    pub fn cancel(&self) -> Cancel {
        Cancel::with_timeout(self.timeout)
    }
}
