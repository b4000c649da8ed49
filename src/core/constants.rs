//! Constants used throughout kloak.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (.kloak.toml).
pub const CONFIG_FILE: &str = ".kloak.toml";

/// Prefix of every remote secret identifier.
pub const REMOTE_NAME_PREFIX: &str = "kloak";

/// Version sentinel resolving to the most recently added version.
pub const LATEST_VERSION: &str = "latest";

/// Default directory holding Secret manifests.
pub const DEFAULT_MANIFEST_DIR: &str = "kubernetes/base/secrets";

/// Default gcloud executable.
pub const DEFAULT_GCLOUD: &str = "gcloud";

/// Default per-call deadline for remote operations, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding the project identifier.
pub const PROJECT_ENV: &str = "KLOAK_PROJECT";

/// Environment variables consulted for the project before asking gcloud.
pub const GCLOUD_PROJECT_ENVS: &[&str] = &["GOOGLE_CLOUD_PROJECT", "CLOUDSDK_CORE_PROJECT"];

/// Labels attached to every secret container kloak creates.
pub const OWNER_LABELS: &[(&str, &str)] = &[("managed-by", "kloak"), ("kloak-schema", "v1")];

/// Placeholder printed instead of a stored value.
pub const FILTERED: &str = "<filtered>";
