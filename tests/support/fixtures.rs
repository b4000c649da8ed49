//! Test fixtures and constants.

/// Project used by tests that never reach the network.
pub const TEST_PROJECT: &str = "kloak-test";

/// A gcloud executable name guaranteed not to be on PATH.
pub const MISSING_GCLOUD: &str = "kloak-test-missing-gcloud";

/// Metadata names the subdomain rule accepts.
pub const VALID_NAMES: &[&str] = &["org", "foo-bar-baz-134", "ek24Mp13", "foo123"];

/// Metadata names the subdomain rule rejects.
pub const INVALID_NAMES: &[&str] = &["foo-", "-123", "0bar", ""];

/// A Secret manifest with two keys.
pub const DATABASE_MANIFEST: &str = r#"apiVersion: v1
kind: Secret
metadata:
  name: database
type: Opaque
data:
  password: ""
stringData:
  user: app
"#;

/// A Secret manifest with one key.
pub const API_MANIFEST: &str = r#"apiVersion: v1
kind: Secret
metadata:
  name: api
stringData:
  token: placeholder
"#;
