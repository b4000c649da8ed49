//! Test support utilities for kloak integration tests.
//!
//! Provides an isolated working directory and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated temp working directory.
///
/// No process-global state is mutated: child processes use `.current_dir()`
/// and explicit environment overrides, so tests can run in parallel.
pub struct Test {
    /// Temporary directory acting as the project root
    pub dir: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment whose config points at a gcloud binary
    /// that does not exist, so every remote call fails fast.
    pub fn offline() -> Self {
        let t = Self::new();
        t.write_config(&format!(
            "[kloak]\nproject = \"{}\"\ngcloud = \"{}\"\ntimeout_secs = 5\n",
            TEST_PROJECT, MISSING_GCLOUD
        ));
        t
    }

    /// Write `.kloak.toml`.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".kloak.toml"), contents)
            .expect("failed to write config");
    }

    /// Write a manifest into the default manifest directory.
    pub fn write_manifest(&self, file: &str, contents: &str) -> PathBuf {
        let dir = self.dir.path().join("kubernetes/base/secrets");
        std::fs::create_dir_all(&dir).expect("failed to create manifest dir");
        let path = dir.join(file);
        std::fs::write(&path, contents).expect("failed to write manifest");
        path
    }
}
