//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a kloak command isolated from the caller's environment.
    ///
    /// Returns a Command configured with:
    /// - Current directory set to the test project directory
    /// - Project discovery variables cleared
    /// - Colors disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("kloak").expect("failed to find kloak binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("KLOAK_PROJECT");
        cmd.env_remove("GOOGLE_CLOUD_PROJECT");
        cmd.env_remove("CLOUDSDK_CORE_PROJECT");
        cmd.env_remove("KLOAK_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Shortcut for `kloak path`.
    pub fn path(&self, name: &str, key: &str) -> Output {
        self.cmd()
            .args(["path", name, key])
            .output()
            .expect("failed to run kloak path")
    }

    /// Shortcut for `kloak set`.
    pub fn set(&self, name: &str, key: &str, value: &str) -> Output {
        self.cmd()
            .args(["set", "--", name, key, value])
            .output()
            .expect("failed to run kloak set")
    }

    /// Shortcut for `kloak exists`.
    pub fn exists(&self, name: &str, key: &str) -> Output {
        self.cmd()
            .args(["exists", name, key])
            .output()
            .expect("failed to run kloak exists")
    }

    /// Shortcut for `kloak unveil`.
    pub fn unveil(&self, name: &str, key: &str) -> Output {
        self.cmd()
            .args(["unveil", name, key])
            .output()
            .expect("failed to run kloak unveil")
    }

    /// Shortcut for `kloak list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run kloak list")
    }
}
