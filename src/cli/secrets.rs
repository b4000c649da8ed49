//! Single-secret commands: exists, set, unveil, path.

use tracing::info;

use crate::cli::{output, synchronizer};
use crate::core::config::Config;
use crate::core::domain::SecretHandle;
use crate::core::payload::PayloadSource;
use crate::core::safety::{self, Stdout};
use crate::error::Result;

/// Print `true` or `false` depending on whether the secret is stored.
pub fn exists(config: &Config, name: &str, key: &str) -> Result<()> {
    let handle = SecretHandle::parse(name, key)?;
    let sync = synchronizer(config);
    let found = sync.exists(&handle, &config.cancel())?;
    output::raw(if found { "true" } else { "false" });
    Ok(())
}

/// Store a value read from a literal, an absolute path, or stdin.
pub fn set(config: &Config, name: &str, key: &str, value: &str) -> Result<()> {
    let handle = SecretHandle::parse(name, key)?;
    let payload = PayloadSource::parse(value)?.read()?;

    info!(handle = %handle, payload_len = payload.len(), "storing secret");
    let sync = synchronizer(config);
    let version = sync.set(&handle, &payload, &config.cancel())?;

    output::success(&format!(
        "stored {} {}",
        output::handle(&handle.to_string()),
        output::dimmed(&format!("(version {})", version.version()))
    ));
    Ok(())
}

/// Write the latest value to stdout, refusing when stdout is a terminal.
pub fn unveil(config: &Config, name: &str, key: &str) -> Result<()> {
    let handle = SecretHandle::parse(name, key)?;
    let mut stdout = Stdout::new();
    // check before fetching so nothing secret is ever held for a terminal
    safety::ensure_not_interactive(&stdout)?;

    let sync = synchronizer(config);
    let payload = sync.unveil(&handle, &config.cancel())?;
    safety::relay(&payload, &mut stdout)
}

/// Print the remote secret path for a handle.
pub fn path(config: &Config, name: &str, key: &str) -> Result<()> {
    let handle = SecretHandle::parse(name, key)?;
    let sync = synchronizer(config);
    let identity = sync.identity(&handle)?;
    output::raw(&identity.secret_path());
    Ok(())
}
