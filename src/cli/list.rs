//! List command.
//!
//! Shows every handle declared in the manifests and whether a value is
//! stored for it. Values are never printed.

use tracing::warn;

use crate::cli::{output, synchronizer};
use crate::core::config::Config;
use crate::core::constants::FILTERED;
use crate::core::manifest;
use crate::error::Result;

/// Print `<name> <key> = <filtered> | (none) | ERROR` per handle.
///
/// A failed check on one handle does not stop the listing.
pub fn execute(config: &Config) -> Result<()> {
    let manifests = manifest::load_dir(config.manifests())?;
    let sync = synchronizer(config);

    for handle in manifests.iter().flat_map(|m| m.handles()) {
        let state = match sync.exists(&handle, &config.cancel()) {
            Ok(true) => FILTERED.to_string(),
            Ok(false) => output::dimmed("(none)"),
            Err(e) => {
                warn!(handle = %handle, error = %e, "existence check failed");
                "ERROR".to_string()
            }
        };
        output::raw(&format!("{} = {}", output::handle(&handle.to_string()), state));
    }
    Ok(())
}
