//! Literals command.
//!
//! Emits the `key=value` literal sources of every manifest as JSON, for a
//! secret generator to consume. The output contains secret values, so it is
//! refused on a terminal.

use crate::cli::synchronizer;
use crate::core::config::Config;
use crate::core::literals::{literals, SecretLiterals};
use crate::core::manifest;
use crate::core::safety::{self, Stdout};
use crate::error::Result;

pub fn execute(config: &Config) -> Result<()> {
    let mut stdout = Stdout::new();
    safety::ensure_not_interactive(&stdout)?;

    let manifests = manifest::load_dir(config.manifests())?;
    let sync = synchronizer(config);

    let sources = manifests
        .iter()
        .map(|m| literals(&sync, m, &config.cancel()))
        .collect::<Result<Vec<SecretLiterals>>>()?;

    let mut json = zeroize::Zeroizing::new(serde_json::to_vec_pretty(&sources)?);
    json.push(b'\n');
    safety::relay(&json, &mut stdout)
}
