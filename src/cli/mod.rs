//! Command-line interface.

pub mod list;
pub mod literals;
pub mod output;
pub mod secrets;

use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::config::Config;
use crate::core::store::GcloudStore;
use crate::core::sync::Synchronizer;
use crate::error::Result;

/// Kloak - deterministic Kubernetes secret handles backed by a cloud secret store.
#[derive(Parser)]
#[command(
    name = "kloak",
    about = "Keep Kubernetes Secret values in Google Cloud Secret Manager",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Cloud project holding the secrets (defaults to gcloud's project)
    #[arg(long, global = true, env = "KLOAK_PROJECT")]
    pub project: Option<String>,

    /// Deadline for each secret operation, in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Show every secret declared in the manifests and whether it is stored
    List,

    /// Check whether a secret is stored
    Exists {
        /// Secret resource name (metadata.name)
        name: String,
        /// Key within the secret
        key: String,
    },

    /// Store a secret value as a new version
    ///
    /// VALUE is a raw value, an absolute path to read from, or `-` for stdin.
    /// Values typed on a terminal are not masked; prefer a pipe or a file.
    Set {
        /// Secret resource name (metadata.name)
        name: String,
        /// Key within the secret
        key: String,
        /// Raw value, absolute path, or `-`
        value: String,
    },

    /// Write the latest secret value to stdout (refuses a terminal)
    Unveil {
        /// Secret resource name (metadata.name)
        name: String,
        /// Key within the secret
        key: String,
    },

    /// Print the remote resource path of a secret
    Path {
        /// Secret resource name (metadata.name)
        name: String,
        /// Key within the secret
        key: String,
    },

    /// Print key=value literal sources for every manifest as JSON (refuses a terminal)
    Literals,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    // completions need neither config nor project
    if let Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "kloak", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load()?
        .with_project(cli.project)
        .with_timeout(cli.timeout.map(Duration::from_secs));

    match cli.command {
        List => list::execute(&config),
        Exists { name, key } => secrets::exists(&config, &name, &key),
        Set { name, key, value } => secrets::set(&config, &name, &key, &value),
        Unveil { name, key } => secrets::unveil(&config, &name, &key),
        Path { name, key } => secrets::path(&config, &name, &key),
        Literals => literals::execute(&config),
        Completions { .. } => Ok(()),
    }
}

/// Synchronizer wired to the configured store and project.
pub(crate) fn synchronizer(config: &Config) -> Synchronizer<GcloudStore> {
    Synchronizer::new(config.store(), config.context())
}
