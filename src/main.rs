//! Kloak - deterministic Kubernetes secret handles backed by a cloud secret store.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kloak::cli::output;
use kloak::cli::{execute, Cli};
use kloak::error::{Error, ProjectError, RemoteError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("KLOAK_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kloak=debug")
        } else {
            EnvFilter::new("kloak=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::CancelledForSafety => Some("pipe or redirect stdout, e.g. `kloak unveil NAME KEY > file`"),
            Error::Project(ProjectError::Unset) => Some("run: gcloud config set project PROJECT_ID"),
            Error::Sync {
                source: RemoteError::PermissionDenied(_),
                ..
            } => Some("run: gcloud auth login"),
            Error::NotFound { .. } => Some("run: kloak set NAME KEY VALUE"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
