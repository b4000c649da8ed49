//! Kloak - deterministic Kubernetes secret handles backed by a cloud secret store.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── list          # Presence of every manifest secret
//! │   ├── secrets       # exists / set / unveil / path
//! │   ├── literals      # key=value sources for a secret generator
//! │   └── output        # Terminal helpers
//! └── core/             # Core library components
//!     ├── domain/       # SecretHandle, RemoteIdentity, records
//!     ├── store/        # RemoteStore trait
//!     │   ├── gcloud    # Secret Manager via the gcloud CLI
//!     │   └── memory    # In-process store
//!     ├── sync          # exists / set / unveil
//!     ├── project       # Project discovery, memoized per Context
//!     ├── safety        # Refuses to print secrets to a terminal
//!     ├── manifest      # Secret manifest loading
//!     ├── payload       # Literal / file / stdin payloads
//!     └── config        # .kloak.toml
//! ```
//!
//! # Example
//!
//! ```
//! use kloak::{Cancel, Context, MemoryStore, SecretHandle, Synchronizer};
//!
//! let sync = Synchronizer::new(MemoryStore::new(), Context::with_project("demo"));
//! let handle = SecretHandle::parse("database", "password").unwrap();
//! let cancel = Cancel::never();
//!
//! assert!(!sync.exists(&handle, &cancel).unwrap());
//! sync.set(&handle, b"hunter2", &cancel).unwrap();
//! assert_eq!(&*sync.unveil(&handle, &cancel).unwrap(), b"hunter2");
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::cancel::Cancel;
pub use crate::core::config::Config;
pub use crate::core::domain::{Lookup, RemoteIdentity, SecretHandle, SecretRecord, VersionRef};
pub use crate::core::manifest::SecretManifest;
pub use crate::core::payload::PayloadSource;
pub use crate::core::project::{Context, FixedProject, GcloudProject, ProjectResolver};
pub use crate::core::safety::{relay, Sink};
pub use crate::core::store::{GcloudStore, MemoryStore, RemoteStore};
pub use crate::core::sync::Synchronizer;
pub use crate::error::{Error, Result};
