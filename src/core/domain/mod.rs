//! Domain types.

mod handle;
pub mod identity;
mod record;

pub use handle::SecretHandle;
pub use identity::RemoteIdentity;
pub use record::{owner_labels, Labels, Lookup, SecretRecord, VersionRef};
