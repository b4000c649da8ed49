//! Core library components.
//!
//! Handle resolution, remote synchronization, and the collaborators they
//! need (configuration, manifests, payload sources, output safety).

pub mod cancel;
pub mod config;
pub mod constants;
pub mod domain;
pub mod literals;
pub mod manifest;
pub mod payload;
pub mod project;
pub mod safety;
pub mod store;
pub mod sync;
pub mod validation;
