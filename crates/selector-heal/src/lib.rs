//! Selector registry and healing-plan derivation
//!
//! This crate is the data layer of the self-healing action engine:
//! - Immutable per-page-object registry of raw markup snapshots
//! - Candidate derivation by attribute scanning (id, data-test, name,
//!   placeholder, in that priority)
//! - Typed, ordered fallback strategies per action kind
//!
//! It decides *what* to try and in which order; executing the attempts
//! against a live page belongs to the action facade.

pub mod candidates;
pub mod plan;
pub mod registry;
pub mod types;

pub use candidates::*;
pub use plan::*;
pub use registry::*;
pub use types::*;
