//! Versioned embedded-log engine for verlog.
//!
//! This crate is the heart of verlog. It provides:
//! - [`LogEngine`], a pure transformation layer over one document snapshot
//! - single-entry upsert and soft-delete with in-place replacement
//! - batch remove-then-append replacement
//! - fail-closed filtered reads ([`ViewQuery`] → [`ChangeLog`])
//!
//! The engine never touches storage. Persisting its output, and retrying on
//! version conflicts, belongs to the caller.

pub mod engine;
pub mod error;
pub mod view;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod scenarios;

pub use engine::LogEngine;
pub use error::{EngineError, EngineResult};
pub use view::{ChangeLog, ChangeSet, Suppression, ViewQuery};
