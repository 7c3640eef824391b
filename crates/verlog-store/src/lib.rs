//! Document storage boundary for verlog.
//!
//! The engine is a pure transformation layer; persistence belongs to an
//! external document store reached through the [`DocumentStore`] trait.
//! The trait exposes the minimal surface a read-modify-write cycle needs:
//! load a snapshot, then conditionally replace it keyed on the version read.
//!
//! # Storage Backends
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Single-document atomicity only. No cross-document transactions.
//! 2. Optimistic concurrency: writers present the version they read; a
//!    mismatch is a `VersionConflict`, never a silent overwrite.
//! 3. Physical field names are a collection concern, mapped by
//!    [`CollectionSchema`]; the rest of the system sees one logical model.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod schema;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use schema::CollectionSchema;
pub use traits::DocumentStore;
