//! Wellnecity EDM — typed schema registry for the enterprise data model
//!
//! This crate reimplements the enterprise data model's collection schemas
//! as a typed Rust layer: a static [`schema::SchemaRegistry`] declaring
//! the structural contract and index surface of every collection, typed
//! entity models that (de)serialize to the exact stored document shape,
//! and the validation the document store itself cannot express —
//! referential integrity, role/detail binding, single-winner flags,
//! composition versioning, subscriber topology, and hierarchy
//! acyclicity.
//!
//! ## Layering
//!
//! - [`schema`] — collection contracts: field types, enums, patterns,
//!   bounds, required fields, and secondary indexes
//! - [`model`] — one typed entity per collection, with tagged unions for
//!   portfolio ownership and accumulator scope
//! - [`validation`] — per-document structural validator
//! - [`lifecycle`] — status state machines
//! - [`integrity`] — cross-entity invariant validator (strict/advisory)
//! - [`store`] — document store with revisioned optimistic concurrency
//!   and all-or-nothing batch commits
//! - [`ops`] — the scoped write operations: winner election,
//!   composition supersession, provenance, accumulator updates
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wellnecity_edm::config::ValidatorConfig;
//! use wellnecity_edm::store::MemoryStore;
//!
//! let store = MemoryStore::open(ValidatorConfig::default()).unwrap();
//! assert!(store.registry().contains("benefit_plan"));
//! ```

pub mod config;
pub mod error;
pub mod integrity;
pub mod lifecycle;
pub mod model;
pub mod ops;
pub mod schema;
pub mod store;
pub mod validation;

pub use config::{IntegrityMode, ValidatorConfig};
pub use error::{
    ConcurrencyConflict, EdmError, LifecycleViolation, RelationshipViolation, Result,
    StoreUnavailable, StructuralError, StructuralViolation,
};
pub use model::Entity;
pub use schema::SchemaRegistry;
pub use store::{CommitOutcome, MemoryStore, WriteBatch};
