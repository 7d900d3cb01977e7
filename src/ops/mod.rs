//! Write-path operations
//!
//! The scoped multi-document writes that keep the model's cross-entity
//! invariants true under mutation: single-winner preferred/primary
//! election, composition supersession with provenance, append-only
//! provenance recording, and idempotent accumulator updates. Every
//! operation commits one atomic batch and retries bounded on conflict.

pub mod accumulators;
pub mod compositions;
pub mod contacts;
pub mod provenance;

pub use accumulators::{
    apply_accumulator_event, rollover_accumulator, AccumulatorEvent, AccumulatorUpdate,
};
pub use compositions::{create_composition, delete_composition, supersede_composition};
pub use contacts::{
    set_preferred_org_contact, set_preferred_person_contact, set_primary_org_identifier,
    set_primary_person_identifier, set_primary_provider_affiliation,
};
pub use provenance::{record_provenance, ProvenanceAgent};
