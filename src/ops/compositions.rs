//! Composition versioning
//!
//! Create, supersede, and soft-delete health record compositions.
//! Superseding writes one atomic batch: the new version (n+1, current,
//! ACTIVE, chained via preceding_version_id), the prior version flipped
//! to SUPERSEDED/not-current, and the provenance entry. The chain
//! invariant — exactly one current version, at the highest version
//! number — is re-checked by the integrity pass inside the same commit.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::provenance::{provenance_entry, ProvenanceAgent};
use crate::error::{EdmError, Result};
use crate::model::{
    CompositionStatus, Entity, HealthRecordComposition, ProvenanceActivity, ProvenanceTargetType,
};
use crate::store::retry::with_retries;
use crate::store::{MemoryStore, WriteBatch};

/// Insert version 1 of a new logical composition, recording CREATE
/// provenance.
pub fn create_composition(
    store: &MemoryStore,
    mut composition: HealthRecordComposition,
    agent: &ProvenanceAgent,
) -> Result<Uuid> {
    composition.version_number = 1;
    composition.preceding_version_id = None;
    composition.is_current = true;
    composition.status = CompositionStatus::Active;

    let entry = provenance_entry(
        ProvenanceTargetType::HealthRecordComposition,
        composition.id,
        ProvenanceActivity::Create,
        agent,
        None,
    );
    let batch = WriteBatch::new().insert(&composition)?.insert(&entry)?;
    store.commit(batch)?;
    info!(composition_id = %composition.id, "created composition");
    Ok(composition.id)
}

/// Replace the current version of a composition chain with a new one.
///
/// `replacement` carries the new clinical content; its versioning fields
/// are overwritten here. Returns the new version's id.
pub fn supersede_composition(
    store: &MemoryStore,
    current_id: Uuid,
    replacement: HealthRecordComposition,
    agent: &ProvenanceAgent,
) -> Result<Uuid> {
    with_retries(store.config(), "supersede_composition", || {
        let Some((mut current, revision)) =
            store.get::<HealthRecordComposition>(current_id)?
        else {
            return Err(EdmError::InvalidOperation {
                operation: "supersede_composition".into(),
                reason: format!("composition {current_id} not found"),
            });
        };
        if !current.is_current || current.status != CompositionStatus::Active {
            return Err(EdmError::InvalidOperation {
                operation: "supersede_composition".into(),
                reason: format!(
                    "composition {current_id} is not the active current version (status {}, is_current {})",
                    current.status, current.is_current
                ),
            });
        }

        let now = Utc::now();
        let mut new_version = replacement.clone();
        if new_version.id == current_id {
            new_version.id = Uuid::new_v4();
        }
        new_version.member_id = current.member_id;
        new_version.employer_id = current.employer_id;
        new_version.version_number = current.version_number + 1;
        new_version.preceding_version_id = Some(current_id);
        new_version.is_current = true;
        new_version.status = CompositionStatus::Active;
        new_version.created_at = now;
        new_version.updated_at = now;

        current.is_current = false;
        current.status = CompositionStatus::Superseded;
        current.touch(now);

        let entry = provenance_entry(
            ProvenanceTargetType::HealthRecordComposition,
            new_version.id,
            ProvenanceActivity::Update,
            agent,
            Some(format!(
                "superseded version {} of composition chain",
                current.version_number
            )),
        );

        let batch = WriteBatch::new()
            .update(&current, revision)?
            .insert(&new_version)?
            .insert(&entry)?;
        store.commit(batch)?;
        info!(
            chain_head = %new_version.id,
            version = new_version.version_number,
            "superseded composition"
        );
        Ok(new_version.id)
    })
}

/// Soft-delete the current version of a chain (status DELETED); the
/// record stays queryable and remains the chain's current version.
pub fn delete_composition(
    store: &MemoryStore,
    composition_id: Uuid,
    agent: &ProvenanceAgent,
) -> Result<()> {
    with_retries(store.config(), "delete_composition", || {
        let Some((mut composition, revision)) =
            store.get::<HealthRecordComposition>(composition_id)?
        else {
            return Err(EdmError::InvalidOperation {
                operation: "delete_composition".into(),
                reason: format!("composition {composition_id} not found"),
            });
        };
        composition.status = CompositionStatus::Deleted;
        composition.touch(Utc::now());

        let entry = provenance_entry(
            ProvenanceTargetType::HealthRecordComposition,
            composition_id,
            ProvenanceActivity::Delete,
            agent,
            None,
        );
        let batch = WriteBatch::new()
            .update(&composition, revision)?
            .insert(&entry)?;
        store.commit(batch)?;
        Ok(())
    })
}
