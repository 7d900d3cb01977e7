//! Provenance recording
//!
//! Append-only audit entries keyed by (target_type, target_id). The
//! provenance collection rejects updates at the store layer; entries are
//! never mutated after creation.

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    HealthRecordProvenance, ProvenanceActivity, ProvenanceAgentType, ProvenanceTargetType,
};
use crate::store::MemoryStore;

/// The responsible agent recorded on a provenance entry.
#[derive(Debug, Clone)]
pub struct ProvenanceAgent {
    pub agent_type: ProvenanceAgentType,
    pub agent_id: String,
    pub agent_name: Option<String>,
}

impl ProvenanceAgent {
    pub fn system(agent_id: &str) -> ProvenanceAgent {
        ProvenanceAgent {
            agent_type: ProvenanceAgentType::Enterer,
            agent_id: agent_id.to_string(),
            agent_name: None,
        }
    }
}

/// Build a provenance entry for inclusion in a larger batch.
pub(crate) fn provenance_entry(
    target_type: ProvenanceTargetType,
    target_id: Uuid,
    activity: ProvenanceActivity,
    agent: &ProvenanceAgent,
    reason: Option<String>,
) -> HealthRecordProvenance {
    let now = Utc::now();
    HealthRecordProvenance {
        id: Uuid::new_v4(),
        target_type,
        target_id,
        recorded: now,
        occurred_datetime: Some(now),
        activity,
        activity_code: None,
        reason,
        agent_type: agent.agent_type,
        agent_id: agent.agent_id.clone(),
        agent_name: agent.agent_name.clone(),
        agent_role: None,
        on_behalf_of_id: None,
        location_id: None,
        signature: None,
        signature_type: None,
        policy: None,
        fhir_provenance_id: None,
        created_at: now,
    }
}

/// Record a standalone provenance entry.
pub fn record_provenance(
    store: &MemoryStore,
    target_type: ProvenanceTargetType,
    target_id: Uuid,
    activity: ProvenanceActivity,
    agent: &ProvenanceAgent,
    reason: Option<String>,
) -> Result<Uuid> {
    let entry = provenance_entry(target_type, target_id, activity, agent, reason);
    let entry_id = entry.id;
    store.insert(&entry)?;
    Ok(entry_id)
}
