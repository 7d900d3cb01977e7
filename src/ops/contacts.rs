//! Preferred/primary single-winner resolution
//!
//! Setting `is_preferred` (contacts) or `is_primary` (identifiers,
//! affiliations) on one record clears the flag on every sibling sharing
//! the same parent and type — last write wins. The election is one
//! atomic batch carrying the read revisions, so there is no observable
//! moment with zero or multiple winners; concurrent elections collide on
//! revisions and retry.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::{EdmError, Result};
use crate::store::retry::with_retries;
use crate::store::{MemoryStore, WriteBatch};

/// Mark an org contact preferred within its (org, contact_type) scope.
pub fn set_preferred_org_contact(store: &MemoryStore, contact_id: Uuid) -> Result<()> {
    elect_winner(
        store,
        "org_contact",
        contact_id,
        "is_preferred",
        "org_id",
        Some("contact_type"),
    )
}

/// Mark a person contact preferred within its (person, contact_type)
/// scope.
pub fn set_preferred_person_contact(store: &MemoryStore, contact_id: Uuid) -> Result<()> {
    elect_winner(
        store,
        "person_contact",
        contact_id,
        "is_preferred",
        "person_id",
        Some("contact_type"),
    )
}

/// Mark an org identifier primary within its (org, identifier_type)
/// scope.
pub fn set_primary_org_identifier(store: &MemoryStore, identifier_id: Uuid) -> Result<()> {
    elect_winner(
        store,
        "org_identifier",
        identifier_id,
        "is_primary",
        "org_id",
        Some("identifier_type"),
    )
}

/// Mark a person identifier primary within its (person, identifier_type)
/// scope.
pub fn set_primary_person_identifier(store: &MemoryStore, identifier_id: Uuid) -> Result<()> {
    elect_winner(
        store,
        "person_identifier",
        identifier_id,
        "is_primary",
        "person_id",
        Some("identifier_type"),
    )
}

/// Mark a provider affiliation as the provider's primary one.
pub fn set_primary_provider_affiliation(store: &MemoryStore, affiliation_id: Uuid) -> Result<()> {
    elect_winner(
        store,
        "provider_affiliation",
        affiliation_id,
        "is_primary",
        "provider_id",
        None,
    )
}

fn field_uuid(document: &Value, field: &str) -> Option<Uuid> {
    document
        .get(field)
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

/// Flip the winner flag to one record and clear it from its siblings in
/// a single batch.
fn elect_winner(
    store: &MemoryStore,
    collection: &str,
    winner_id: Uuid,
    flag: &str,
    parent_field: &str,
    discriminator: Option<&str>,
) -> Result<()> {
    with_retries(store.config(), "elect_winner", || {
        let Some(winner) = store.get_document(collection, winner_id)? else {
            return Err(EdmError::InvalidOperation {
                operation: "elect_winner".into(),
                reason: format!("'{collection}' record {winner_id} not found"),
            });
        };
        let Some(parent_id) = field_uuid(&winner.document, parent_field) else {
            return Err(EdmError::InvalidOperation {
                operation: "elect_winner".into(),
                reason: format!("'{collection}' record {winner_id} has no {parent_field}"),
            });
        };
        let kind = discriminator
            .and_then(|d| winner.document.get(d))
            .and_then(Value::as_str)
            .map(str::to_string);

        // The whole sibling scope rides in one batch, unchanged rows
        // included: their revision guards serialize concurrent elections
        // that would otherwise commit disjoint row sets and leave two
        // winners.
        let now = json!(Utc::now());
        let mut scope = Vec::new();
        let mut changes = 0usize;
        for stored in store.scan_documents(collection)? {
            if field_uuid(&stored.document, parent_field) != Some(parent_id) {
                continue;
            }
            if let (Some(d), Some(kind)) = (discriminator, &kind) {
                if stored.document.get(d).and_then(Value::as_str) != Some(kind.as_str()) {
                    continue;
                }
            }
            let Some(id) = field_uuid(&stored.document, "_id") else {
                continue;
            };
            let flagged = stored.document.get(flag).and_then(Value::as_bool) == Some(true);
            let should_flag = id == winner_id;
            let mut document = stored.document.clone();
            if flagged != should_flag {
                document[flag] = json!(should_flag);
                document["updated_at"] = now.clone();
                changes += 1;
            }
            scope.push((id, document, stored.revision));
        }

        if changes == 0 {
            // Already the sole winner.
            return Ok(());
        }
        let mut batch = WriteBatch::new();
        for (id, document, revision) in scope {
            batch = batch.update_document(collection, id, document, revision);
        }
        store.commit(batch)?;
        info!(collection, %winner_id, changes, "elected single winner");
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::model::{ContactType, Org, OrgContact, OrgContactLabel, UsabilityStatus};
    use chrono::NaiveDate;

    fn seed_org(store: &MemoryStore) -> Uuid {
        let org = Org {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            legal_name: None,
            website: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert(&org).unwrap();
        org.id
    }

    fn seed_contact(store: &MemoryStore, org_id: Uuid, preferred: bool) -> Uuid {
        let contact = OrgContact {
            id: Uuid::new_v4(),
            org_id,
            contact_type: ContactType::Email,
            email: Some("ops@acme.example".into()),
            phone: None,
            address_line_1: None,
            address_line_2: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            label: OrgContactLabel::Headquarters,
            is_preferred: preferred,
            usability_status: UsabilityStatus::Active,
            usability_status_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert(&contact).unwrap();
        contact.id
    }

    #[test]
    fn test_election_clears_previous_winner() {
        let store = MemoryStore::open(ValidatorConfig::default()).unwrap();
        let org_id = seed_org(&store);
        let first = seed_contact(&store, org_id, true);
        let second = seed_contact(&store, org_id, false);

        set_preferred_org_contact(&store, second).unwrap();

        let (first_read, _) = store.get::<OrgContact>(first).unwrap().unwrap();
        let (second_read, _) = store.get::<OrgContact>(second).unwrap().unwrap();
        assert!(!first_read.is_preferred);
        assert!(second_read.is_preferred);
    }

    #[test]
    fn test_election_is_idempotent() {
        let store = MemoryStore::open(ValidatorConfig::default()).unwrap();
        let org_id = seed_org(&store);
        let only = seed_contact(&store, org_id, true);

        set_preferred_org_contact(&store, only).unwrap();
        let (read, revision) = store.get::<OrgContact>(only).unwrap().unwrap();
        assert!(read.is_preferred);
        // No write happened; revision untouched.
        assert_eq!(revision, 1);
    }

    #[test]
    fn test_missing_record_is_invalid_operation() {
        let store = MemoryStore::open(ValidatorConfig::default()).unwrap();
        let result = set_preferred_org_contact(&store, Uuid::new_v4());
        assert!(matches!(result, Err(EdmError::InvalidOperation { .. })));
    }
}
