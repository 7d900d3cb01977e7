//! Document store with optimistic concurrency
//!
//! One logical collection per entity type; the primary key is the
//! record's UUID. Every stored document carries a revision counter, and
//! write batches commit all-or-nothing under the store's write lock:
//! structural validation first, then lifecycle edges, then the
//! referential-integrity pass over the overlaid state, then revision
//! checks, then apply. A mismatched revision aborts the whole batch with
//! a retryable conflict; unprotected two-step read-modify-write never
//! touches committed state.
//!
//! The store also keeps the applied-event ledger that makes accumulator
//! updates idempotent under replay: a batch tagged with an already-seen
//! event id commits as a no-op.

pub mod retry;

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ValidatorConfig;
use crate::error::{
    ConcurrencyConflict, EdmError, RelationshipViolation, Result, StoreUnavailable,
};
use crate::integrity::{IntegrityValidator, PendingWrite, StoreView};
use crate::lifecycle;
use crate::model::Entity;
use crate::schema::SchemaRegistry;
use crate::validation::validate_document;

/// A committed document plus its revision counter.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub document: Value,
    pub revision: u64,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, HashMap<Uuid, StoredDocument>>,
    applied_events: HashSet<Uuid>,
}

/// Outcome of a batch commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// The batch's event id was already applied; nothing changed.
    DuplicateEvent,
}

#[derive(Debug, Clone)]
enum BatchOp {
    Insert {
        collection: String,
        document: Value,
        id: Uuid,
    },
    Update {
        collection: String,
        id: Uuid,
        document: Value,
        expected_revision: u64,
    },
}

/// An all-or-nothing multi-document write.
///
/// There are no delete operations; the model deactivates records via
/// status and termination fields.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
    event_id: Option<Uuid>,
}

impl WriteBatch {
    pub fn new() -> WriteBatch {
        WriteBatch::default()
    }

    /// Tag this batch with an idempotency event id; committing the same
    /// event twice is a no-op.
    pub fn with_event(mut self, event_id: Uuid) -> WriteBatch {
        self.event_id = Some(event_id);
        self
    }

    pub fn insert<E: Entity>(mut self, entity: &E) -> Result<WriteBatch> {
        let document = entity.to_document()?;
        self.ops.push(BatchOp::Insert {
            collection: E::COLLECTION.to_string(),
            document,
            id: entity.id(),
        });
        Ok(self)
    }

    pub fn update<E: Entity>(mut self, entity: &E, expected_revision: u64) -> Result<WriteBatch> {
        let document = entity.to_document()?;
        self.ops.push(BatchOp::Update {
            collection: E::COLLECTION.to_string(),
            id: entity.id(),
            document,
            expected_revision,
        });
        Ok(self)
    }

    pub fn insert_document(mut self, collection: &str, document: Value) -> Result<WriteBatch> {
        let id = document
            .get("_id")
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| EdmError::InvalidOperation {
                operation: "insert_document".into(),
                reason: format!("document for '{collection}' has no parseable _id"),
            })?;
        self.ops.push(BatchOp::Insert {
            collection: collection.to_string(),
            document,
            id,
        });
        Ok(self)
    }

    pub fn update_document(
        mut self,
        collection: &str,
        id: Uuid,
        document: Value,
        expected_revision: u64,
    ) -> WriteBatch {
        self.ops.push(BatchOp::Update {
            collection: collection.to_string(),
            id,
            document,
            expected_revision,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// In-memory document store enforcing the registry's contracts.
pub struct MemoryStore {
    registry: SchemaRegistry,
    config: ValidatorConfig,
    state: RwLock<StoreState>,
}

fn lock_poisoned<T>(_err: T) -> EdmError {
    EdmError::Unavailable(StoreUnavailable {
        reason: "store lock poisoned".into(),
    })
}

impl MemoryStore {
    pub fn new(registry: SchemaRegistry, config: ValidatorConfig) -> MemoryStore {
        MemoryStore {
            registry,
            config,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Bootstrap the full registry with the given config.
    pub fn open(config: ValidatorConfig) -> Result<MemoryStore> {
        Ok(MemoryStore::new(SchemaRegistry::bootstrap()?, config))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Fetch a raw document with its revision.
    pub fn get_document(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>> {
        self.registry.spec(collection)?;
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    /// Fetch a typed entity with its revision.
    pub fn get<E: Entity>(&self, id: Uuid) -> Result<Option<(E, u64)>> {
        match self.get_document(E::COLLECTION, id)? {
            Some(stored) => Ok(Some((E::from_document(&stored.document)?, stored.revision))),
            None => Ok(None),
        }
    }

    /// All documents of a collection (committed state).
    pub fn scan_documents(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        self.registry.spec(collection)?;
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    /// Typed entities matching a predicate, with revisions.
    pub fn find<E: Entity, F>(&self, mut predicate: F) -> Result<Vec<(E, u64)>>
    where
        F: FnMut(&E) -> bool,
    {
        let mut matches = Vec::new();
        for stored in self.scan_documents(E::COLLECTION)? {
            let entity = E::from_document(&stored.document)?;
            if predicate(&entity) {
                matches.push((entity, stored.revision));
            }
        }
        Ok(matches)
    }

    /// Convenience single-insert commit.
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<()> {
        self.commit(WriteBatch::new().insert(entity)?)?;
        Ok(())
    }

    /// Convenience single-update commit.
    pub fn update<E: Entity>(&self, entity: &E, expected_revision: u64) -> Result<()> {
        self.commit(WriteBatch::new().update(entity, expected_revision)?)?;
        Ok(())
    }

    /// Commit a batch: structural validation, lifecycle edges, integrity
    /// pass, revision checks, then apply — all-or-nothing.
    pub fn commit(&self, batch: WriteBatch) -> Result<CommitOutcome> {
        if batch.is_empty() {
            return Ok(CommitOutcome::Applied);
        }

        // Per-document structural contracts (no lock needed).
        for op in &batch.ops {
            let (collection, document) = match op {
                BatchOp::Insert {
                    collection,
                    document,
                    ..
                } => (collection, document),
                BatchOp::Update {
                    collection,
                    document,
                    ..
                } => (collection, document),
            };
            let spec = self.registry.spec(collection)?;
            validate_document(spec, document)?;
            if spec.append_only {
                if let BatchOp::Update { id, .. } = op {
                    return Err(RelationshipViolation::AppendOnly {
                        collection: collection.clone(),
                        record_id: *id,
                    }
                    .into());
                }
            }
        }

        let mut state = self.state.write().map_err(lock_poisoned)?;

        if let Some(event_id) = batch.event_id {
            if state.applied_events.contains(&event_id) {
                debug!(%event_id, "event already applied; commit is a no-op");
                return Ok(CommitOutcome::DuplicateEvent);
            }
        }

        // Revision checks and lifecycle edges against current state.
        for op in &batch.ops {
            match op {
                BatchOp::Insert { collection, id, .. } => {
                    let exists = state
                        .collections
                        .get(collection)
                        .map(|docs| docs.contains_key(id))
                        .unwrap_or(false);
                    if exists {
                        return Err(ConcurrencyConflict::DuplicateInsert {
                            collection: collection.clone(),
                            id: *id,
                        }
                        .into());
                    }
                }
                BatchOp::Update {
                    collection,
                    id,
                    document,
                    expected_revision,
                } => {
                    let Some(current) = state
                        .collections
                        .get(collection)
                        .and_then(|docs| docs.get(id))
                    else {
                        return Err(ConcurrencyConflict::RecordVanished {
                            collection: collection.clone(),
                            id: *id,
                        }
                        .into());
                    };
                    if current.revision != *expected_revision {
                        return Err(ConcurrencyConflict::RevisionMismatch {
                            collection: collection.clone(),
                            id: *id,
                            expected: *expected_revision,
                            found: current.revision,
                        }
                        .into());
                    }
                    lifecycle::check_document_transition(collection, &current.document, document)?;
                }
            }
        }

        // Referential integrity over the overlaid state.
        let pending: Vec<PendingWrite> = batch
            .ops
            .iter()
            .map(|op| match op {
                BatchOp::Insert {
                    collection,
                    document,
                    ..
                }
                | BatchOp::Update {
                    collection,
                    document,
                    ..
                } => PendingWrite {
                    collection: collection.clone(),
                    document: document.clone(),
                },
            })
            .collect();
        let overlay = OverlayView {
            state: &state,
            pending: &pending,
        };
        let outcome = IntegrityValidator::new(&self.config).check(
            &pending,
            &overlay,
            Utc::now().date_naive(),
        );
        if let Some(first) = outcome.violations.first() {
            for violation in &outcome.violations[1..] {
                debug!(%violation, "additional integrity violation in rejected batch");
            }
            return Err(first.clone().into());
        }

        // Apply.
        for op in batch.ops {
            match op {
                BatchOp::Insert {
                    collection,
                    document,
                    id,
                } => {
                    state
                        .collections
                        .entry(collection)
                        .or_default()
                        .insert(id, StoredDocument {
                            document,
                            revision: 1,
                        });
                }
                BatchOp::Update {
                    collection,
                    id,
                    document,
                    expected_revision,
                } => {
                    state
                        .collections
                        .entry(collection)
                        .or_default()
                        .insert(id, StoredDocument {
                            document,
                            revision: expected_revision + 1,
                        });
                }
            }
        }
        if let Some(event_id) = batch.event_id {
            state.applied_events.insert(event_id);
        }

        info!(ops = pending.len(), "committed write batch");
        Ok(CommitOutcome::Applied)
    }
}

/// Committed state overlaid with the pending write set; pending wins.
struct OverlayView<'a> {
    state: &'a StoreState,
    pending: &'a [PendingWrite],
}

fn document_id(document: &Value) -> Option<Uuid> {
    document
        .get("_id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

impl StoreView for OverlayView<'_> {
    fn get_document(&self, collection: &str, id: Uuid) -> Option<Value> {
        for write in self.pending.iter().rev() {
            if write.collection == collection && document_id(&write.document) == Some(id) {
                return Some(write.document.clone());
            }
        }
        self.state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .map(|stored| stored.document.clone())
    }

    fn scan(&self, collection: &str) -> Vec<Value> {
        let mut by_id: HashMap<Uuid, Value> = self
            .state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, stored)| (*id, stored.document.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for write in self.pending {
            if write.collection == collection {
                if let Some(id) = document_id(&write.document) {
                    by_id.insert(id, write.document.clone());
                }
            }
        }
        by_id.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, Org};

    fn make_org(name: &str) -> Org {
        Org {
            id: Uuid::new_v4(),
            name: name.into(),
            legal_name: None,
            website: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn open_store() -> MemoryStore {
        MemoryStore::open(ValidatorConfig::default()).unwrap()
    }

    #[test]
    fn test_insert_and_read_back() {
        let store = open_store();
        let org = make_org("Acme");
        store.insert(&org).unwrap();

        let (read, revision) = store.get::<Org>(org.id).unwrap().unwrap();
        assert_eq!(read, org);
        assert_eq!(revision, 1);
    }

    #[test]
    fn test_update_bumps_revision() {
        let store = open_store();
        let mut org = make_org("Acme");
        store.insert(&org).unwrap();

        org.legal_name = Some("Acme, LLC".into());
        org.touch(Utc::now());
        store.update(&org, 1).unwrap();

        let (read, revision) = store.get::<Org>(org.id).unwrap().unwrap();
        assert_eq!(read.legal_name.as_deref(), Some("Acme, LLC"));
        assert_eq!(revision, 2);
    }

    #[test]
    fn test_stale_revision_conflicts() {
        let store = open_store();
        let mut org = make_org("Acme");
        store.insert(&org).unwrap();
        org.touch(Utc::now());
        store.update(&org, 1).unwrap();

        let result = store.update(&org, 1);
        match result {
            Err(EdmError::Conflict(ConcurrencyConflict::RevisionMismatch {
                expected: 1,
                found: 2,
                ..
            })) => {}
            other => panic!("Expected RevisionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_insert_conflicts() {
        let store = open_store();
        let org = make_org("Acme");
        store.insert(&org).unwrap();
        let result = store.insert(&org);
        assert!(matches!(
            result,
            Err(EdmError::Conflict(ConcurrencyConflict::DuplicateInsert { .. }))
        ));
    }

    #[test]
    fn test_structural_rejection_names_field() {
        let store = open_store();
        let doc = serde_json::json!({
            "_id": Uuid::new_v4().to_string(),
            "is_active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });
        let result = store.commit(WriteBatch::new().insert_document("org", doc).unwrap());
        match result {
            Err(EdmError::Structural(err)) => {
                assert_eq!(err.violations[0].field(), Some("name"));
            }
            other => panic!("Expected Structural error, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_is_atomic() {
        let store = open_store();
        let good = make_org("Good");
        // Second document in the batch violates the schema.
        let bad = serde_json::json!({"_id": Uuid::new_v4().to_string()});
        let batch = WriteBatch::new()
            .insert(&good)
            .unwrap()
            .insert_document("org", bad)
            .unwrap();
        assert!(store.commit(batch).is_err());
        assert!(store.get::<Org>(good.id).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_event_is_noop() {
        let store = open_store();
        let event_id = Uuid::new_v4();

        let first = make_org("Acme");
        let outcome = store
            .commit(WriteBatch::new().insert(&first).unwrap().with_event(event_id))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Applied);

        let replay = make_org("Replay");
        let outcome = store
            .commit(WriteBatch::new().insert(&replay).unwrap().with_event(event_id))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::DuplicateEvent);
        assert!(store.get::<Org>(replay.id).unwrap().is_none());
    }

    #[test]
    fn test_unknown_collection_rejected() {
        let store = open_store();
        let doc = serde_json::json!({"_id": Uuid::new_v4().to_string()});
        let result = store.commit(
            WriteBatch::new()
                .insert_document("claims", doc)
                .unwrap(),
        );
        assert!(matches!(result, Err(EdmError::UnknownCollection(_))));
    }
}
