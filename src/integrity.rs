//! Relationship & referential-integrity validation
//!
//! Enforces the cross-entity invariants a per-document schema cannot
//! express: reference existence, role-type-matches-detail-record,
//! exactly-one-current-version, single-winner preferred/primary flags,
//! exactly-one-subscriber, acyclic hierarchies, exclusive portfolio
//! ownership, and active/termination consistency. Runs as a pre-commit
//! check over the set of records affected by a write, against a read view
//! that already overlays the pending documents.
//!
//! Reference existence is strict or advisory per `ValidatorConfig`; the
//! remaining invariants always reject the write. Nothing is coerced.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::config::{IntegrityMode, ValidatorConfig};
use crate::error::RelationshipViolation;

/// Read access to committed state, overlaid with the pending write set.
pub trait StoreView {
    fn get_document(&self, collection: &str, id: Uuid) -> Option<Value>;
    fn scan(&self, collection: &str) -> Vec<Value>;
}

/// One document in the pending write set.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub collection: String,
    pub document: Value,
}

/// Result of an integrity pass: hard violations reject the write;
/// advisory findings are logged and surfaced to the caller.
#[derive(Debug, Default)]
pub struct IntegrityOutcome {
    pub violations: Vec<RelationshipViolation>,
    pub advisories: Vec<RelationshipViolation>,
}

impl IntegrityOutcome {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Declared reference edges: (collection, field, target collection).
///
/// External-domain references (claims, clinical admissions, diagnostic
/// reports) are deliberately absent: those ids are opaque to this layer.
const REFERENCE_EDGES: &[(&str, &str, &str)] = &[
    ("org_identifier", "org_id", "org"),
    ("org_contact", "org_id", "org"),
    ("org_role", "org_id", "org"),
    ("employer_details", "org_role_id", "org_role"),
    ("client_details", "org_role_id", "org_role"),
    ("vendor_details", "org_role_id", "org_role"),
    ("broker_details", "org_role_id", "org_role"),
    ("carrier_details", "org_role_id", "org_role"),
    ("health_plan_sponsor_details", "org_role_id", "org_role"),
    ("provider_org_details", "org_role_id", "org_role"),
    ("org_relationship", "org_id_source", "org"),
    ("org_relationship", "org_id_target", "org"),
    ("contract", "org_relationship_id", "org_relationship"),
    ("org_structure", "org_id", "org"),
    ("org_structure_node", "org_structure_id", "org_structure"),
    ("org_structure_node", "parent_node_id", "org_structure_node"),
    ("portfolio", "owner_org_id", "org"),
    ("portfolio", "owner_person_id", "person"),
    ("portfolio", "parent_portfolio_id", "portfolio"),
    ("portfolio_member", "portfolio_id", "portfolio"),
    ("portfolio_member", "org_id", "org"),
    ("person_identifier", "person_id", "person"),
    ("person_contact", "person_id", "person"),
    ("employee", "person_id", "person"),
    ("employee", "employer_org_id", "org"),
    ("provider", "person_id", "person"),
    ("provider_affiliation", "provider_id", "provider"),
    ("provider_affiliation", "provider_org_id", "org"),
    ("household_participant", "household_id", "household"),
    ("household_participant", "person_id", "person"),
    ("benefit_plan", "sponsor_org_id", "org"),
    ("benefit_plan", "org_structure_node_id", "org_structure_node"),
    ("coverage_type", "benefit_plan_id", "benefit_plan"),
    ("plan_limit", "benefit_plan_id", "benefit_plan"),
    ("eligibility", "employee_id", "employee"),
    ("eligibility", "benefit_plan_id", "benefit_plan"),
    ("coverage", "coverage_type_id", "coverage_type"),
    ("coverage", "benefit_plan_id", "benefit_plan"),
    ("plan_member", "person_id", "person"),
    ("plan_member", "coverage_id", "coverage"),
    ("plan_member", "subscriber_plan_member_id", "plan_member"),
    ("accumulator", "plan_limit_id", "plan_limit"),
    ("accumulator", "plan_member_id", "plan_member"),
    ("accumulator", "coverage_id", "coverage"),
    ("health_record_composition", "member_id", "person"),
    ("health_record_composition", "employer_id", "org"),
    (
        "health_record_composition",
        "preceding_version_id",
        "health_record_composition",
    ),
    ("problem", "member_id", "person"),
    ("problem", "composition_id", "health_record_composition"),
    ("problem", "encounter_id", "encounter_record"),
    ("allergy", "member_id", "person"),
    ("allergy", "composition_id", "health_record_composition"),
    ("medication", "member_id", "person"),
    ("medication", "composition_id", "health_record_composition"),
    ("vital_sign", "member_id", "person"),
    ("vital_sign", "composition_id", "health_record_composition"),
    ("vital_sign", "encounter_id", "encounter_record"),
    ("lab_result", "member_id", "person"),
    ("lab_result", "composition_id", "health_record_composition"),
    ("lab_result", "encounter_id", "encounter_record"),
    ("procedure_record", "member_id", "person"),
    ("procedure_record", "composition_id", "health_record_composition"),
    ("procedure_record", "encounter_id", "encounter_record"),
    ("immunization", "member_id", "person"),
    ("immunization", "composition_id", "health_record_composition"),
    ("immunization", "encounter_id", "encounter_record"),
    ("clinical_note", "member_id", "person"),
    ("clinical_note", "composition_id", "health_record_composition"),
    ("clinical_note", "encounter_id", "encounter_record"),
    ("care_plan", "member_id", "person"),
    ("care_plan", "composition_id", "health_record_composition"),
    ("care_plan", "encounter_id", "encounter_record"),
    ("encounter_record", "member_id", "person"),
    ("encounter_record", "composition_id", "health_record_composition"),
];

/// Detail collections and the role_type their parent role must carry.
const ROLE_DETAIL_BINDINGS: &[(&str, &str)] = &[
    ("employer_details", "EMPLOYER"),
    ("client_details", "CLIENT"),
    ("vendor_details", "VENDOR"),
    ("broker_details", "BROKER"),
    ("carrier_details", "CARRIER"),
    ("health_plan_sponsor_details", "HEALTH_PLAN_SPONSOR"),
    ("provider_org_details", "PROVIDER_ORG"),
];

/// Collections requiring the referenced org to hold a specific role:
/// (collection, org field, required role_type).
const ORG_ROLE_REQUIREMENTS: &[(&str, &str, &str)] = &[
    ("employee", "employer_org_id", "EMPLOYER"),
    ("provider_affiliation", "provider_org_id", "PROVIDER_ORG"),
    ("benefit_plan", "sponsor_org_id", "HEALTH_PLAN_SPONSOR"),
];

/// Single-winner flag scopes: (collection, flag, parent field,
/// discriminator field). A `None` discriminator scopes by parent alone.
const SINGLE_WINNER_SCOPES: &[(&str, &str, &str, Option<&str>)] = &[
    ("org_contact", "is_preferred", "org_id", Some("contact_type")),
    ("person_contact", "is_preferred", "person_id", Some("contact_type")),
    ("org_identifier", "is_primary", "org_id", Some("identifier_type")),
    ("person_identifier", "is_primary", "person_id", Some("identifier_type")),
    ("provider_affiliation", "is_primary", "provider_id", None),
];

/// Collections whose provenance target_type values map back to them.
fn provenance_target_collection(target_type: &str) -> Option<&'static str> {
    match target_type {
        "HEALTH_RECORD_COMPOSITION" => Some("health_record_composition"),
        "PROBLEM" => Some("problem"),
        "ALLERGY" => Some("allergy"),
        "MEDICATION" => Some("medication"),
        "VITAL_SIGN" => Some("vital_sign"),
        "LAB_RESULT" => Some("lab_result"),
        "PROCEDURE_RECORD" => Some("procedure_record"),
        "IMMUNIZATION" => Some("immunization"),
        "CLINICAL_NOTE" => Some("clinical_note"),
        "CARE_PLAN" => Some("care_plan"),
        "ENCOUNTER_RECORD" => Some("encounter_record"),
        _ => None,
    }
}

fn get_uuid(document: &Value, field: &str) -> Option<Uuid> {
    document
        .get(field)
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

fn get_str<'a>(document: &'a Value, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}

fn get_bool(document: &Value, field: &str) -> Option<bool> {
    document.get(field).and_then(Value::as_bool)
}

fn get_i64(document: &Value, field: &str) -> Option<i64> {
    document.get(field).and_then(Value::as_i64)
}

fn get_date(document: &Value, field: &str) -> Option<NaiveDate> {
    get_str(document, field)
        .and_then(|raw| raw.get(..10.min(raw.len())))
        .and_then(|prefix| prefix.parse().ok())
}

/// Cross-entity invariant validator.
pub struct IntegrityValidator<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> IntegrityValidator<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        IntegrityValidator { config }
    }

    /// Run the full pre-commit pass over the pending write set. `view`
    /// must already overlay the pending documents onto committed state.
    pub fn check(
        &self,
        pending: &[PendingWrite],
        view: &dyn StoreView,
        as_of: NaiveDate,
    ) -> IntegrityOutcome {
        let mut outcome = IntegrityOutcome::default();

        for write in pending {
            self.check_references(write, view, &mut outcome);
            self.check_role_detail(write, view, &mut outcome);
            self.check_org_role_requirement(write, view, &mut outcome);
            self.check_active_consistency(write, as_of, &mut outcome);
            match write.collection.as_str() {
                "org_structure_node" => self.check_structure_node(write, view, &mut outcome),
                "portfolio" => self.check_portfolio(write, view, &mut outcome),
                "plan_member" => self.check_plan_members(write, view, &mut outcome),
                "health_record_composition" => {
                    self.check_composition_chain(write, view, &mut outcome)
                }
                "accumulator" => self.check_accumulator_periods(write, view, &mut outcome),
                "eligibility" => self.check_enrollment(write, view, &mut outcome),
                _ => {}
            }
        }

        self.check_single_winners(pending, view, &mut outcome);

        for advisory in &outcome.advisories {
            warn!(%advisory, "advisory integrity finding");
        }

        outcome
    }

    fn push_reference_finding(
        &self,
        outcome: &mut IntegrityOutcome,
        violation: RelationshipViolation,
    ) {
        match self.config.integrity_mode {
            IntegrityMode::Strict => outcome.violations.push(violation),
            IntegrityMode::Advisory => outcome.advisories.push(violation),
        }
    }

    fn check_references(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        for (collection, field, target) in REFERENCE_EDGES {
            if *collection != write.collection {
                continue;
            }
            let Some(target_id) = get_uuid(&write.document, field) else {
                continue;
            };
            if view.get_document(target, target_id).is_none() {
                self.push_reference_finding(
                    outcome,
                    RelationshipViolation::MissingReference {
                        collection: write.collection.clone(),
                        field: field.to_string(),
                        target_collection: target.to_string(),
                        target_id,
                    },
                );
            }
        }

        // Provenance targets resolve through the declared target_type.
        if write.collection == "health_record_provenance" {
            if let (Some(target_type), Some(target_id)) = (
                get_str(&write.document, "target_type"),
                get_uuid(&write.document, "target_id"),
            ) {
                if let Some(target) = provenance_target_collection(target_type) {
                    if view.get_document(target, target_id).is_none() {
                        self.push_reference_finding(
                            outcome,
                            RelationshipViolation::MissingReference {
                                collection: write.collection.clone(),
                                field: "target_id".to_string(),
                                target_collection: target.to_string(),
                                target_id,
                            },
                        );
                    }
                }
            }
        }
    }

    /// A detail record's parent role must carry the matching role_type.
    fn check_role_detail(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let Some((_, expected)) = ROLE_DETAIL_BINDINGS
            .iter()
            .find(|(collection, _)| *collection == write.collection)
        else {
            return;
        };
        let Some(org_role_id) = get_uuid(&write.document, "org_role_id") else {
            return;
        };
        let Some(role) = view.get_document("org_role", org_role_id) else {
            // Missing role is already a reference violation.
            return;
        };
        let actual = get_str(&role, "role_type").unwrap_or("");
        if actual != *expected {
            outcome.violations.push(RelationshipViolation::RoleTypeMismatch {
                detail_collection: write.collection.clone(),
                detail_id: get_uuid(&write.document, "_id").unwrap_or_default(),
                org_role_id,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    /// Employment, provider affiliation, and plan sponsorship require the
    /// referenced org to hold the corresponding role.
    fn check_org_role_requirement(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let Some((_, org_field, role_type)) = ORG_ROLE_REQUIREMENTS
            .iter()
            .find(|(collection, _, _)| *collection == write.collection)
        else {
            return;
        };
        let Some(org_id) = get_uuid(&write.document, org_field) else {
            return;
        };
        if view.get_document("org", org_id).is_none() {
            // Missing org is already a reference violation.
            return;
        }
        let has_role = view.scan("org_role").iter().any(|role| {
            get_uuid(role, "org_id") == Some(org_id)
                && get_str(role, "role_type") == Some(*role_type)
        });
        if !has_role {
            outcome.violations.push(RelationshipViolation::MissingRole {
                collection: write.collection.clone(),
                record_id: get_uuid(&write.document, "_id").unwrap_or_default(),
                org_id,
                role_type: role_type.to_string(),
            });
        }
    }

    /// active => termination_date absent or not yet past. A record
    /// terminating today stays active through the end of that day.
    fn check_active_consistency(
        &self,
        write: &PendingWrite,
        as_of: NaiveDate,
        outcome: &mut IntegrityOutcome,
    ) {
        if get_bool(&write.document, "is_active") != Some(true) {
            return;
        }
        let Some(termination) = get_date(&write.document, "termination_date") else {
            return;
        };
        if termination < as_of {
            outcome
                .violations
                .push(RelationshipViolation::ActiveAfterTermination {
                    collection: write.collection.clone(),
                    record_id: get_uuid(&write.document, "_id").unwrap_or_default(),
                    termination_date: termination.to_string(),
                });
        }
    }

    /// For every (parent, type) scope the batch touches, at most one row
    /// may hold the winner flag afterwards.
    fn check_single_winners(
        &self,
        pending: &[PendingWrite],
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        for (collection, flag, parent_field, discriminator) in SINGLE_WINNER_SCOPES {
            // Scopes touched by this batch.
            let mut touched: HashSet<(Uuid, String)> = HashSet::new();
            for write in pending {
                if write.collection != *collection {
                    continue;
                }
                let Some(parent) = get_uuid(&write.document, parent_field) else {
                    continue;
                };
                let kind = discriminator
                    .and_then(|d| get_str(&write.document, d))
                    .unwrap_or_default()
                    .to_string();
                touched.insert((parent, kind));
            }
            if touched.is_empty() {
                continue;
            }

            let rows = view.scan(collection);
            for (parent, kind) in touched {
                let winners = rows
                    .iter()
                    .filter(|row| {
                        get_uuid(row, parent_field) == Some(parent)
                            && discriminator
                                .map(|d| get_str(row, d).unwrap_or_default() == kind)
                                .unwrap_or(true)
                            && get_bool(row, flag) == Some(true)
                    })
                    .count();
                if winners > 1 {
                    let scope = if kind.is_empty() {
                        format!("{collection}[{parent_field}={parent}]")
                    } else {
                        format!("{collection}[{parent_field}={parent}, {kind}]")
                    };
                    outcome.violations.push(RelationshipViolation::DuplicateWinner {
                        flag: flag.to_string(),
                        scope,
                        count: winners,
                    });
                }
            }
        }
    }

    /// Hierarchy rules for org structure nodes: parent in the same
    /// structure, level = parent.level + 1 (roots at 0), no cycles.
    fn check_structure_node(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let doc = &write.document;
        let node_id = get_uuid(doc, "_id").unwrap_or_default();
        let level = get_i64(doc, "level").unwrap_or(0) as i32;
        let structure_id = get_uuid(doc, "org_structure_id").unwrap_or_default();

        let Some(parent_id) = get_uuid(doc, "parent_node_id") else {
            if level != 0 {
                outcome
                    .violations
                    .push(RelationshipViolation::RootLevel { node_id, level });
            }
            return;
        };

        if let Some(parent) = view.get_document("org_structure_node", parent_id) {
            let parent_level = get_i64(&parent, "level").unwrap_or(0) as i32;
            if level != parent_level + 1 {
                outcome.violations.push(RelationshipViolation::LevelMismatch {
                    node_id,
                    level,
                    parent_level,
                });
            }
            let parent_structure = get_uuid(&parent, "org_structure_id").unwrap_or_default();
            if parent_structure != structure_id {
                outcome.violations.push(RelationshipViolation::StructureMismatch {
                    node_id,
                    structure_id,
                    parent_structure_id: parent_structure,
                });
            }
        }

        // Walk up with a visited set; a revisit of the pending node (or
        // any ancestor) is a cycle.
        let mut visited = HashSet::from([node_id]);
        let mut cursor = Some(parent_id);
        while let Some(current) = cursor {
            if !visited.insert(current) {
                outcome.violations.push(RelationshipViolation::ReferenceCycle {
                    collection: write.collection.clone(),
                    node_id,
                });
                return;
            }
            cursor = view
                .get_document("org_structure_node", current)
                .and_then(|parent| get_uuid(&parent, "parent_node_id"));
        }
    }

    /// Exclusive ownership on the raw document plus acyclic nesting.
    fn check_portfolio(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let doc = &write.document;
        let portfolio_id = get_uuid(doc, "_id").unwrap_or_default();

        if get_uuid(doc, "owner_org_id").is_some() && get_uuid(doc, "owner_person_id").is_some() {
            outcome
                .violations
                .push(RelationshipViolation::AmbiguousOwner { portfolio_id });
        }

        let mut visited = HashSet::from([portfolio_id]);
        let mut cursor = get_uuid(doc, "parent_portfolio_id");
        while let Some(current) = cursor {
            if !visited.insert(current) {
                outcome.violations.push(RelationshipViolation::ReferenceCycle {
                    collection: write.collection.clone(),
                    node_id: portfolio_id,
                });
                return;
            }
            cursor = view
                .get_document("portfolio", current)
                .and_then(|parent| get_uuid(&parent, "parent_portfolio_id"));
        }
    }

    /// Exactly one SUBSCRIBER per coverage; every DEPENDENT resolves to
    /// that subscriber and never to itself or another dependent.
    fn check_plan_members(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let doc = &write.document;
        let Some(coverage_id) = get_uuid(doc, "coverage_id") else {
            return;
        };

        let members: Vec<Value> = view
            .scan("plan_member")
            .into_iter()
            .filter(|m| get_uuid(m, "coverage_id") == Some(coverage_id))
            .collect();

        let subscribers: Vec<&Value> = members
            .iter()
            .filter(|m| get_str(m, "member_type") == Some("SUBSCRIBER"))
            .collect();
        if subscribers.len() != 1 {
            outcome.violations.push(RelationshipViolation::SubscriberCount {
                coverage_id,
                count: subscribers.len(),
            });
        }
        let subscriber_id = subscribers.first().and_then(|s| get_uuid(s, "_id"));

        for member in &members {
            let member_id = get_uuid(member, "_id").unwrap_or_default();
            let link = get_uuid(member, "subscriber_plan_member_id");
            match get_str(member, "member_type") {
                Some("SUBSCRIBER") => {
                    if link.is_some() {
                        outcome
                            .violations
                            .push(RelationshipViolation::InvalidDependentLink {
                                plan_member_id: member_id,
                                reason: "subscriber must not reference a subscriber".into(),
                            });
                    }
                }
                Some("DEPENDENT") => match link {
                    None => {
                        outcome
                            .violations
                            .push(RelationshipViolation::InvalidDependentLink {
                                plan_member_id: member_id,
                                reason: "dependent is missing subscriber_plan_member_id".into(),
                            });
                    }
                    Some(link) if link == member_id => {
                        outcome
                            .violations
                            .push(RelationshipViolation::InvalidDependentLink {
                                plan_member_id: member_id,
                                reason: "dependent references itself".into(),
                            });
                    }
                    Some(link) => {
                        if Some(link) != subscriber_id {
                            outcome
                                .violations
                                .push(RelationshipViolation::InvalidDependentLink {
                                    plan_member_id: member_id,
                                    reason: format!(
                                        "dependent references {link}, which is not the coverage subscriber"
                                    ),
                                });
                        }
                    }
                },
                _ => {}
            }
        }
    }

    /// Exactly one current version per composition chain, sitting at the
    /// highest version number; versions increment by one along the
    /// preceding chain; the chain is acyclic.
    fn check_composition_chain(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let doc = &write.document;
        let composition_id = get_uuid(doc, "_id").unwrap_or_default();

        let all = view.scan("health_record_composition");
        let by_id: HashMap<Uuid, &Value> = all
            .iter()
            .filter_map(|c| get_uuid(c, "_id").map(|id| (id, c)))
            .collect();

        // Sequential versions along the preceding link.
        if let Some(preceding_id) = get_uuid(doc, "preceding_version_id") {
            if let Some(preceding) = by_id.get(&preceding_id) {
                let version = get_i64(doc, "version_number").unwrap_or(0) as i32;
                let preceding_version = get_i64(preceding, "version_number").unwrap_or(0) as i32;
                if version != preceding_version + 1 {
                    outcome
                        .violations
                        .push(RelationshipViolation::VersionNotSequential {
                            composition_id,
                            version,
                            preceding_version,
                        });
                }
            }
        }

        // Resolve the chain root, guarding against preceding cycles.
        let root = match chain_root(composition_id, &by_id) {
            Ok(root) => root,
            Err(()) => {
                outcome.violations.push(RelationshipViolation::ReferenceCycle {
                    collection: write.collection.clone(),
                    node_id: composition_id,
                });
                return;
            }
        };

        // Members of this chain: every composition whose root matches.
        let chain: Vec<&Value> = all
            .iter()
            .filter(|c| {
                get_uuid(c, "_id")
                    .map(|id| chain_root(id, &by_id) == Ok(root))
                    .unwrap_or(false)
            })
            .collect();

        let current: Vec<&&Value> = chain
            .iter()
            .filter(|c| get_bool(c, "is_current") == Some(true))
            .collect();
        if current.len() != 1 {
            outcome
                .violations
                .push(RelationshipViolation::CurrentVersionCount {
                    composition_id,
                    count: current.len(),
                });
        }

        let max_version = chain
            .iter()
            .filter_map(|c| get_i64(c, "version_number"))
            .max()
            .unwrap_or(0) as i32;
        for c in &current {
            let version = get_i64(c, "version_number").unwrap_or(0) as i32;
            if version != max_version {
                outcome
                    .violations
                    .push(RelationshipViolation::CurrentVersionNotLatest {
                        composition_id: get_uuid(c, "_id").unwrap_or_default(),
                        version,
                        max_version,
                    });
            }
        }
    }

    /// Accumulator rows for the same (plan limit, scope) pair must not
    /// overlap in their period windows.
    fn check_accumulator_periods(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let doc = &write.document;
        let accumulator_id = get_uuid(doc, "_id").unwrap_or_default();
        let plan_limit_id = get_uuid(doc, "plan_limit_id");
        let member_scope = get_uuid(doc, "plan_member_id");
        let coverage_scope = get_uuid(doc, "coverage_id");
        let (Some(start), Some(end)) = (
            get_date(doc, "period_start"),
            get_date(doc, "period_end"),
        ) else {
            return;
        };

        for other in view.scan("accumulator") {
            let other_id = get_uuid(&other, "_id").unwrap_or_default();
            if other_id == accumulator_id {
                continue;
            }
            if get_uuid(&other, "plan_limit_id") != plan_limit_id
                || get_uuid(&other, "plan_member_id") != member_scope
                || get_uuid(&other, "coverage_id") != coverage_scope
            {
                continue;
            }
            let (Some(other_start), Some(other_end)) = (
                get_date(&other, "period_start"),
                get_date(&other, "period_end"),
            ) else {
                continue;
            };
            if start < other_end && other_start < end {
                outcome.violations.push(RelationshipViolation::PeriodOverlap {
                    accumulator_id,
                    other_id,
                });
            }
        }
    }

    /// ELIGIBLE_ENROLLED should correlate with an actual plan_member row
    /// for the employee's person. Advisory unless configured strict.
    fn check_enrollment(
        &self,
        write: &PendingWrite,
        view: &dyn StoreView,
        outcome: &mut IntegrityOutcome,
    ) {
        let doc = &write.document;
        if get_str(doc, "status") != Some("ELIGIBLE_ENROLLED") {
            return;
        }
        let eligibility_id = get_uuid(doc, "_id").unwrap_or_default();
        let (Some(employee_id), Some(plan_id)) = (
            get_uuid(doc, "employee_id"),
            get_uuid(doc, "benefit_plan_id"),
        ) else {
            return;
        };
        let Some(employee) = view.get_document("employee", employee_id) else {
            return;
        };
        let Some(person_id) = get_uuid(&employee, "person_id") else {
            return;
        };

        let plan_coverages: HashSet<Uuid> = view
            .scan("coverage")
            .iter()
            .filter(|c| get_uuid(c, "benefit_plan_id") == Some(plan_id))
            .filter_map(|c| get_uuid(c, "_id"))
            .collect();

        let enrolled = view.scan("plan_member").iter().any(|m| {
            get_uuid(m, "person_id") == Some(person_id)
                && get_uuid(m, "coverage_id")
                    .map(|c| plan_coverages.contains(&c))
                    .unwrap_or(false)
        });

        if !enrolled {
            let finding = RelationshipViolation::EnrollmentMissing { eligibility_id };
            if self.config.enforce_enrollment_correlation {
                outcome.violations.push(finding);
            } else {
                outcome.advisories.push(finding);
            }
        }
    }
}

/// Follow preceding links to the chain root; `Err` on a cycle.
fn chain_root(start: Uuid, by_id: &HashMap<Uuid, &Value>) -> Result<Uuid, ()> {
    let mut visited = HashSet::new();
    let mut current = start;
    loop {
        if !visited.insert(current) {
            return Err(());
        }
        match by_id
            .get(&current)
            .and_then(|doc| get_uuid(doc, "preceding_version_id"))
        {
            Some(preceding) if by_id.contains_key(&preceding) => current = preceding,
            _ => return Ok(current),
        }
    }
}
