//! Error handling for the Wellnecity EDM registry
//!
//! This module provides idiomatic Rust error types using thiserror, split
//! along the four families callers need to distinguish: structural
//! violations, relationship violations, concurrency conflicts, and store
//! availability. Structural and relationship errors carry the specific
//! field/rule/entity identifiers needed for a human-actionable fix; only
//! conflicts and availability failures are retryable.

use thiserror::Error;
use uuid::Uuid;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EdmError>;

/// Main error type for the EDM registry layer
#[derive(Error, Debug)]
pub enum EdmError {
    #[error("Structural validation failed: {0}")]
    Structural(#[from] StructuralError),

    #[error("Relationship violation: {0}")]
    Relationship(#[from] RelationshipViolation),

    #[error("Lifecycle violation: {0}")]
    Lifecycle(#[from] LifecycleViolation),

    #[error("Concurrency conflict: {0}")]
    Conflict(#[from] ConcurrencyConflict),

    #[error("Store unavailable: {0}")]
    Unavailable(#[from] StoreUnavailable),

    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("Invalid operation '{operation}': {reason}")]
    InvalidOperation { operation: String, reason: String },

    #[error("Invalid field pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EdmError {
    /// Whether the operation that produced this error may be retried as-is.
    ///
    /// Structural and relationship errors require corrected input;
    /// conflicts and availability failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EdmError::Conflict(_) | EdmError::Unavailable(_))
    }
}

/// A document failed structural validation against its collection schema.
///
/// Carries every violation found so the caller can fix the record in one
/// pass; acceptance is all-or-nothing.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("document in '{collection}' has {} violation(s): {}", .violations.len(), first_violation(.violations))]
pub struct StructuralError {
    pub collection: String,
    pub violations: Vec<StructuralViolation>,
}

fn first_violation(violations: &[StructuralViolation]) -> String {
    violations
        .first()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(none)".to_string())
}

/// A single per-document schema rule failure, naming the offending field
/// and the rule that rejected it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralViolation {
    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    #[error("field '{field}' expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("field '{field}' value '{value}' is not in the declared enum set [{}]", .allowed.join(", "))]
    EnumMismatch {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("field '{field}' value '{value}' does not match pattern '{pattern}'")]
    PatternMismatch {
        field: String,
        value: String,
        pattern: String,
    },

    #[error("field '{field}' length {length} exceeds maximum length {max}")]
    MaxLengthExceeded {
        field: String,
        length: usize,
        max: usize,
    },

    #[error("field '{field}' value {value} violates bound {bound}")]
    OutOfBounds {
        field: String,
        value: i64,
        bound: String,
    },

    #[error("document root must be an object")]
    NotADocument,
}

impl StructuralViolation {
    /// The dotted path of the offending field, if the rule names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            StructuralViolation::MissingField { field }
            | StructuralViolation::TypeMismatch { field, .. }
            | StructuralViolation::EnumMismatch { field, .. }
            | StructuralViolation::PatternMismatch { field, .. }
            | StructuralViolation::MaxLengthExceeded { field, .. }
            | StructuralViolation::OutOfBounds { field, .. } => Some(field),
            StructuralViolation::NotADocument => None,
        }
    }
}

/// A cross-entity invariant that a per-document schema cannot express
/// was broken by the attempted write.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelationshipViolation {
    #[error("'{collection}.{field}' references missing {target_collection} record {target_id}")]
    MissingReference {
        collection: String,
        field: String,
        target_collection: String,
        target_id: Uuid,
    },

    #[error("'{detail_collection}' record {detail_id} references org_role {org_role_id} with role_type {actual}, expected {expected}")]
    RoleTypeMismatch {
        detail_collection: String,
        detail_id: Uuid,
        org_role_id: Uuid,
        expected: String,
        actual: String,
    },

    #[error("org {org_id} holds no {role_type} role required by '{collection}' record {record_id}")]
    MissingRole {
        collection: String,
        record_id: Uuid,
        org_id: Uuid,
        role_type: String,
    },

    #[error("{count} records would hold the '{flag}' flag for {scope} (exactly one allowed)")]
    DuplicateWinner {
        flag: String,
        scope: String,
        count: usize,
    },

    #[error("composition chain for {composition_id} would have {count} current versions (exactly one required)")]
    CurrentVersionCount { composition_id: Uuid, count: usize },

    #[error("composition {composition_id} is current but version {version} is not the chain maximum {max_version}")]
    CurrentVersionNotLatest {
        composition_id: Uuid,
        version: i32,
        max_version: i32,
    },

    #[error("coverage {coverage_id} would have {count} SUBSCRIBER members (exactly one required)")]
    SubscriberCount { coverage_id: Uuid, count: usize },

    #[error("plan_member {plan_member_id} dependent link is invalid: {reason}")]
    InvalidDependentLink { plan_member_id: Uuid, reason: String },

    #[error("'{collection}' record {node_id} participates in a reference cycle")]
    ReferenceCycle { collection: String, node_id: Uuid },

    #[error("org_structure_node {node_id} has level {level} but its parent has level {parent_level}")]
    LevelMismatch {
        node_id: Uuid,
        level: i32,
        parent_level: i32,
    },

    #[error("root org_structure_node {node_id} must sit at level 0, found {level}")]
    RootLevel { node_id: Uuid, level: i32 },

    #[error("composition {composition_id} has version {version} but its preceding version is {preceding_version}")]
    VersionNotSequential {
        composition_id: Uuid,
        version: i32,
        preceding_version: i32,
    },

    #[error("org_structure_node {node_id} belongs to structure {structure_id} but its parent belongs to {parent_structure_id}")]
    StructureMismatch {
        node_id: Uuid,
        structure_id: Uuid,
        parent_structure_id: Uuid,
    },

    #[error("portfolio {portfolio_id} populates both owner_org_id and owner_person_id (at most one allowed)")]
    AmbiguousOwner { portfolio_id: Uuid },

    #[error("'{collection}' record {record_id} is flagged active but terminated on {termination_date}")]
    ActiveAfterTermination {
        collection: String,
        record_id: Uuid,
        termination_date: String,
    },

    #[error("accumulator {accumulator_id} overlaps accumulator {other_id} for the same plan limit and scope")]
    PeriodOverlap {
        accumulator_id: Uuid,
        other_id: Uuid,
    },

    #[error("eligibility {eligibility_id} is ELIGIBLE_ENROLLED but no plan_member enrollment exists for the employee")]
    EnrollmentMissing { eligibility_id: Uuid },

    #[error("collection '{collection}' is append-only; record {record_id} cannot be modified")]
    AppendOnly { collection: String, record_id: Uuid },
}

/// An illegal status-machine edge.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{entity} status cannot transition {from} -> {to}")]
pub struct LifecycleViolation {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
}

/// Optimistic-concurrency failure; retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConcurrencyConflict {
    #[error("'{collection}' record {id} was expected at revision {expected} but is at {found}")]
    RevisionMismatch {
        collection: String,
        id: Uuid,
        expected: u64,
        found: u64,
    },

    #[error("'{collection}' record {id} was created concurrently")]
    DuplicateInsert { collection: String, id: Uuid },

    #[error("'{collection}' record {id} disappeared during the write")]
    RecordVanished { collection: String, id: Uuid },

    #[error("gave up after {attempts} conflicting attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Transient infrastructure failure; retryable with backoff.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("store unavailable: {reason}")]
pub struct StoreUnavailable {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_errors_are_not_retryable() {
        let err = EdmError::Structural(StructuralError {
            collection: "org".into(),
            violations: vec![StructuralViolation::MissingField {
                field: "name".into(),
            }],
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_conflicts_are_retryable() {
        let err = EdmError::Conflict(ConcurrencyConflict::RetriesExhausted { attempts: 4 });
        assert!(err.is_retryable());
        let err = EdmError::Unavailable(StoreUnavailable {
            reason: "lock poisoned".into(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn test_violation_messages_name_the_field() {
        let v = StructuralViolation::EnumMismatch {
            field: "role_type".into(),
            value: "OWNER".into(),
            allowed: vec!["EMPLOYER".into(), "CLIENT".into()],
        };
        let msg = v.to_string();
        assert!(msg.contains("role_type"));
        assert!(msg.contains("OWNER"));
        assert_eq!(v.field(), Some("role_type"));
    }
}
