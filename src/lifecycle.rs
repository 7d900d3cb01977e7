//! Status state machines
//!
//! Pure transition predicates for every status family in the model, plus
//! `ensure_transition` which converts an illegal edge into a
//! `LifecycleViolation`. No entity is ever hard-deleted; every terminal
//! state leaves the record queryable.

use crate::error::LifecycleViolation;
use crate::model::{
    CompositionStatus, ContractStatus, CoverageStatus, EmploymentStatus, UsabilityStatus,
};

/// A status enum with a declared transition graph.
pub trait StatusMachine: Copy + std::fmt::Debug {
    /// Entity family name used in violation messages.
    const ENTITY: &'static str;

    /// Whether `self -> to` is a legal edge. Self-transitions are allowed
    /// everywhere (idempotent writes).
    fn can_transition(self, to: Self) -> bool;
}

/// Check a transition, producing the violation for an illegal edge.
pub fn ensure_transition<S: StatusMachine>(from: S, to: S) -> Result<(), LifecycleViolation> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(LifecycleViolation {
            entity: S::ENTITY,
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        })
    }
}

impl StatusMachine for UsabilityStatus {
    const ENTITY: &'static str = "contact/identifier";

    // ACTIVE -> INACTIVE -> ARCHIVED, KNOWN_ERROR reachable from any
    // state; an erroneous record can still be archived.
    fn can_transition(self, to: Self) -> bool {
        use UsabilityStatus::*;
        if self == to || to == KnownError {
            return true;
        }
        matches!(
            (self, to),
            (Active, Inactive) | (Inactive, Archived) | (KnownError, Archived)
        )
    }
}

impl StatusMachine for ContractStatus {
    const ENTITY: &'static str = "contract";

    // DRAFT -> ACTIVE -> {EXPIRED, TERMINATED, RENEWED}; EXPIRED and
    // TERMINATED are terminal. RENEWED is terminal here as well: no
    // successor link is modeled.
    fn can_transition(self, to: Self) -> bool {
        use ContractStatus::*;
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Draft, Active) | (Active, Expired) | (Active, Terminated) | (Active, Renewed)
        )
    }
}

impl StatusMachine for EmploymentStatus {
    const ENTITY: &'static str = "employee";

    // ACTIVE -> {TERMINATED, LOA, RETIRED}; LOA can return to ACTIVE or
    // end in TERMINATED/RETIRED.
    fn can_transition(self, to: Self) -> bool {
        use EmploymentStatus::*;
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Active, Terminated)
                | (Active, Loa)
                | (Active, Retired)
                | (Loa, Active)
                | (Loa, Terminated)
                | (Loa, Retired)
        )
    }
}

impl StatusMachine for CoverageStatus {
    const ENTITY: &'static str = "coverage";

    // PENDING -> ACTIVE -> {TERMINATED, COBRA}; COBRA -> TERMINATED.
    fn can_transition(self, to: Self) -> bool {
        use CoverageStatus::*;
        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Pending, Active)
                | (Pending, Terminated)
                | (Active, Terminated)
                | (Active, Cobra)
                | (Cobra, Terminated)
        )
    }
}

impl StatusMachine for CompositionStatus {
    const ENTITY: &'static str = "health_record_composition";

    // ACTIVE -> {SUPERSEDED, DELETED}; both are terminal.
    fn can_transition(self, to: Self) -> bool {
        use CompositionStatus::*;
        if self == to {
            return true;
        }
        matches!((self, to), (Active, Superseded) | (Active, Deleted))
    }
}

/// Check the status edge between two stored document versions of the
/// same record. Collections without a status machine pass through;
/// unparseable status values are left to structural validation.
pub fn check_document_transition(
    collection: &str,
    old: &serde_json::Value,
    new: &serde_json::Value,
) -> Result<(), LifecycleViolation> {
    fn edge<S>(
        old: &serde_json::Value,
        new: &serde_json::Value,
        field: &str,
    ) -> Result<(), LifecycleViolation>
    where
        S: StatusMachine + serde::de::DeserializeOwned,
    {
        let parse = |doc: &serde_json::Value| {
            doc.get(field)
                .cloned()
                .and_then(|v| serde_json::from_value::<S>(v).ok())
        };
        match (parse(old), parse(new)) {
            (Some(from), Some(to)) => ensure_transition(from, to),
            _ => Ok(()),
        }
    }

    match collection {
        "contract" => edge::<ContractStatus>(old, new, "status"),
        "employee" => edge::<EmploymentStatus>(old, new, "employment_status"),
        "coverage" => edge::<CoverageStatus>(old, new, "status"),
        "health_record_composition" => edge::<CompositionStatus>(old, new, "status"),
        "org_identifier" | "org_contact" | "person_identifier" | "person_contact" => {
            edge::<UsabilityStatus>(old, new, "usability_status")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usability_lifecycle() {
        use UsabilityStatus::*;
        assert!(Active.can_transition(Inactive));
        assert!(Inactive.can_transition(Archived));
        assert!(Active.can_transition(KnownError));
        assert!(Archived.can_transition(KnownError));
        assert!(KnownError.can_transition(Archived));
        assert!(!Active.can_transition(Archived));
        assert!(!Archived.can_transition(Active));
        assert!(!Inactive.can_transition(Active));
    }

    #[test]
    fn test_contract_terminal_states() {
        use ContractStatus::*;
        assert!(Draft.can_transition(Active));
        assert!(Active.can_transition(Renewed));
        assert!(!Draft.can_transition(Expired));
        assert!(!Expired.can_transition(Active));
        assert!(!Terminated.can_transition(Active));
        assert!(!Renewed.can_transition(Active));
    }

    #[test]
    fn test_employment_loa_return() {
        use EmploymentStatus::*;
        assert!(Active.can_transition(Loa));
        assert!(Loa.can_transition(Active));
        assert!(Loa.can_transition(Retired));
        assert!(!Terminated.can_transition(Active));
        assert!(!Retired.can_transition(Loa));
    }

    #[test]
    fn test_coverage_cobra_path() {
        use CoverageStatus::*;
        assert!(Pending.can_transition(Active));
        assert!(Active.can_transition(Cobra));
        assert!(Cobra.can_transition(Terminated));
        assert!(!Cobra.can_transition(Active));
        assert!(!Terminated.can_transition(Cobra));
    }

    #[test]
    fn test_composition_supersession_terminal() {
        use CompositionStatus::*;
        assert!(Active.can_transition(Superseded));
        assert!(Active.can_transition(Deleted));
        assert!(!Superseded.can_transition(Active));
        assert!(!Deleted.can_transition(Active));
    }

    #[test]
    fn test_self_transition_is_idempotent() {
        assert!(ContractStatus::Active.can_transition(ContractStatus::Active));
        assert!(ensure_transition(CoverageStatus::Cobra, CoverageStatus::Cobra).is_ok());
    }

    #[test]
    fn test_violation_names_entity_and_edge() {
        let err = ensure_transition(ContractStatus::Expired, ContractStatus::Active).unwrap_err();
        assert_eq!(err.entity, "contract");
        assert_eq!(err.from, "Expired");
        assert_eq!(err.to, "Active");
    }

    #[test]
    fn test_document_transition_checked_by_collection() {
        let old = json!({"status": "EXPIRED"});
        let new = json!({"status": "ACTIVE"});
        assert!(check_document_transition("contract", &old, &new).is_err());
        // Same payload, unknown collection: no machine applies.
        assert!(check_document_transition("org", &old, &new).is_ok());

        let old = json!({"usability_status": "ACTIVE"});
        let new = json!({"usability_status": "KNOWN_ERROR"});
        assert!(check_document_transition("person_contact", &old, &new).is_ok());
    }
}
