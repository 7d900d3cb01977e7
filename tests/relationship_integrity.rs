//! Cross-entity invariants at commit time: role/detail binding, required
//! org roles, reference existence (strict vs advisory), exclusive
//! portfolio ownership, subscriber topology, and hierarchy rules.

mod helpers;

use chrono::Utc;
use uuid::Uuid;

use helpers::*;
use wellnecity_edm::error::{EdmError, RelationshipViolation};
use wellnecity_edm::model::*;
use wellnecity_edm::store::WriteBatch;

fn make_employer_details(org_role_id: Uuid) -> EmployerDetails {
    EmployerDetails {
        id: Uuid::new_v4(),
        org_role_id,
        naics_code: Some("524292".into()),
        sic_code: None,
        industry: Some("Third-party administration".into()),
        size_tier: Some(SizeTier::Medium),
        employee_count: Some(410),
        fein: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn employer_details_require_an_employer_role() {
    let store = open_store();
    let (_, broker_role_id) = seed_org_with_role(&store, OrgRoleType::Broker);

    let result = store.insert(&make_employer_details(broker_role_id));
    match result {
        Err(EdmError::Relationship(RelationshipViolation::RoleTypeMismatch {
            expected,
            actual,
            ..
        })) => {
            assert_eq!(expected, "EMPLOYER");
            assert_eq!(actual, "BROKER");
        }
        other => panic!("Expected RoleTypeMismatch, got {other:?}"),
    }

    let (_, employer_role_id) = seed_org_with_role(&store, OrgRoleType::Employer);
    store.insert(&make_employer_details(employer_role_id)).unwrap();
}

#[test]
fn missing_reference_is_strict_by_default_and_advisory_when_configured() {
    let strict = open_store();
    let role = make_org_role(Uuid::new_v4(), OrgRoleType::Client);
    match strict.insert(&role) {
        Err(EdmError::Relationship(RelationshipViolation::MissingReference {
            field,
            target_collection,
            ..
        })) => {
            assert_eq!(field, "org_id");
            assert_eq!(target_collection, "org");
        }
        other => panic!("Expected MissingReference, got {other:?}"),
    }

    let advisory = open_advisory_store();
    advisory.insert(&role).unwrap();
}

#[test]
fn employee_requires_employer_role_on_org() {
    let store = open_store();
    // An org that exists but only holds a VENDOR role.
    let (org_id, _) = seed_org_with_role(&store, OrgRoleType::Vendor);
    let person = make_person("Jordan", "Reyes");
    store.insert(&person).unwrap();

    let employee = Employee {
        id: Uuid::new_v4(),
        person_id: person.id,
        employer_org_id: org_id,
        employee_number: None,
        hire_date: date(2023, 9, 1),
        termination_date: None,
        employment_status: EmploymentStatus::Active,
        employment_type: None,
        job_title: None,
        department: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    match store.insert(&employee) {
        Err(EdmError::Relationship(RelationshipViolation::MissingRole { role_type, .. })) => {
            assert_eq!(role_type, "EMPLOYER");
        }
        other => panic!("Expected MissingRole, got {other:?}"),
    }
}

#[test]
fn portfolio_with_both_owners_is_rejected_as_raw_document() {
    let store = open_advisory_store();
    let doc = serde_json::json!({
        "_id": Uuid::new_v4().to_string(),
        "name": "Book of Business",
        "portfolio_type": "BROKER",
        "owner_org_id": Uuid::new_v4().to_string(),
        "owner_person_id": Uuid::new_v4().to_string(),
        "effective_date": "2024-01-01",
        "is_active": true,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    });
    let result = store.commit(WriteBatch::new().insert_document("portfolio", doc).unwrap());
    assert!(matches!(
        result,
        Err(EdmError::Relationship(RelationshipViolation::AmbiguousOwner { .. }))
    ));
}

#[test]
fn second_subscriber_on_a_coverage_is_rejected() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let other_person = make_person("Riley", "Nakamura");
    store.insert(&other_person).unwrap();
    let second_subscriber = make_plan_member(
        other_person.id,
        stack.coverage_id,
        PlanMemberType::Subscriber,
        None,
    );
    match store.insert(&second_subscriber) {
        Err(EdmError::Relationship(RelationshipViolation::SubscriberCount { count, .. })) => {
            assert_eq!(count, 2);
        }
        other => panic!("Expected SubscriberCount, got {other:?}"),
    }
}

#[test]
fn dependents_must_reference_the_coverage_subscriber() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let child = make_person("Sam", "Sullivan");
    store.insert(&child).unwrap();
    let dependent = make_plan_member(
        child.id,
        stack.coverage_id,
        PlanMemberType::Dependent,
        Some(stack.subscriber_member_id),
    );
    store.insert(&dependent).unwrap();

    // A second dependent chaining to the first dependent is invalid.
    let second_child = make_person("Alex", "Sullivan");
    store.insert(&second_child).unwrap();
    let bad = make_plan_member(
        second_child.id,
        stack.coverage_id,
        PlanMemberType::Dependent,
        Some(dependent.id),
    );
    assert!(matches!(
        store.insert(&bad),
        Err(EdmError::Relationship(RelationshipViolation::InvalidDependentLink { .. }))
    ));

    // A dependent referencing itself is invalid.
    let third_child = make_person("Casey", "Sullivan");
    store.insert(&third_child).unwrap();
    let mut selfish = make_plan_member(
        third_child.id,
        stack.coverage_id,
        PlanMemberType::Dependent,
        None,
    );
    selfish.subscriber_plan_member_id = Some(selfish.id);
    assert!(matches!(
        store.insert(&selfish),
        Err(EdmError::Relationship(RelationshipViolation::InvalidDependentLink { .. }))
    ));
}

#[test]
fn org_structure_levels_and_cycles_are_enforced() {
    let store = open_store();
    let org = make_org("Structured Org");
    store.insert(&org).unwrap();

    let structure = OrgStructure {
        id: Uuid::new_v4(),
        org_id: org.id,
        structure_type: OrgStructureType::Financial,
        name: "Financial Divisions".into(),
        description: None,
        effective_date: date(2024, 1, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&structure).unwrap();

    let make_node = |parent: Option<Uuid>, level: i32| OrgStructureNode {
        id: Uuid::new_v4(),
        org_structure_id: structure.id,
        parent_node_id: parent,
        node_code: None,
        name: "Division".into(),
        description: None,
        level,
        sort_order: Some(1),
        effective_date: date(2024, 1, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let root = make_node(None, 0);
    store.insert(&root).unwrap();

    // Child must sit exactly one level below its parent.
    let skipping = make_node(Some(root.id), 2);
    assert!(matches!(
        store.insert(&skipping),
        Err(EdmError::Relationship(RelationshipViolation::LevelMismatch { .. }))
    ));

    let child = make_node(Some(root.id), 1);
    store.insert(&child).unwrap();

    // Roots sit at level 0.
    let floating_root = make_node(None, 4);
    assert!(matches!(
        store.insert(&floating_root),
        Err(EdmError::Relationship(RelationshipViolation::RootLevel { level: 4, .. }))
    ));

    // Re-parenting the root under its own child closes a cycle.
    let (mut reparented, revision) = store.get::<OrgStructureNode>(root.id).unwrap().unwrap();
    reparented.parent_node_id = Some(child.id);
    reparented.level = 2;
    assert!(matches!(
        store.update(&reparented, revision),
        Err(EdmError::Relationship(RelationshipViolation::ReferenceCycle { .. }))
    ));
}

#[test]
fn eligibility_enrollment_correlation_is_configurable() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);
    let (_, _, employee_id) = seed_employee(&store);

    // The employee's person is not enrolled in any of the plan's
    // coverages; advisory by default, so the write succeeds.
    let eligibility = Eligibility {
        id: Uuid::new_v4(),
        employee_id,
        benefit_plan_id: stack.plan_id,
        status: EligibilityStatus::EligibleEnrolled,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&eligibility).unwrap();

    // Promoted to a hard violation when configured.
    let mut config = wellnecity_edm::config::ValidatorConfig::default();
    config.enforce_enrollment_correlation = true;
    let strict = wellnecity_edm::store::MemoryStore::open(config).unwrap();
    let stack = seed_plan_stack(&strict, PeriodType::CalendarYear);
    let (_, _, employee_id) = seed_employee(&strict);
    let eligibility = Eligibility {
        id: Uuid::new_v4(),
        employee_id,
        benefit_plan_id: stack.plan_id,
        status: EligibilityStatus::EligibleEnrolled,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    assert!(matches!(
        strict.insert(&eligibility),
        Err(EdmError::Relationship(RelationshipViolation::EnrollmentMissing { .. }))
    ));
}
