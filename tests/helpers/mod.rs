//! Shared builders for integration tests: minimal valid entities and
//! pre-wired org/person/benefits stacks.
#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use wellnecity_edm::config::ValidatorConfig;
use wellnecity_edm::model::*;
use wellnecity_edm::store::MemoryStore;

/// Route registry tracing through the test harness; respects RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn open_store() -> MemoryStore {
    MemoryStore::open(ValidatorConfig::default()).unwrap()
}

pub fn open_advisory_store() -> MemoryStore {
    MemoryStore::open(ValidatorConfig::advisory()).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_org(name: &str) -> Org {
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

pub fn make_org_role(org_id: Uuid, role_type: OrgRoleType) -> OrgRole {
    OrgRole {
        id: Uuid::new_v4(),
        org_id,
        role_type,
        effective_date: date(2024, 1, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Insert an org holding the given role; returns (org_id, role_id).
pub fn seed_org_with_role(store: &MemoryStore, role_type: OrgRoleType) -> (Uuid, Uuid) {
    let org = make_org("Seeded Org");
    store.insert(&org).unwrap();
    let role = make_org_role(org.id, role_type);
    store.insert(&role).unwrap();
    (org.id, role.id)
}

pub fn make_person(first: &str, last: &str) -> Person {
    Person {
        id: Uuid::new_v4(),
        first_name: first.into(),
        last_name: last.into(),
        middle_name: None,
        date_of_birth: Some(date(1987, 6, 15)),
        gender: Some(Gender::Female),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn make_person_contact(person_id: Uuid, preferred: bool) -> PersonContact {
    PersonContact {
        id: Uuid::new_v4(),
        person_id,
        contact_type: ContactType::Email,
        email: Some("member@example.net".into()),
        phone: None,
        address_line_1: None,
        address_line_2: None,
        city: None,
        state: None,
        zip_code: None,
        country: None,
        label: PersonContactLabel::Home,
        is_preferred: preferred,
        usability_status: UsabilityStatus::Active,
        usability_status_date: date(2024, 1, 1),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn make_org_identifier(org_id: Uuid, primary: bool) -> OrgIdentifier {
    OrgIdentifier {
        id: Uuid::new_v4(),
        org_id,
        identifier_type: OrgIdentifierType::TaxId,
        identifier_value: "56-2901844".into(),
        issuing_authority: Some("IRS".into()),
        issue_date: None,
        expiration_date: None,
        usability_status: UsabilityStatus::Active,
        usability_status_date: date(2024, 1, 1),
        is_primary: primary,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A person employed by an org holding the EMPLOYER role.
pub fn seed_employee(store: &MemoryStore) -> (Uuid, Uuid, Uuid) {
    let (org_id, _) = seed_org_with_role(store, OrgRoleType::Employer);
    let person = make_person("Dana", "Whitfield");
    store.insert(&person).unwrap();
    let employee = Employee {
        id: Uuid::new_v4(),
        person_id: person.id,
        employer_org_id: org_id,
        employee_number: Some("E-1041".into()),
        hire_date: date(2022, 3, 14),
        termination_date: None,
        employment_status: EmploymentStatus::Active,
        employment_type: Some(EmploymentType::FullTime),
        job_title: None,
        department: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&employee).unwrap();
    (person.id, org_id, employee.id)
}

pub struct PlanStack {
    pub sponsor_org_id: Uuid,
    pub plan_id: Uuid,
    pub coverage_type_id: Uuid,
    pub coverage_id: Uuid,
    pub plan_limit_id: Uuid,
    pub subscriber_person_id: Uuid,
    pub subscriber_member_id: Uuid,
}

/// Sponsor org + plan + coverage tier + coverage + a deductible limit +
/// an enrolled subscriber.
pub fn seed_plan_stack(store: &MemoryStore, period_type: PeriodType) -> PlanStack {
    let (sponsor_org_id, _) = seed_org_with_role(store, OrgRoleType::HealthPlanSponsor);

    let plan = BenefitPlan {
        id: Uuid::new_v4(),
        sponsor_org_id,
        org_structure_node_id: None,
        plan_name: "Standard PPO".into(),
        plan_code: Some("PPO-STD-2025".into()),
        plan_type: PlanType::Ppo,
        benefit_type: BenefitType::Medical,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&plan).unwrap();

    let tier = CoverageType {
        id: Uuid::new_v4(),
        benefit_plan_id: plan.id,
        name: CoverageTier::Family,
        in_network_deductible_individual: Some("1500.00".parse().unwrap()),
        in_network_deductible_family: Some("3000.00".parse().unwrap()),
        in_network_coinsurance: Some("20".parse().unwrap()),
        in_network_oop_max_individual: Some("6500.00".parse().unwrap()),
        in_network_oop_max_family: Some("13000.00".parse().unwrap()),
        out_of_network_deductible_individual: None,
        out_of_network_deductible_family: None,
        out_of_network_coinsurance: None,
        out_of_network_oop_max_individual: None,
        out_of_network_oop_max_family: None,
        copay_primary_care: Some("25.00".parse().unwrap()),
        copay_specialist: Some("50.00".parse().unwrap()),
        copay_emergency: None,
        copay_urgent_care: None,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&tier).unwrap();

    let coverage = Coverage {
        id: Uuid::new_v4(),
        coverage_type_id: tier.id,
        benefit_plan_id: plan.id,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        status: CoverageStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&coverage).unwrap();

    let limit = PlanLimit {
        id: Uuid::new_v4(),
        benefit_plan_id: plan.id,
        limit_type: LimitType::Deductible,
        network_type: NetworkType::InNetwork,
        level: LimitLevel::Individual,
        benefit_category: Some(BenefitCategory::Medical),
        limit_amount: Some("1500.00".parse().unwrap()),
        limit_count: None,
        period_type,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&limit).unwrap();

    let subscriber_person = make_person("Avery", "Sullivan");
    store.insert(&subscriber_person).unwrap();
    let subscriber = make_plan_member(
        subscriber_person.id,
        coverage.id,
        PlanMemberType::Subscriber,
        None,
    );
    store.insert(&subscriber).unwrap();

    PlanStack {
        sponsor_org_id,
        plan_id: plan.id,
        coverage_type_id: tier.id,
        coverage_id: coverage.id,
        plan_limit_id: limit.id,
        subscriber_person_id: subscriber_person.id,
        subscriber_member_id: subscriber.id,
    }
}

pub fn make_plan_member(
    person_id: Uuid,
    coverage_id: Uuid,
    member_type: PlanMemberType,
    subscriber_plan_member_id: Option<Uuid>,
) -> PlanMember {
    PlanMember {
        id: Uuid::new_v4(),
        person_id,
        coverage_id,
        subscriber_plan_member_id,
        member_type,
        subscriber_relationship_type: match member_type {
            PlanMemberType::Subscriber => Some(SubscriberRelationship::Self_),
            PlanMemberType::Dependent => Some(SubscriberRelationship::Child),
        },
        wellnecity_id: None,
        subscriber_id: None,
        effective_date: date(2025, 7, 1),
        termination_date: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A member (person) plus the employer org used by compositions.
pub fn seed_member(store: &MemoryStore) -> (Uuid, Uuid) {
    let org = make_org("Employer of Record");
    store.insert(&org).unwrap();
    let person = make_person("Morgan", "Ellis");
    store.insert(&person).unwrap();
    (person.id, org.id)
}

pub fn make_composition(member_id: Uuid, employer_id: Uuid) -> HealthRecordComposition {
    HealthRecordComposition {
        id: Uuid::new_v4(),
        member_id,
        employer_id,
        archetype_id: "openEHR-EHR-COMPOSITION.encounter.v1".into(),
        template_id: None,
        composition_type: CompositionType::Encounter,
        category: CompositionCategory::Event,
        context_start_time: Utc::now(),
        context_end_time: None,
        context_setting: Some("primary_care".into()),
        context_location: None,
        composer_id: None,
        composer_name: None,
        language: Some("en".into()),
        territory: Some("US".into()),
        version_number: 1,
        is_current: true,
        preceding_version_id: None,
        status: CompositionStatus::Active,
        fhir_bundle_id: None,
        source: Some("ehr_feed".into()),
        source_id: Some("enc-000172".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
