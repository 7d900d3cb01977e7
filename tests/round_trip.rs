//! Storage round-trips: writing a valid entity and reading it back
//! yields field-for-field equality, including decimal precision on
//! monetary fields and nested clinical structures.

mod helpers;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use helpers::*;
use wellnecity_edm::model::*;

#[test]
fn coverage_type_round_trips_with_decimal_precision() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);

    let (tier, _) = store.get::<CoverageType>(stack.coverage_type_id).unwrap().unwrap();
    assert_eq!(
        tier.in_network_deductible_individual,
        Some("1500.00".parse::<Decimal>().unwrap())
    );
    // Trailing zeros survive the document form.
    assert_eq!(
        tier.in_network_deductible_individual.unwrap().to_string(),
        "1500.00"
    );
    assert_eq!(tier.copay_specialist.unwrap().to_string(), "50.00");
}

#[test]
fn portfolio_owner_variants_round_trip() {
    let store = open_advisory_store();
    let owner_org = make_org("Owning Org");
    store.insert(&owner_org).unwrap();

    for owner in [
        PortfolioOwner::Org(owner_org.id),
        PortfolioOwner::Unowned,
    ] {
        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            name: "Regional Book".into(),
            description: Some("Carolinas region".into()),
            portfolio_type: PortfolioType::Wellnecity,
            owner,
            parent_portfolio_id: None,
            effective_date: date(2024, 1, 1),
            termination_date: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert(&portfolio).unwrap();
        let (read, _) = store.get::<Portfolio>(portfolio.id).unwrap().unwrap();
        assert_eq!(read, portfolio);
        assert_eq!(read.owner, owner);
    }
}

#[test]
fn allergy_with_nested_reactions_round_trips() {
    let store = open_advisory_store();
    let (member_id, _) = seed_member(&store);

    let allergy = Allergy {
        id: Uuid::new_v4(),
        composition_id: None,
        member_id,
        archetype_id: "openEHR-EHR-EVALUATION.adverse_reaction_risk.v1".into(),
        substance_name: "Penicillin".into(),
        substance_code: Some("7980".into()),
        substance_code_system: Some("http://www.nlm.nih.gov/research/umls/rxnorm".into()),
        substance_code_display: None,
        category: Some(AllergyCategory::Medication),
        allergy_type: Some(AllergyType::Allergy),
        criticality: Some(Criticality::High),
        clinical_status: AllergyClinicalStatus::Active,
        verification_status: Some(AllergyVerificationStatus::Confirmed),
        onset_date: Some(date(2019, 4, 2)),
        recorded_date: date(2025, 1, 20),
        recorder_id: None,
        asserter_id: None,
        last_occurrence: None,
        reaction_manifestation: Some(vec![ReactionManifestation {
            code: Some("271807003".into()),
            system: Some("http://snomed.info/sct".into()),
            display: Some("Eruption of skin".into()),
            text: None,
        }]),
        reaction_severity: Some(Severity::Moderate),
        reaction_onset: None,
        reaction_description: Some("Hives within an hour of the first dose".into()),
        reaction_exposure_route: Some("oral".into()),
        clinical_note: None,
        fhir_allergy_id: Some("allergy-8812".into()),
        source: Some("ehr_feed".into()),
        source_id: Some("alg-04417".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&allergy).unwrap();

    let (read, _) = store.get::<Allergy>(allergy.id).unwrap().unwrap();
    assert_eq!(read, allergy);
    let reactions = read.reaction_manifestation.unwrap();
    assert_eq!(reactions[0].display.as_deref(), Some("Eruption of skin"));
}

#[test]
fn plan_member_and_employee_round_trip() {
    let store = open_store();
    let stack = seed_plan_stack(&store, PeriodType::CalendarYear);
    let (subscriber, _) = store
        .get::<PlanMember>(stack.subscriber_member_id)
        .unwrap()
        .unwrap();
    assert_eq!(subscriber.member_type, PlanMemberType::Subscriber);
    assert_eq!(
        subscriber.subscriber_relationship_type,
        Some(SubscriberRelationship::Self_)
    );

    let (_, _, employee_id) = seed_employee(&store);
    let (employee, _) = store.get::<Employee>(employee_id).unwrap().unwrap();
    assert_eq!(employee.employment_status, EmploymentStatus::Active);
    assert_eq!(employee.hire_date, date(2022, 3, 14));
}

#[test]
fn medication_round_trips_dose_decimals() {
    let store = open_advisory_store();
    let (member_id, _) = seed_member(&store);

    let medication = Medication {
        id: Uuid::new_v4(),
        composition_id: None,
        member_id,
        archetype_id: "openEHR-EHR-INSTRUCTION.medication_order.v3".into(),
        entry_type: MedicationEntryType::Instruction,
        medication_name: "Lisinopril 10 MG Oral Tablet".into(),
        medication_code: Some("314076".into()),
        medication_code_system: Some("http://www.nlm.nih.gov/research/umls/rxnorm".into()),
        medication_code_display: None,
        status: MedicationStatus::Active,
        intent: Some(MedicationIntent::Order),
        category: Some(MedicationCategory::Community),
        dosage_text: Some("Take one tablet by mouth daily".into()),
        dose_quantity: Some("10.0".parse().unwrap()),
        dose_unit: Some("mg".into()),
        route: Some("oral".into()),
        route_code: None,
        frequency_text: Some("QD".into()),
        frequency_period: Some("1".parse().unwrap()),
        frequency_period_unit: Some("d".into()),
        as_needed: Some(false),
        as_needed_reason: None,
        start_date: Some(date(2025, 2, 1)),
        end_date: None,
        authored_on: Utc::now(),
        prescriber_id: Some("1093817465".into()),
        prescriber_name: None,
        dispense_quantity: Some("30".parse().unwrap()),
        dispense_unit: Some("tablet".into()),
        refills_allowed: Some(3),
        substitution_allowed: Some(true),
        reason_code: Some("I10".into()),
        reason_text: Some("Essential hypertension".into()),
        clinical_note: None,
        fhir_medication_id: None,
        rx_claim_id: None,
        source: Some("pbm_feed".into()),
        source_id: Some("rx-99103".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.insert(&medication).unwrap();

    let (read, _) = store.get::<Medication>(medication.id).unwrap().unwrap();
    assert_eq!(read, medication);
    assert_eq!(read.dose_quantity.unwrap().to_string(), "10.0");
}
