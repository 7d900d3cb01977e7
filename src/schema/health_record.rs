//! Health-record collection specs
//!
//! The clinical TLD: versioned openEHR-style compositions, the ten child
//! clinical entry collections, and the append-only provenance audit log.
//! Every clinical entry carries parallel source-system identity
//! (source/source_id) and an optional FHIR resource id for external
//! mapping.

use super::collection::{CollectionSpec, IndexSpec};
use super::field::{opt, req, FieldSpec, FieldType};
use super::{LANGUAGE_CODE, TERRITORY_CODE};
use crate::error::Result;

/// FHIR observation statuses shared by vital_sign and lab_result.
const OBSERVATION_STATUS: &[&str] = &[
    "registered",
    "preliminary",
    "final",
    "amended",
    "corrected",
    "cancelled",
    "entered-in-error",
];

const SEVERITY: &[&str] = &["mild", "moderate", "severe"];

/// Common scaffold for clinical entry collections: primary key, optional
/// composition membership, owning member, and the openEHR archetype id.
fn clinical_entry(name: &'static str, description: &'static str) -> CollectionSpec {
    CollectionSpec::new(name, description)
        .field(req("_id", FieldType::Uuid))
        .field(opt("composition_id", FieldType::Uuid))
        .field(req("member_id", FieldType::Uuid))
        .field(req("archetype_id", FieldType::string_max(255)))
}

/// Trailing source-system identity fields shared by every clinical entry.
fn source_identity() -> Vec<FieldSpec> {
    vec![
        opt("source", FieldType::string_max(50)),
        opt("source_id", FieldType::string_max(100)),
    ]
}

pub fn health_record_composition() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "health_record_composition",
        "Container that groups related clinical entries following the openEHR COMPOSITION pattern",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("member_id", FieldType::Uuid))
    .field(req("employer_id", FieldType::Uuid))
    .field(req("archetype_id", FieldType::string_max(255)))
    .field(opt("template_id", FieldType::string_max(255)))
    .field(req(
        "composition_type",
        FieldType::enumeration(&[
            "ENCOUNTER",
            "DISCHARGE_SUMMARY",
            "PROBLEM_LIST",
            "MEDICATION_LIST",
            "LAB_REPORT",
            "VITAL_SIGNS",
        ]),
    ))
    .field(req(
        "category",
        FieldType::enumeration(&["EVENT", "PERSISTENT", "EPISODIC"]),
    ))
    .field(req("context_start_time", FieldType::Date))
    .field(opt("context_end_time", FieldType::Date))
    .field(opt("context_setting", FieldType::string_max(100)))
    .field(opt("context_location", FieldType::string_max(255)))
    .field(opt("composer_id", FieldType::string_max(100)))
    .field(opt("composer_name", FieldType::string_max(255)))
    .field(opt("language", FieldType::string_pattern(LANGUAGE_CODE)?))
    .field(opt("territory", FieldType::string_pattern(TERRITORY_CODE)?))
    .field(req("version_number", FieldType::int_min(1)))
    .field(req("is_current", FieldType::Bool))
    .field(opt("preceding_version_id", FieldType::Uuid))
    .field(req(
        "status",
        FieldType::enumeration(&["ACTIVE", "SUPERSEDED", "DELETED"]),
    ))
    .field(opt("fhir_bundle_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["employer_id"]))
    .index(IndexSpec::ascending(&["composition_type"]))
    .index(IndexSpec::ascending(&["context_start_time"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["is_current"]))
    .index(IndexSpec::ascending(&["fhir_bundle_id"]).sparse()))
}

pub fn problem() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "problem",
        "Diagnoses, health problems, and clinical conditions",
    )
    .field(req("problem_name", FieldType::string_max(500)))
    .field(opt("problem_code", FieldType::string_max(20)))
    .field(opt("problem_code_system", FieldType::string_max(100)))
    .field(opt("problem_code_display", FieldType::string_max(500)))
    .field(req(
        "clinical_status",
        FieldType::enumeration(&[
            "active",
            "recurrence",
            "relapse",
            "inactive",
            "remission",
            "resolved",
        ]),
    ))
    .field(opt(
        "verification_status",
        FieldType::enumeration(&[
            "unconfirmed",
            "provisional",
            "differential",
            "confirmed",
            "refuted",
            "entered-in-error",
        ]),
    ))
    .field(opt(
        "category",
        FieldType::enumeration(&["problem-list-item", "encounter-diagnosis", "health-concern"]),
    ))
    .field(opt("severity", FieldType::enumeration(SEVERITY)))
    .field(opt("body_site", FieldType::string_max(255)))
    .field(opt("body_site_code", FieldType::string_max(20)))
    .field(opt("onset_date", FieldType::Date))
    .field(opt("onset_age", FieldType::string_max(50)))
    .field(opt("abatement_date", FieldType::Date))
    .field(req("recorded_date", FieldType::Date))
    .field(opt("recorder_id", FieldType::string_max(100)))
    .field(opt("asserter_id", FieldType::string_max(100)))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_condition_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["clinical_status"]))
    .index(IndexSpec::ascending(&["problem_code"]))
    .index(IndexSpec::ascending(&["recorded_date"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["fhir_condition_id"]).sparse()))
}

pub fn allergy() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "allergy",
        "Allergies, intolerances, and adverse reaction risks",
    )
    .field(req("substance_name", FieldType::string_max(255)))
    .field(opt("substance_code", FieldType::string_max(50)))
    .field(opt("substance_code_system", FieldType::string_max(100)))
    .field(opt("substance_code_display", FieldType::string_max(255)))
    .field(opt(
        "category",
        FieldType::enumeration(&["food", "medication", "environment", "biologic"]),
    ))
    .field(opt(
        "allergy_type",
        FieldType::enumeration(&["allergy", "intolerance"]),
    ))
    .field(opt(
        "criticality",
        FieldType::enumeration(&["low", "high", "unable-to-assess"]),
    ))
    .field(req(
        "clinical_status",
        FieldType::enumeration(&["active", "inactive", "resolved"]),
    ))
    .field(opt(
        "verification_status",
        FieldType::enumeration(&[
            "unconfirmed",
            "presumed",
            "confirmed",
            "refuted",
            "entered-in-error",
        ]),
    ))
    .field(opt("onset_date", FieldType::Date))
    .field(req("recorded_date", FieldType::Date))
    .field(opt("recorder_id", FieldType::string_max(100)))
    .field(opt("asserter_id", FieldType::string_max(100)))
    .field(opt("last_occurrence", FieldType::Date))
    .field(opt(
        "reaction_manifestation",
        FieldType::array_of(FieldType::object(vec![
            opt("code", FieldType::string()),
            opt("system", FieldType::string()),
            opt("display", FieldType::string()),
            opt("text", FieldType::string()),
        ])),
    ))
    .field(opt("reaction_severity", FieldType::enumeration(SEVERITY)))
    .field(opt("reaction_onset", FieldType::string_max(50)))
    .field(opt("reaction_description", FieldType::string()))
    .field(opt("reaction_exposure_route", FieldType::string_max(100)))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_allergy_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["clinical_status"]))
    .index(IndexSpec::ascending(&["substance_code"]))
    .index(IndexSpec::ascending(&["category"]))
    .index(IndexSpec::ascending(&["criticality"]))
    .index(IndexSpec::ascending(&["fhir_allergy_id"]).sparse()))
}

pub fn medication() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "medication",
        "Medication orders, prescriptions, and administration records",
    )
    .field(req(
        "entry_type",
        FieldType::enumeration(&["INSTRUCTION", "ACTION"]),
    ))
    .field(req("medication_name", FieldType::string_max(500)))
    .field(opt("medication_code", FieldType::string_max(20)))
    .field(opt("medication_code_system", FieldType::string_max(100)))
    .field(opt("medication_code_display", FieldType::string_max(500)))
    .field(req(
        "status",
        FieldType::enumeration(&[
            "active",
            "completed",
            "cancelled",
            "stopped",
            "on-hold",
            "draft",
            "entered-in-error",
        ]),
    ))
    .field(opt(
        "intent",
        FieldType::enumeration(&["order", "plan", "proposal", "instance-order"]),
    ))
    .field(opt(
        "category",
        FieldType::enumeration(&["inpatient", "outpatient", "community", "discharge"]),
    ))
    .field(opt("dosage_text", FieldType::string_max(500)))
    .field(opt("dose_quantity", FieldType::Decimal))
    .field(opt("dose_unit", FieldType::string_max(50)))
    .field(opt("route", FieldType::string_max(100)))
    .field(opt("route_code", FieldType::string_max(20)))
    .field(opt("frequency_text", FieldType::string_max(100)))
    .field(opt("frequency_period", FieldType::Decimal))
    .field(opt("frequency_period_unit", FieldType::string_max(20)))
    .field(opt("as_needed", FieldType::Bool))
    .field(opt("as_needed_reason", FieldType::string_max(255)))
    .field(opt("start_date", FieldType::Date))
    .field(opt("end_date", FieldType::Date))
    .field(req("authored_on", FieldType::Date))
    .field(opt("prescriber_id", FieldType::string_max(100)))
    .field(opt("prescriber_name", FieldType::string_max(255)))
    .field(opt("dispense_quantity", FieldType::Decimal))
    .field(opt("dispense_unit", FieldType::string_max(50)))
    .field(opt("refills_allowed", FieldType::int()))
    .field(opt("substitution_allowed", FieldType::Bool))
    .field(opt("reason_code", FieldType::string_max(20)))
    .field(opt("reason_text", FieldType::string_max(500)))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_medication_id", FieldType::string_max(100)))
    .field(opt("rx_claim_id", FieldType::Uuid))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["medication_code"]))
    .index(IndexSpec::ascending(&["entry_type"]))
    .index(IndexSpec::ascending(&["authored_on"]))
    .index(IndexSpec::ascending(&["rx_claim_id"]))
    .index(IndexSpec::ascending(&["fhir_medication_id"]).sparse()))
}

pub fn vital_sign() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "vital_sign",
        "Vital sign observations (BP, pulse, temperature, etc.)",
    )
    .field(req(
        "vital_type",
        FieldType::enumeration(&[
            "BLOOD_PRESSURE",
            "PULSE",
            "TEMPERATURE",
            "RESPIRATORY_RATE",
            "OXYGEN_SATURATION",
            "HEIGHT",
            "WEIGHT",
            "BMI",
        ]),
    ))
    .field(opt("vital_code", FieldType::string_max(20)))
    .field(opt("vital_code_system", FieldType::string_max(100)))
    .field(opt("vital_code_display", FieldType::string_max(255)))
    .field(req("status", FieldType::enumeration(OBSERVATION_STATUS)))
    .field(req("effective_datetime", FieldType::Date))
    .field(opt("value_quantity", FieldType::Decimal))
    .field(opt("value_unit", FieldType::string_max(30)))
    .field(opt("value_systolic", FieldType::Decimal))
    .field(opt("value_diastolic", FieldType::Decimal))
    .field(opt("value_text", FieldType::string_max(255)))
    .field(opt("interpretation", FieldType::string_max(50)))
    .field(opt("body_site", FieldType::string_max(100)))
    .field(opt("body_site_code", FieldType::string_max(20)))
    .field(opt("method", FieldType::string_max(100)))
    .field(opt("device", FieldType::string_max(255)))
    .field(opt("performer_id", FieldType::string_max(100)))
    .field(opt("performer_name", FieldType::string_max(255)))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_observation_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["vital_type"]))
    .index(IndexSpec::ascending(&["effective_datetime"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["fhir_observation_id"]).sparse()))
}

pub fn lab_result() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "lab_result",
        "Laboratory test results and diagnostic observations",
    )
    .field(opt("diagnostic_report_id", FieldType::Uuid))
    .field(req("test_name", FieldType::string_max(500)))
    .field(opt("test_code", FieldType::string_max(20)))
    .field(opt("test_code_system", FieldType::string_max(100)))
    .field(opt("test_code_display", FieldType::string_max(500)))
    .field(opt("category", FieldType::string_max(50)))
    .field(req("status", FieldType::enumeration(OBSERVATION_STATUS)))
    .field(req("effective_datetime", FieldType::Date))
    .field(opt("issued", FieldType::Date))
    .field(opt("value_quantity", FieldType::Decimal))
    .field(opt("value_unit", FieldType::string_max(50)))
    .field(opt("value_string", FieldType::string_max(1000)))
    .field(opt("value_codeable_concept", FieldType::string_max(100)))
    .field(opt("value_codeable_system", FieldType::string_max(100)))
    .field(opt("reference_range_low", FieldType::Decimal))
    .field(opt("reference_range_high", FieldType::Decimal))
    .field(opt("reference_range_text", FieldType::string_max(255)))
    .field(opt("interpretation", FieldType::string_max(50)))
    .field(opt("specimen_type", FieldType::string_max(100)))
    .field(opt("specimen_code", FieldType::string_max(20)))
    .field(opt("performing_lab", FieldType::string_max(255)))
    .field(opt("performing_lab_id", FieldType::string_max(100)))
    .field(opt("ordering_provider_id", FieldType::string_max(100)))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_observation_id", FieldType::string_max(100)))
    .field(opt("medical_claim_id", FieldType::Uuid))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["test_code"]))
    .index(IndexSpec::ascending(&["effective_datetime"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["diagnostic_report_id"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["medical_claim_id"]))
    .index(IndexSpec::ascending(&["fhir_observation_id"]).sparse()))
}

pub fn procedure_record() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "procedure_record",
        "Clinical procedures performed on the patient",
    )
    .field(req("procedure_name", FieldType::string_max(500)))
    .field(opt("procedure_code", FieldType::string_max(20)))
    .field(opt("procedure_code_system", FieldType::string_max(100)))
    .field(opt("procedure_code_display", FieldType::string_max(500)))
    .field(req(
        "status",
        FieldType::enumeration(&[
            "preparation",
            "in-progress",
            "not-done",
            "on-hold",
            "stopped",
            "completed",
            "entered-in-error",
            "unknown",
        ]),
    ))
    .field(opt("status_reason", FieldType::string_max(255)))
    .field(opt("category", FieldType::string_max(50)))
    .field(opt("performed_datetime", FieldType::Date))
    .field(opt("performed_period_start", FieldType::Date))
    .field(opt("performed_period_end", FieldType::Date))
    .field(opt("body_site", FieldType::string_max(255)))
    .field(opt("body_site_code", FieldType::string_max(20)))
    .field(opt(
        "laterality",
        FieldType::enumeration(&["left", "right", "bilateral"]),
    ))
    .field(opt("performer_id", FieldType::string_max(100)))
    .field(opt("performer_name", FieldType::string_max(255)))
    .field(opt("performer_role", FieldType::string_max(100)))
    .field(opt("location_id", FieldType::string_max(100)))
    .field(opt("location_name", FieldType::string_max(255)))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("reason_code", FieldType::string_max(20)))
    .field(opt("reason_text", FieldType::string_max(500)))
    .field(opt("outcome", FieldType::string_max(255)))
    .field(opt("complication", FieldType::string_max(500)))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_procedure_id", FieldType::string_max(100)))
    .field(opt("medical_claim_id", FieldType::Uuid))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["procedure_code"]))
    .index(IndexSpec::ascending(&["performed_datetime"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["medical_claim_id"]))
    .index(IndexSpec::ascending(&["fhir_procedure_id"]).sparse()))
}

pub fn immunization() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "immunization",
        "Vaccination and immunization records",
    )
    .field(req("vaccine_name", FieldType::string_max(500)))
    .field(opt("vaccine_code", FieldType::string_max(20)))
    .field(opt("vaccine_code_system", FieldType::string_max(100)))
    .field(opt("vaccine_code_display", FieldType::string_max(500)))
    .field(req(
        "status",
        FieldType::enumeration(&["completed", "entered-in-error", "not-done"]),
    ))
    .field(opt("status_reason", FieldType::string_max(255)))
    .field(req("occurrence_datetime", FieldType::Date))
    .field(opt("recorded_date", FieldType::Date))
    .field(opt("primary_source", FieldType::Bool))
    .field(opt("report_origin", FieldType::string_max(100)))
    .field(opt("lot_number", FieldType::string_max(50)))
    .field(opt("expiration_date", FieldType::Date))
    .field(opt("site", FieldType::string_max(100)))
    .field(opt("site_code", FieldType::string_max(20)))
    .field(opt("route", FieldType::string_max(100)))
    .field(opt("route_code", FieldType::string_max(20)))
    .field(opt("dose_quantity", FieldType::Decimal))
    .field(opt("dose_unit", FieldType::string_max(50)))
    .field(opt("performer_id", FieldType::string_max(100)))
    .field(opt("performer_name", FieldType::string_max(255)))
    .field(opt("location_id", FieldType::string_max(100)))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_immunization_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["vaccine_code"]))
    .index(IndexSpec::ascending(&["occurrence_datetime"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["fhir_immunization_id"]).sparse()))
}

pub fn clinical_note() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "clinical_note",
        "Clinical narratives, summaries, and documentation",
    )
    .field(req(
        "document_type",
        FieldType::enumeration(&[
            "progress_note",
            "discharge_summary",
            "consultation",
            "history_physical",
            "procedure_note",
            "operative_note",
            "radiology_report",
            "pathology_report",
            "other",
        ]),
    ))
    .field(opt("document_type_code", FieldType::string_max(20)))
    .field(req(
        "document_status",
        FieldType::enumeration(&["current", "superseded", "entered-in-error"]),
    ))
    .field(opt(
        "doc_status",
        FieldType::enumeration(&["preliminary", "final", "amended", "corrected"]),
    ))
    .field(opt("title", FieldType::string_max(500)))
    .field(opt("content_text", FieldType::string()))
    .field(opt(
        "content_format",
        FieldType::enumeration(&["text/plain", "text/html", "application/pdf"]),
    ))
    .field(opt("content_url", FieldType::string_max(1000)))
    .field(opt("content_size", FieldType::int()))
    .field(opt("content_hash", FieldType::string_max(64)))
    .field(req("created_datetime", FieldType::Date))
    .field(opt("author_id", FieldType::string_max(100)))
    .field(opt("author_name", FieldType::string_max(255)))
    .field(opt("authenticator_id", FieldType::string_max(100)))
    .field(opt("custodian_id", FieldType::string_max(100)))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("clinical_context", FieldType::string_max(255)))
    .field(opt("fhir_document_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["document_type"]))
    .index(IndexSpec::ascending(&["created_datetime"]))
    .index(IndexSpec::ascending(&["document_status"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["fhir_document_id"]).sparse()))
}

pub fn care_plan() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "care_plan",
        "Care plans, treatment plans, and goals",
    )
    .field(req("plan_title", FieldType::string_max(500)))
    .field(opt("plan_description", FieldType::string()))
    .field(req(
        "status",
        FieldType::enumeration(&[
            "draft",
            "active",
            "on-hold",
            "revoked",
            "completed",
            "entered-in-error",
            "unknown",
        ]),
    ))
    .field(req(
        "intent",
        FieldType::enumeration(&["proposal", "plan", "order", "option"]),
    ))
    .field(opt("category", FieldType::string_max(50)))
    .field(opt("period_start", FieldType::Date))
    .field(opt("period_end", FieldType::Date))
    .field(req("created_datetime", FieldType::Date))
    .field(opt("author_id", FieldType::string_max(100)))
    .field(opt("author_name", FieldType::string_max(255)))
    .field(opt("contributor_ids", FieldType::array_of(FieldType::string())))
    .field(opt("addresses_conditions", FieldType::array_of(FieldType::Uuid)))
    .field(opt(
        "goals",
        FieldType::array_of(FieldType::object(vec![
            opt("description", FieldType::string()),
            opt("target_date", FieldType::Date),
            opt("status", FieldType::string()),
        ])),
    ))
    .field(opt(
        "activities",
        FieldType::array_of(FieldType::object(vec![
            opt("description", FieldType::string()),
            opt("status", FieldType::string()),
            opt("scheduled_date", FieldType::Date),
        ])),
    ))
    .field(opt("encounter_id", FieldType::Uuid))
    .field(opt("clinical_note", FieldType::string()))
    .field(opt("fhir_careplan_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["period_start", "period_end"]))
    .index(IndexSpec::ascending(&["encounter_id"]))
    .index(IndexSpec::ascending(&["fhir_careplan_id"]).sparse()))
}

pub fn encounter_record() -> Result<CollectionSpec> {
    Ok(clinical_entry(
        "encounter_record",
        "Clinical encounters, visits, and admissions",
    )
    .field(req(
        "encounter_class",
        FieldType::enumeration(&[
            "ambulatory",
            "emergency",
            "field",
            "home",
            "inpatient",
            "short-stay",
            "virtual",
        ]),
    ))
    .field(opt("encounter_class_code", FieldType::string_max(20)))
    .field(opt("encounter_type", FieldType::string_max(100)))
    .field(opt("encounter_type_code", FieldType::string_max(20)))
    .field(req(
        "status",
        FieldType::enumeration(&[
            "planned",
            "arrived",
            "triaged",
            "in-progress",
            "onleave",
            "finished",
            "cancelled",
            "entered-in-error",
            "unknown",
        ]),
    ))
    .field(opt("priority", FieldType::string_max(30)))
    .field(req("period_start", FieldType::Date))
    .field(opt("period_end", FieldType::Date))
    .field(opt("length_minutes", FieldType::int()))
    .field(opt("reason_code", FieldType::string_max(20)))
    .field(opt("reason_text", FieldType::string_max(500)))
    .field(opt("admission_source", FieldType::string_max(100)))
    .field(opt("discharge_disposition", FieldType::string_max(100)))
    .field(opt(
        "participant_ids",
        FieldType::array_of(FieldType::object(vec![
            opt("id", FieldType::string()),
            opt("role", FieldType::string()),
            opt("name", FieldType::string()),
        ])),
    ))
    .field(opt("location_id", FieldType::string_max(100)))
    .field(opt("location_name", FieldType::string_max(255)))
    .field(opt("service_provider_id", FieldType::string_max(100)))
    .field(opt("diagnosis_ids", FieldType::array_of(FieldType::Uuid)))
    .field(opt("hospitalization_admit_source", FieldType::string_max(100)))
    .field(opt(
        "hospitalization_discharge_disposition",
        FieldType::string_max(100),
    ))
    .field(opt("clinical_admission_id", FieldType::Uuid))
    .field(opt("fhir_encounter_id", FieldType::string_max(100)))
    .fields(source_identity())
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["member_id"]))
    .index(IndexSpec::ascending(&["composition_id"]))
    .index(IndexSpec::ascending(&["encounter_class"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["period_start", "period_end"]))
    .index(IndexSpec::ascending(&["clinical_admission_id"]))
    .index(IndexSpec::ascending(&["fhir_encounter_id"]).sparse()))
}

pub fn health_record_provenance() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "health_record_provenance",
        "Audit trail and data lineage tracking for all health record changes",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req(
        "target_type",
        FieldType::enumeration(&[
            "HEALTH_RECORD_COMPOSITION",
            "PROBLEM",
            "ALLERGY",
            "MEDICATION",
            "VITAL_SIGN",
            "LAB_RESULT",
            "PROCEDURE_RECORD",
            "IMMUNIZATION",
            "CLINICAL_NOTE",
            "CARE_PLAN",
            "ENCOUNTER_RECORD",
        ]),
    ))
    .field(req("target_id", FieldType::Uuid))
    .field(req("recorded", FieldType::Date))
    .field(opt("occurred_datetime", FieldType::Date))
    .field(req(
        "activity",
        FieldType::enumeration(&["CREATE", "UPDATE", "DELETE", "VERIFY", "SIGN"]),
    ))
    .field(opt("activity_code", FieldType::string_max(20)))
    .field(opt("reason", FieldType::string_max(500)))
    .field(req(
        "agent_type",
        FieldType::enumeration(&[
            "author",
            "informant",
            "verifier",
            "enterer",
            "performer",
            "custodian",
        ]),
    ))
    .field(req("agent_id", FieldType::string_max(100)))
    .field(opt("agent_name", FieldType::string_max(255)))
    .field(opt("agent_role", FieldType::string_max(100)))
    .field(opt("on_behalf_of_id", FieldType::string_max(100)))
    .field(opt("location_id", FieldType::string_max(100)))
    .field(opt("signature", FieldType::string()))
    .field(opt("signature_type", FieldType::string_max(50)))
    .field(opt("policy", FieldType::string_max(500)))
    .field(opt("fhir_provenance_id", FieldType::string_max(100)))
    .field(req("created_at", FieldType::Date))
    .append_only()
    .index(IndexSpec::ascending(&["target_type", "target_id"]))
    .index(IndexSpec::ascending(&["recorded"]))
    .index(IndexSpec::ascending(&["agent_id"]))
    .index(IndexSpec::ascending(&["activity"]))
    .index(IndexSpec::ascending(&["fhir_provenance_id"]).sparse()))
}
