//! Health-record entities
//!
//! The clinical TLD: versioned compositions (openEHR COMPOSITION
//! pattern), ten clinical entry types always tied to a person
//! (`member_id`) and optionally grouped under a composition, and the
//! append-only provenance audit log. Clinical status vocabularies keep
//! their FHIR lowercase/kebab-case wire casing; composition-level
//! vocabularies keep the SCREAMING_SNAKE_CASE of the rest of the model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionType {
    Encounter,
    DischargeSummary,
    ProblemList,
    MedicationList,
    LabReport,
    VitalSigns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionCategory {
    Event,
    Persistent,
    Episodic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionStatus {
    Active,
    Superseded,
    Deleted,
}

impl std::fmt::Display for CompositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionStatus::Active => write!(f, "ACTIVE"),
            CompositionStatus::Superseded => write!(f, "SUPERSEDED"),
            CompositionStatus::Deleted => write!(f, "DELETED"),
        }
    }
}

/// Container grouping related clinical entries recorded during one
/// clinical context.
///
/// Compositions are versioned: version_number is monotonic per logical
/// record, exactly one version is current, and preceding_version_id
/// chains backward. Superseding flips the prior current version to
/// SUPERSEDED atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecordComposition {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub member_id: Uuid,
    pub employer_id: Uuid,
    pub archetype_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub composition_type: CompositionType,
    pub category: CompositionCategory,
    pub context_start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_setting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    pub version_number: i32,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preceding_version_id: Option<Uuid>,
    pub status: CompositionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_bundle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(HealthRecordComposition, "health_record_composition");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemClinicalStatus {
    Active,
    Recurrence,
    Relapse,
    Inactive,
    Remission,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemVerificationStatus {
    Unconfirmed,
    Provisional,
    Differential,
    Confirmed,
    Refuted,
    EnteredInError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemCategory {
    ProblemListItem,
    EncounterDiagnosis,
    HealthConcern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// Diagnoses, health problems, and clinical conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub problem_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_code_display: Option<String>,
    pub clinical_status: ProblemClinicalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<ProblemVerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProblemCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abatement_date: Option<NaiveDate>,
    pub recorded_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asserter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_condition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Problem, "problem");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergyCategory {
    Food,
    Medication,
    Environment,
    Biologic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergyType {
    Allergy,
    Intolerance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criticality {
    Low,
    High,
    UnableToAssess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergyClinicalStatus {
    Active,
    Inactive,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergyVerificationStatus {
    Unconfirmed,
    Presumed,
    Confirmed,
    Refuted,
    EnteredInError,
}

/// One coded reaction manifestation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionManifestation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Allergies, intolerances, and adverse reaction risks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allergy {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub substance_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substance_code_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AllergyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergy_type: Option<AllergyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Criticality>,
    pub clinical_status: AllergyClinicalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<AllergyVerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onset_date: Option<NaiveDate>,
    pub recorded_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asserter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_occurrence: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_manifestation: Option<Vec<ReactionManifestation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_onset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_exposure_route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_allergy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Allergy, "allergy");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicationEntryType {
    Instruction,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationStatus {
    Active,
    Completed,
    Cancelled,
    Stopped,
    OnHold,
    Draft,
    EnteredInError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationIntent {
    Order,
    Plan,
    Proposal,
    InstanceOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationCategory {
    Inpatient,
    Outpatient,
    Community,
    Discharge,
}

/// Medication orders (INSTRUCTION) and administration records (ACTION).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub entry_type: MedicationEntryType,
    pub medication_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_code_display: Option<String>,
    pub status: MedicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<MedicationIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MedicationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_period: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_period_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_needed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_needed_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub authored_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescriber_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescriber_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refills_allowed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_medication_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_claim_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Medication, "medication");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VitalType {
    BloodPressure,
    Pulse,
    Temperature,
    RespiratoryRate,
    OxygenSaturation,
    Height,
    Weight,
    Bmi,
}

/// FHIR observation status, shared by vital signs and lab results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
}

/// Vital sign observations (BP, pulse, temperature, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSign {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub vital_type: VitalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vital_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vital_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vital_code_display: Option<String>,
    pub status: ObservationStatus,
    pub effective_datetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_systolic: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_diastolic: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_observation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(VitalSign, "vital_sign");

/// Laboratory test results and diagnostic observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_report_id: Option<Uuid>,
    pub archetype_id: String,
    pub test_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_code_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: ObservationStatus,
    pub effective_datetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range_low: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range_high: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performing_lab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performing_lab_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering_provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_observation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_claim_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(LabResult, "lab_result");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcedureStatus {
    Preparation,
    InProgress,
    NotDone,
    OnHold,
    Stopped,
    Completed,
    EnteredInError,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Laterality {
    Left,
    Right,
    Bilateral,
}

/// Clinical procedures performed on the patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub procedure_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_code_display: Option<String>,
    pub status: ProcedureStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_datetime: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_period_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_period_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub laterality: Option<Laterality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_procedure_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_claim_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ProcedureRecord, "procedure_record");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImmunizationStatus {
    Completed,
    EnteredInError,
    NotDone,
}

/// Vaccination and immunization records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Immunization {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub vaccine_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccine_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccine_code_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccine_code_display: Option<String>,
    pub status: ImmunizationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    pub occurrence_datetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_source: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_immunization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Immunization, "immunization");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    ProgressNote,
    DischargeSummary,
    Consultation,
    HistoryPhysical,
    ProcedureNote,
    OperativeNote,
    RadiologyReport,
    PathologyReport,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentStatus {
    Current,
    Superseded,
    EnteredInError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocStatus {
    Preliminary,
    Final,
    Amended,
    Corrected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentFormat {
    #[serde(rename = "text/plain")]
    TextPlain,
    #[serde(rename = "text/html")]
    TextHtml,
    #[serde(rename = "application/pdf")]
    ApplicationPdf,
}

/// Clinical narratives, summaries, and documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type_code: Option<String>,
    pub document_status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<DocStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub created_datetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custodian_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ClinicalNote, "clinical_note");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarePlanStatus {
    Draft,
    Active,
    OnHold,
    Revoked,
    Completed,
    EnteredInError,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarePlanIntent {
    Proposal,
    Plan,
    Order,
    Option,
}

/// One goal within a care plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlanGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One planned activity within a care plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlanActivity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

/// Care plans, treatment plans, and goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub plan_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_description: Option<String>,
    pub status: CarePlanStatus,
    pub intent: CarePlanIntent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    pub created_datetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses_conditions: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<CarePlanGoal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<CarePlanActivity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_careplan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(CarePlan, "care_plan");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterClass {
    Ambulatory,
    Emergency,
    Field,
    Home,
    Inpatient,
    ShortStay,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterStatus {
    Planned,
    Arrived,
    Triaged,
    InProgress,
    Onleave,
    Finished,
    Cancelled,
    EnteredInError,
    Unknown,
}

/// One participant in an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterParticipant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Clinical encounters, visits, and admissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_id: Option<Uuid>,
    pub member_id: Uuid,
    pub archetype_id: String,
    pub encounter_class: EncounterClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_class_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter_type_code: Option<String>,
    pub status: EncounterStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub period_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_ids: Option<Vec<EncounterParticipant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitalization_admit_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitalization_discharge_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_admission_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_encounter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(EncounterRecord, "encounter_record");

/// Entity kinds a provenance entry can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvenanceTargetType {
    HealthRecordComposition,
    Problem,
    Allergy,
    Medication,
    VitalSign,
    LabResult,
    ProcedureRecord,
    Immunization,
    ClinicalNote,
    CarePlan,
    EncounterRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvenanceActivity {
    Create,
    Update,
    Delete,
    Verify,
    Sign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceAgentType {
    Author,
    Informant,
    Verifier,
    Enterer,
    Performer,
    Custodian,
}

/// Append-only audit entry keyed by (target_type, target_id); never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecordProvenance {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub target_type: ProvenanceTargetType,
    pub target_id: Uuid,
    pub recorded: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_datetime: Option<DateTime<Utc>>,
    pub activity: ProvenanceActivity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub agent_type: ProvenanceAgentType,
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_provenance_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl super::Entity for HealthRecordProvenance {
    const COLLECTION: &'static str = "health_record_provenance";

    fn id(&self) -> Uuid {
        self.id
    }

    // Provenance is append-only; there is no updated_at to bump.
    fn touch(&mut self, _now: DateTime<Utc>) {}
}
