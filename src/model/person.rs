//! Person-domain entities
//!
//! Base person identity, identifiers and contacts (structurally mirroring
//! the org analogues, including the usability-status lifecycle and the
//! single-winner preferred/primary invariants), employment links,
//! clinician providers with their org affiliations, and households.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;
use super::org::{ContactType, UsabilityStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

/// Base entity for all individuals (employees, members, dependents,
/// providers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Person, "person");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonIdentifierType {
    Ssn,
    Mrn,
    MemberId,
    EmployeeId,
    Npi,
    DriversLicense,
    Passport,
    Other,
}

/// Identifier for a PERSON (SSN, MRN, Member ID, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonIdentifier {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub identifier_type: PersonIdentifierType,
    pub identifier_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    pub usability_status: UsabilityStatus,
    pub usability_status_date: NaiveDate,
    /// At most one primary identifier per (person, type).
    #[serde(default)]
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(PersonIdentifier, "person_identifier");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonContactLabel {
    Home,
    Work,
    Mobile,
    Other,
}

/// Contact information for a PERSON (email, phone, address).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonContact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub contact_type: ContactType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub label: PersonContactLabel,
    /// At most one preferred contact per (person, contact_type).
    pub is_preferred: bool,
    pub usability_status: UsabilityStatus,
    pub usability_status_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(PersonContact, "person_contact");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Active,
    Terminated,
    Loa,
    Retired,
}

impl EmploymentStatus {
    /// Whether the employment relationship is open. LOA keeps the
    /// relationship open even though the employee is away.
    pub fn is_active(&self) -> bool {
        matches!(self, EmploymentStatus::Active | EmploymentStatus::Loa)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contractor,
}

/// Links PERSON to an ORG holding an EMPLOYER role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub employer_org_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
    pub hire_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub employment_status: EmploymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Derived from employment_status.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Employee, "employee");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderType {
    Physician,
    Nurse,
    Therapist,
    Pharmacist,
    Other,
}

/// A PERSON acting as a clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dea_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Provider, "provider");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliationType {
    Employed,
    Contracted,
    Privileged,
}

/// Links a PROVIDER to an ORG holding a PROVIDER_ORG role. At most one
/// affiliation per provider carries is_primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAffiliation {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub provider_org_id: Uuid,
    pub affiliation_type: AffiliationType,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_primary: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ProviderAffiliation, "provider_affiliation");

/// Grouping of persons at a shared address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Household, "household");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HouseholdRelationshipType {
    Father,
    Mother,
    Child,
    Husband,
    Wife,
    DomesticPartner,
}

/// Links PERSON to HOUSEHOLD; unique on (household, person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdParticipant {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub household_id: Uuid,
    pub person_id: Uuid,
    pub relationship_type: HouseholdRelationshipType,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(HouseholdParticipant, "household_participant");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employment_status_wire_casing() {
        assert_eq!(
            serde_json::to_value(EmploymentStatus::Loa).unwrap(),
            "LOA"
        );
        assert_eq!(
            serde_json::to_value(PersonIdentifierType::DriversLicense).unwrap(),
            "DRIVERS_LICENSE"
        );
    }

    #[test]
    fn test_is_active_derivation() {
        assert!(EmploymentStatus::Active.is_active());
        assert!(EmploymentStatus::Loa.is_active());
        assert!(!EmploymentStatus::Terminated.is_active());
        assert!(!EmploymentStatus::Retired.is_active());
    }

    #[test]
    fn test_missing_is_primary_defaults_false() {
        let doc = serde_json::json!({
            "_id": Uuid::new_v4().to_string(),
            "person_id": Uuid::new_v4().to_string(),
            "identifier_type": "SSN",
            "identifier_value": "123-45-6789",
            "usability_status": "ACTIVE",
            "usability_status_date": "2024-03-01",
            "created_at": "2024-03-01T00:00:00Z",
            "updated_at": "2024-03-01T00:00:00Z"
        });
        let identifier: PersonIdentifier = serde_json::from_value(doc).unwrap();
        assert!(!identifier.is_primary);
    }
}
