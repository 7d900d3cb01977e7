//! Person-domain collection specs
//!
//! Base person identity, identifiers and contacts (mirroring the org
//! analogues), employment links, clinician providers and their org
//! affiliations, and household groupings.

use super::collection::{CollectionSpec, IndexSpec};
use super::field::{opt, req, FieldType};
use super::org::{CONTACT_TYPES, USABILITY_STATUS};
use super::{NPI, TAXONOMY_CODE, US_STATE, ZIP_CODE};
use crate::error::Result;

pub fn person() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "person",
        "Base entity for all individuals (employees, members, dependents, providers)",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("first_name", FieldType::string()))
    .field(req("last_name", FieldType::string()))
    .field(opt("middle_name", FieldType::string()))
    .field(opt("date_of_birth", FieldType::Date))
    .field(opt(
        "gender",
        FieldType::enumeration(&["MALE", "FEMALE", "OTHER", "UNKNOWN"]),
    ))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["last_name", "first_name"]))
    .index(IndexSpec::ascending(&["date_of_birth"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn person_identifier() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "person_identifier",
        "Identifier for a PERSON (SSN, MRN, Member ID, etc.) with usability status",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("person_id", FieldType::Uuid))
    .field(req(
        "identifier_type",
        FieldType::enumeration(&[
            "SSN",
            "MRN",
            "MEMBER_ID",
            "EMPLOYEE_ID",
            "NPI",
            "DRIVERS_LICENSE",
            "PASSPORT",
            "OTHER",
        ]),
    ))
    .field(req("identifier_value", FieldType::string()))
    .field(opt("issuing_authority", FieldType::string()))
    .field(opt("issue_date", FieldType::Date))
    .field(opt("expiration_date", FieldType::Date))
    .field(req("usability_status", FieldType::enumeration(USABILITY_STATUS)))
    .field(req("usability_status_date", FieldType::Date))
    .field(opt("is_primary", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["person_id"]))
    .index(IndexSpec::ascending(&["person_id", "identifier_type"]))
    .index(IndexSpec::ascending(&["identifier_type", "identifier_value"]))
    .index(IndexSpec::ascending(&["usability_status"])))
}

pub fn person_contact() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "person_contact",
        "Contact information for a PERSON (email, phone, address) with usability status",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("person_id", FieldType::Uuid))
    .field(req("contact_type", FieldType::enumeration(CONTACT_TYPES)))
    .field(opt("email", FieldType::string()))
    .field(opt("phone", FieldType::string()))
    .field(opt("address_line_1", FieldType::string()))
    .field(opt("address_line_2", FieldType::string()))
    .field(opt("city", FieldType::string()))
    .field(opt("state", FieldType::string_pattern(US_STATE)?))
    .field(opt("zip_code", FieldType::string_pattern(ZIP_CODE)?))
    .field(opt("country", FieldType::string()))
    .field(req(
        "label",
        FieldType::enumeration(&["HOME", "WORK", "MOBILE", "OTHER"]),
    ))
    .field(req("is_preferred", FieldType::Bool))
    .field(req("usability_status", FieldType::enumeration(USABILITY_STATUS)))
    .field(req("usability_status_date", FieldType::Date))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["person_id"]))
    .index(IndexSpec::ascending(&["person_id", "contact_type"]))
    .index(IndexSpec::ascending(&["person_id", "contact_type", "is_preferred"]))
    .index(IndexSpec::ascending(&["email"]).sparse())
    .index(IndexSpec::ascending(&["usability_status"])))
}

pub fn employee() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "employee",
        "Links PERSON to an EMPLOYER ORG",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("person_id", FieldType::Uuid))
    .field(req("employer_org_id", FieldType::Uuid))
    .field(opt("employee_number", FieldType::string()))
    .field(req("hire_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req(
        "employment_status",
        FieldType::enumeration(&["ACTIVE", "TERMINATED", "LOA", "RETIRED"]),
    ))
    .field(opt(
        "employment_type",
        FieldType::enumeration(&["FULL_TIME", "PART_TIME", "CONTRACTOR"]),
    ))
    .field(opt("job_title", FieldType::string()))
    .field(opt("department", FieldType::string()))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["person_id"]))
    .index(IndexSpec::ascending(&["employer_org_id"]))
    .index(IndexSpec::ascending(&["employee_number"]))
    .index(
        IndexSpec::ascending(&["employer_org_id", "employee_number"])
            .unique()
            .sparse(),
    )
    .index(IndexSpec::ascending(&["employment_status"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn provider() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "provider",
        "Links PERSON to healthcare provider role",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("person_id", FieldType::Uuid))
    .field(opt("npi", FieldType::string_pattern(NPI)?))
    .field(opt(
        "provider_type",
        FieldType::enumeration(&["PHYSICIAN", "NURSE", "THERAPIST", "PHARMACIST", "OTHER"]),
    ))
    .field(opt("specialty", FieldType::string()))
    .field(opt("taxonomy_code", FieldType::string_pattern(TAXONOMY_CODE)?))
    .field(opt("license_number", FieldType::string()))
    .field(opt("license_state", FieldType::string_pattern(US_STATE)?))
    .field(opt("dea_number", FieldType::string()))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["person_id"]))
    .index(IndexSpec::ascending(&["npi"]).unique().sparse())
    .index(IndexSpec::ascending(&["provider_type"]))
    .index(IndexSpec::ascending(&["specialty"]))
    .index(IndexSpec::ascending(&["taxonomy_code"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn provider_affiliation() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "provider_affiliation",
        "Links PROVIDER (person) to PROVIDER_ORG with affiliation type",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("provider_id", FieldType::Uuid))
    .field(req("provider_org_id", FieldType::Uuid))
    .field(req(
        "affiliation_type",
        FieldType::enumeration(&["EMPLOYED", "CONTRACTED", "PRIVILEGED"]),
    ))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(opt("is_primary", FieldType::Bool))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["provider_id"]))
    .index(IndexSpec::ascending(&["provider_org_id"]))
    .index(IndexSpec::ascending(&["provider_id", "provider_org_id"]))
    .index(IndexSpec::ascending(&["affiliation_type"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn household() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "household",
        "Grouping of persons living together",
    )
    .field(req("_id", FieldType::Uuid))
    .field(opt("household_name", FieldType::string()))
    .field(opt("address_line_1", FieldType::string()))
    .field(opt("address_line_2", FieldType::string()))
    .field(opt("city", FieldType::string()))
    .field(opt("state", FieldType::string_pattern(US_STATE)?))
    .field(opt("zip_code", FieldType::string_pattern(ZIP_CODE)?))
    .field(opt("country", FieldType::string()))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["household_name"]))
    .index(IndexSpec::ascending(&["zip_code"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn household_participant() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "household_participant",
        "Links PERSON to HOUSEHOLD with relationship type",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("household_id", FieldType::Uuid))
    .field(req("person_id", FieldType::Uuid))
    .field(req(
        "relationship_type",
        FieldType::enumeration(&[
            "FATHER",
            "MOTHER",
            "CHILD",
            "HUSBAND",
            "WIFE",
            "DOMESTIC_PARTNER",
        ]),
    ))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["household_id"]))
    .index(IndexSpec::ascending(&["person_id"]))
    .index(IndexSpec::ascending(&["household_id", "person_id"]).unique())
    .index(IndexSpec::ascending(&["relationship_type"]))
    .index(IndexSpec::ascending(&["is_active"])))
}
