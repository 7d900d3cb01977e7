//! Organization-domain collection specs
//!
//! Base org entity, its identifiers/contacts/roles, the seven
//! role-specific detail collections (1:1 with an org_role), org-to-org
//! relationships with their contracts, and the internal org-structure
//! hierarchy.

use super::collection::{CollectionSpec, IndexSpec};
use super::field::{opt, req, FieldType};
use super::{NAICS_CODE, NAIC_CODE, NPI, SIC_CODE, TAXONOMY_CODE, US_STATE, ZIP_CODE};
use crate::error::Result;

pub const USABILITY_STATUS: &[&str] = &["ACTIVE", "INACTIVE", "ARCHIVED", "KNOWN_ERROR"];
pub const ORG_ROLE_TYPES: &[&str] = &[
    "EMPLOYER",
    "CLIENT",
    "VENDOR",
    "BROKER",
    "CARRIER",
    "HEALTH_PLAN_SPONSOR",
    "PROVIDER_ORG",
];
pub const CONTACT_TYPES: &[&str] = &["EMAIL", "PHONE", "ADDRESS"];

pub fn org() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org",
        "Base entity for all business organizations",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("name", FieldType::string()))
    .field(opt("legal_name", FieldType::string()))
    .field(opt("website", FieldType::string()))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["name"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn org_identifier() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org_identifier",
        "Identifier for an ORG (Tax ID, FEIN, NPI, NAIC, DUNS, etc.) with usability status",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_id", FieldType::Uuid))
    .field(req(
        "identifier_type",
        FieldType::enumeration(&["TAX_ID", "FEIN", "NPI", "NAIC", "DUNS", "LEI", "OTHER"]),
    ))
    .field(req("identifier_value", FieldType::string()))
    .field(opt("issuing_authority", FieldType::string()))
    .field(opt("issue_date", FieldType::Date))
    .field(opt("expiration_date", FieldType::Date))
    .field(req("usability_status", FieldType::enumeration(USABILITY_STATUS)))
    .field(req("usability_status_date", FieldType::Date))
    .field(opt("is_primary", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_id"]))
    .index(IndexSpec::ascending(&["org_id", "identifier_type"]))
    .index(IndexSpec::ascending(&["identifier_type", "identifier_value"]))
    .index(IndexSpec::ascending(&["usability_status"])))
}

pub fn org_contact() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org_contact",
        "Contact information for an ORG (email, phone, address) with usability status",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_id", FieldType::Uuid))
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
        FieldType::enumeration(&["HEADQUARTERS", "BILLING", "MAILING", "BRANCH", "OTHER"]),
    ))
    .field(req("is_preferred", FieldType::Bool))
    .field(req("usability_status", FieldType::enumeration(USABILITY_STATUS)))
    .field(req("usability_status_date", FieldType::Date))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_id"]))
    .index(IndexSpec::ascending(&["org_id", "contact_type"]))
    .index(IndexSpec::ascending(&["org_id", "contact_type", "is_preferred"]))
    .index(IndexSpec::ascending(&["email"]).sparse())
    .index(IndexSpec::ascending(&["usability_status"])))
}

pub fn org_role() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org_role",
        "Role assignment for an ORG",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_id", FieldType::Uuid))
    .field(req("role_type", FieldType::enumeration(ORG_ROLE_TYPES)))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_id"]))
    .index(IndexSpec::ascending(&["role_type"]))
    .index(IndexSpec::ascending(&["org_id", "role_type"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

/// Common scaffold for the seven 1:1 role-detail collections.
fn role_details(name: &'static str, description: &'static str) -> CollectionSpec {
    CollectionSpec::new(name, description)
        .field(req("_id", FieldType::Uuid))
        .field(req("org_role_id", FieldType::Uuid))
}

pub fn employer_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "employer_details",
        "Role-specific attributes for EMPLOYER (NAICS, SIC, industry, size)",
    )
    .field(opt("naics_code", FieldType::string_pattern(NAICS_CODE)?))
    .field(opt("sic_code", FieldType::string_pattern(SIC_CODE)?))
    .field(opt("industry", FieldType::string()))
    .field(opt(
        "size_tier",
        FieldType::enumeration(&["SMALL", "MEDIUM", "LARGE", "ENTERPRISE"]),
    ))
    .field(opt("employee_count", FieldType::int_min(0)))
    .field(opt("fein", FieldType::string()))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["naics_code"]))
    .index(IndexSpec::ascending(&["size_tier"])))
}

pub fn client_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "client_details",
        "Role-specific attributes for CLIENT (client code, tier, account manager)",
    )
    .field(opt("client_code", FieldType::string()))
    .field(opt("account_manager", FieldType::string()))
    .field(opt("implementation_date", FieldType::Date))
    .field(opt(
        "client_tier",
        FieldType::enumeration(&["STANDARD", "PREMIUM", "ENTERPRISE"]),
    ))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["client_code"]).unique().sparse())
    .index(IndexSpec::ascending(&["client_tier"])))
}

pub fn vendor_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "vendor_details",
        "Role-specific attributes for VENDOR (vendor type, integration type)",
    )
    .field(opt(
        "vendor_type",
        FieldType::enumeration(&["TPA", "PBM", "LAB", "CLEARINGHOUSE", "OTHER"]),
    ))
    .field(opt("service_category", FieldType::string()))
    .field(opt(
        "integration_type",
        FieldType::enumeration(&["API", "SFTP", "MANUAL"]),
    ))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["vendor_type"]))
    .index(IndexSpec::ascending(&["integration_type"])))
}

pub fn broker_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "broker_details",
        "Role-specific attributes for BROKER (license, broker type)",
    )
    .field(opt("license_number", FieldType::string()))
    .field(opt("license_state", FieldType::string_pattern(US_STATE)?))
    .field(opt(
        "broker_type",
        FieldType::enumeration(&["GENERAL_AGENT", "BROKER", "CONSULTANT"]),
    ))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["license_number", "license_state"]))
    .index(IndexSpec::ascending(&["broker_type"])))
}

pub fn carrier_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "carrier_details",
        "Role-specific attributes for CARRIER (NAIC code, carrier type, rating)",
    )
    .field(opt("naic_code", FieldType::string_pattern(NAIC_CODE)?))
    .field(opt(
        "carrier_type",
        FieldType::enumeration(&["COMMERCIAL", "MEDICARE", "MEDICAID", "OTHER"]),
    ))
    .field(opt("am_best_rating", FieldType::string()))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["naic_code"]))
    .index(IndexSpec::ascending(&["carrier_type"])))
}

pub fn health_plan_sponsor_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "health_plan_sponsor_details",
        "Role-specific attributes for HEALTH_PLAN_SPONSOR (sponsor type, funding)",
    )
    .field(opt(
        "sponsor_type",
        FieldType::enumeration(&["SELF_INSURED", "FULLY_INSURED", "LEVEL_FUNDED"]),
    ))
    .field(opt("funding_arrangement", FieldType::string()))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["sponsor_type"])))
}

pub fn provider_org_details() -> Result<CollectionSpec> {
    Ok(role_details(
        "provider_org_details",
        "Role-specific attributes for PROVIDER_ORG (NPI, facility type, specialty)",
    )
    .field(opt("npi", FieldType::string_pattern(NPI)?))
    .field(opt(
        "facility_type",
        FieldType::enumeration(&["HOSPITAL", "CLINIC", "LAB", "PHARMACY", "IMAGING", "OTHER"]),
    ))
    .field(opt("specialty", FieldType::string()))
    .field(opt("taxonomy_code", FieldType::string_pattern(TAXONOMY_CODE)?))
    .field(opt("license_number", FieldType::string()))
    .field(opt("license_state", FieldType::string_pattern(US_STATE)?))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_role_id"]).unique())
    .index(IndexSpec::ascending(&["npi"]).unique().sparse())
    .index(IndexSpec::ascending(&["facility_type"]))
    .index(IndexSpec::ascending(&["taxonomy_code"])))
}

pub fn org_relationship() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org_relationship",
        "Directed relationship between two ORGs",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_id_source", FieldType::Uuid))
    .field(req("org_id_target", FieldType::Uuid))
    .field(req(
        "relationship_type",
        FieldType::enumeration(&[
            "WELLNECITY_CLIENT",
            "BROKER_CLIENT",
            "CARRIER_CLIENT",
            "VENDOR_CLIENT",
            "PROVIDER_ORG_CLIENT",
        ]),
    ))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_id_source"]))
    .index(IndexSpec::ascending(&["org_id_target"]))
    .index(IndexSpec::ascending(&["relationship_type"]))
    .index(IndexSpec::ascending(&[
        "org_id_source",
        "org_id_target",
        "relationship_type",
    ]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn contract() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "contract",
        "Legal agreement tied to an ORG_RELATIONSHIP",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_relationship_id", FieldType::Uuid))
    .field(opt("contract_type", FieldType::string()))
    .field(opt("contract_number", FieldType::string()))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req(
        "status",
        FieldType::enumeration(&["DRAFT", "ACTIVE", "EXPIRED", "TERMINATED", "RENEWED"]),
    ))
    .field(opt("terms", FieldType::string()))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_relationship_id"]))
    .index(IndexSpec::ascending(&["contract_number"]).unique().sparse())
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["effective_date"])))
}

pub fn org_structure() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org_structure",
        "Internal organizational structure definition",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_id", FieldType::Uuid))
    .field(req(
        "structure_type",
        FieldType::enumeration(&[
            "FINANCIAL",
            "BENEFIT_ADMIN",
            "REPORTING",
            "GEOGRAPHIC",
            "OPERATIONAL",
            "OTHER",
        ]),
    ))
    .field(req("name", FieldType::string()))
    .field(opt("description", FieldType::string()))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_id"]))
    .index(IndexSpec::ascending(&["org_id", "structure_type"]))
    .index(IndexSpec::ascending(&["structure_type"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn org_structure_node() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "org_structure_node",
        "Hierarchical node within an ORG_STRUCTURE",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("org_structure_id", FieldType::Uuid))
    .field(opt("parent_node_id", FieldType::Uuid))
    .field(opt("node_code", FieldType::string()))
    .field(req("name", FieldType::string()))
    .field(opt("description", FieldType::string()))
    .field(req("level", FieldType::int_min(0)))
    .field(opt("sort_order", FieldType::int()))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["org_structure_id"]))
    .index(IndexSpec::ascending(&["org_structure_id", "parent_node_id"]))
    .index(IndexSpec::ascending(&["parent_node_id"]))
    .index(IndexSpec::ascending(&["org_structure_id", "node_code"]))
    .index(IndexSpec::ascending(&["level"]))
    .index(IndexSpec::ascending(&["is_active"])))
}
