//! Organization-domain entities
//!
//! Base org, its identifiers/contacts/roles, the seven 1:1 role-detail
//! records, org-to-org relationships with contracts, and the internal
//! org-structure hierarchy. Detail records are keyed by role id (not org
//! id); the registry enforces that the referenced role carries the
//! matching role_type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;

/// Lifecycle state of a contact/identifier record, independent of the
/// parent entity's own active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsabilityStatus {
    Active,
    Inactive,
    Archived,
    KnownError,
}

impl std::fmt::Display for UsabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsabilityStatus::Active => write!(f, "ACTIVE"),
            UsabilityStatus::Inactive => write!(f, "INACTIVE"),
            UsabilityStatus::Archived => write!(f, "ARCHIVED"),
            UsabilityStatus::KnownError => write!(f, "KNOWN_ERROR"),
        }
    }
}

/// Base entity for all business organizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Org {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Org, "org");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgIdentifierType {
    TaxId,
    Fein,
    Npi,
    Naic,
    Duns,
    Lei,
    Other,
}

/// Identifier for an ORG (Tax ID, FEIN, NPI, NAIC, DUNS, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgIdentifier {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_id: Uuid,
    pub identifier_type: OrgIdentifierType,
    pub identifier_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuing_authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    pub usability_status: UsabilityStatus,
    pub usability_status_date: NaiveDate,
    /// At most one primary identifier per (org, type); flipping it is a
    /// scoped transactional update.
    #[serde(default)]
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(OrgIdentifier, "org_identifier");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    Email,
    Phone,
    Address,
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactType::Email => write!(f, "EMAIL"),
            ContactType::Phone => write!(f, "PHONE"),
            ContactType::Address => write!(f, "ADDRESS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgContactLabel {
    Headquarters,
    Billing,
    Mailing,
    Branch,
    Other,
}

/// Contact information for an ORG (email, phone, address).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgContact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_id: Uuid,
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
    pub label: OrgContactLabel,
    /// At most one preferred contact per (org, contact_type).
    pub is_preferred: bool,
    pub usability_status: UsabilityStatus,
    pub usability_status_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(OrgContact, "org_contact");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgRoleType {
    Employer,
    Client,
    Vendor,
    Broker,
    Carrier,
    HealthPlanSponsor,
    ProviderOrg,
}

impl OrgRoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRoleType::Employer => "EMPLOYER",
            OrgRoleType::Client => "CLIENT",
            OrgRoleType::Vendor => "VENDOR",
            OrgRoleType::Broker => "BROKER",
            OrgRoleType::Carrier => "CARRIER",
            OrgRoleType::HealthPlanSponsor => "HEALTH_PLAN_SPONSOR",
            OrgRoleType::ProviderOrg => "PROVIDER_ORG",
        }
    }
}

impl std::fmt::Display for OrgRoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role assignment for an ORG. An org holds one or more roles; each role
/// may own exactly one role-specific detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgRole {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_id: Uuid,
    pub role_type: OrgRoleType,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(OrgRole, "org_role");

/// A 1:1 role-specific extension record, keyed by role id.
///
/// The registry rejects a detail record whose parent role does not carry
/// the matching role_type.
pub trait RoleDetail: super::Entity {
    const ROLE_TYPE: OrgRoleType;

    fn org_role_id(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeTier {
    Small,
    Medium,
    Large,
    Enterprise,
}

/// Role-specific attributes for EMPLOYER (NAICS, SIC, industry, size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naics_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sic_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_tier: Option<SizeTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fein: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(EmployerDetails, "employer_details");

impl RoleDetail for EmployerDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::Employer;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientTier {
    Standard,
    Premium,
    Enterprise,
}

/// Role-specific attributes for CLIENT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_tier: Option<ClientTier>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ClientDetails, "client_details");

impl RoleDetail for ClientDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::Client;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorType {
    Tpa,
    Pbm,
    Lab,
    Clearinghouse,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    Api,
    Sftp,
    Manual,
}

/// Role-specific attributes for VENDOR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_type: Option<VendorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<IntegrationType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(VendorDetails, "vendor_details");

impl RoleDetail for VendorDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::Vendor;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrokerType {
    GeneralAgent,
    Broker,
    Consultant,
}

/// Role-specific attributes for BROKER.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker_type: Option<BrokerType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(BrokerDetails, "broker_details");

impl RoleDetail for BrokerDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::Broker;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarrierType {
    Commercial,
    Medicare,
    Medicaid,
    Other,
}

/// Role-specific attributes for CARRIER.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naic_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_type: Option<CarrierType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub am_best_rating: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(CarrierDetails, "carrier_details");

impl RoleDetail for CarrierDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::Carrier;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SponsorType {
    SelfInsured,
    FullyInsured,
    LevelFunded,
}

/// Role-specific attributes for HEALTH_PLAN_SPONSOR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPlanSponsorDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_type: Option<SponsorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_arrangement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(HealthPlanSponsorDetails, "health_plan_sponsor_details");

impl RoleDetail for HealthPlanSponsorDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::HealthPlanSponsor;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityType {
    Hospital,
    Clinic,
    Lab,
    Pharmacy,
    Imaging,
    Other,
}

/// Role-specific attributes for PROVIDER_ORG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOrgDetails {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_role_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<FacilityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(ProviderOrgDetails, "provider_org_details");

impl RoleDetail for ProviderOrgDetails {
    const ROLE_TYPE: OrgRoleType = OrgRoleType::ProviderOrg;

    fn org_role_id(&self) -> Uuid {
        self.org_role_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgRelationshipType {
    WellnecityClient,
    BrokerClient,
    CarrierClient,
    VendorClient,
    ProviderOrgClient,
}

/// Directed relationship between two ORGs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgRelationship {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_id_source: Uuid,
    pub org_id_target: Uuid,
    pub relationship_type: OrgRelationshipType,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(OrgRelationship, "org_relationship");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Draft,
    Active,
    Expired,
    Terminated,
    Renewed,
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractStatus::Draft => write!(f, "DRAFT"),
            ContractStatus::Active => write!(f, "ACTIVE"),
            ContractStatus::Expired => write!(f, "EXPIRED"),
            ContractStatus::Terminated => write!(f, "TERMINATED"),
            ContractStatus::Renewed => write!(f, "RENEWED"),
        }
    }
}

/// Legal agreement tied 1:1 to an ORG_RELATIONSHIP.
///
/// RENEWED implies a successor contract exists, but nothing links to it;
/// callers own that linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_relationship_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_number: Option<String>,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub status: ContractStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Contract, "contract");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgStructureType {
    Financial,
    BenefitAdmin,
    Reporting,
    Geographic,
    Operational,
    Other,
}

/// Named hierarchy definition for an ORG (financial divisions, benefit
/// administration, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgStructure {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_id: Uuid,
    pub structure_type: OrgStructureType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(OrgStructure, "org_structure");

/// Node within an ORG_STRUCTURE tree. Roots sit at level 0 with no
/// parent; every other node's level equals its parent's level + 1, and
/// the tree is acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgStructureNode {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub org_structure_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_code: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(OrgStructureNode, "org_structure_node");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;

    fn make_org() -> Org {
        Org {
            id: Uuid::new_v4(),
            name: "Acme Benefits Group".into(),
            legal_name: Some("Acme Benefits Group, LLC".into()),
            website: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_org_document_shape() {
        let org = make_org();
        let doc = org.to_document().unwrap();
        assert!(doc.get("_id").is_some());
        assert!(doc.get("id").is_none());
        assert!(doc.get("website").is_none());
        assert_eq!(doc["name"], "Acme Benefits Group");
    }

    #[test]
    fn test_role_type_wire_casing() {
        let json = serde_json::to_value(OrgRoleType::HealthPlanSponsor).unwrap();
        assert_eq!(json, "HEALTH_PLAN_SPONSOR");
        let back: OrgRoleType = serde_json::from_value(json).unwrap();
        assert_eq!(back, OrgRoleType::HealthPlanSponsor);
        assert_eq!(OrgRoleType::ProviderOrg.to_string(), "PROVIDER_ORG");
    }

    #[test]
    fn test_usability_status_round_trip() {
        let json = serde_json::to_value(UsabilityStatus::KnownError).unwrap();
        assert_eq!(json, "KNOWN_ERROR");
    }

    #[test]
    fn test_detail_record_role_binding() {
        assert_eq!(EmployerDetails::ROLE_TYPE, OrgRoleType::Employer);
        assert_eq!(BrokerDetails::ROLE_TYPE, OrgRoleType::Broker);
        assert_eq!(ProviderOrgDetails::COLLECTION, "provider_org_details");
    }

    #[test]
    fn test_touch_bumps_updated_at() {
        let mut org = make_org();
        let before = org.updated_at;
        let later = before + chrono::Duration::seconds(90);
        org.touch(later);
        assert_eq!(org.updated_at, later);
        assert!(org.updated_at > before);
    }
}
