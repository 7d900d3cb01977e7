//! Schema Registry
//!
//! Static declaration of the structural contract and access-path hints for
//! every collection in the enterprise data model: field names and semantic
//! types, required-field lists, enum value sets, pattern and bound
//! constraints, and secondary indexes. The registry is consumed at
//! store-initialization time; there is no control flow here beyond
//! building and looking up specs.
//!
//! Collections are grouped into five domains:
//!
//! - Organization (15): org, identifiers/contacts/roles, the seven
//!   role-detail collections, relationships, contracts, org structures
//! - Portfolio (2): portfolio, portfolio_member
//! - Person (8): person, identifiers/contacts, employee, provider,
//!   provider_affiliation, household, household_participant
//! - Benefits (7): benefit_plan, coverage_type, plan_limit, eligibility,
//!   coverage, plan_member, accumulator
//! - Health record (12): composition, the ten clinical entry collections,
//!   provenance (append-only)

pub mod collection;
pub mod field;

mod benefits;
mod health_record;
mod org;
mod person;
mod portfolio;

use std::collections::BTreeMap;

use tracing::debug;

pub use collection::{CollectionSpec, IndexOrder, IndexSpec};
pub use field::{FieldSpec, FieldType, Pattern};

use crate::error::{EdmError, Result};

// Shared string patterns used across collection contracts.
pub(crate) const US_STATE: &str = "^[A-Z]{2}$";
pub(crate) const ZIP_CODE: &str = "^[0-9]{5}(-[0-9]{4})?$";
pub(crate) const NPI: &str = "^[0-9]{10}$";
pub(crate) const TAXONOMY_CODE: &str = "^[0-9A-Z]{10}$";
pub(crate) const NAIC_CODE: &str = "^[0-9]{5}$";
pub(crate) const SIC_CODE: &str = "^[0-9]{4}$";
pub(crate) const NAICS_CODE: &str = "^[0-9]{2,6}$";
pub(crate) const LANGUAGE_CODE: &str = "^[a-z]{2}$";
pub(crate) const TERRITORY_CODE: &str = "^[A-Z]{2}$";

/// The audit timestamp pair every mutable collection carries.
pub(crate) fn timestamps() -> Vec<FieldSpec> {
    vec![
        field::req("created_at", FieldType::Date),
        field::req("updated_at", FieldType::Date),
    ]
}

/// Registry of every collection contract in the data model.
///
/// Built once at startup; lookups are by collection name.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    collections: BTreeMap<&'static str, CollectionSpec>,
}

impl SchemaRegistry {
    /// Build the full registry: all 44 collection specs across the five
    /// domains.
    pub fn bootstrap() -> Result<SchemaRegistry> {
        let specs = vec![
            // Organization domain
            org::org()?,
            org::org_identifier()?,
            org::org_contact()?,
            org::org_role()?,
            org::employer_details()?,
            org::client_details()?,
            org::vendor_details()?,
            org::broker_details()?,
            org::carrier_details()?,
            org::health_plan_sponsor_details()?,
            org::provider_org_details()?,
            org::org_relationship()?,
            org::contract()?,
            org::org_structure()?,
            org::org_structure_node()?,
            // Portfolio domain
            portfolio::portfolio()?,
            portfolio::portfolio_member()?,
            // Person domain
            person::person()?,
            person::person_identifier()?,
            person::person_contact()?,
            person::employee()?,
            person::provider()?,
            person::provider_affiliation()?,
            person::household()?,
            person::household_participant()?,
            // Benefits domain
            benefits::benefit_plan()?,
            benefits::coverage_type()?,
            benefits::plan_limit()?,
            benefits::eligibility()?,
            benefits::coverage()?,
            benefits::plan_member()?,
            benefits::accumulator()?,
            // Health record domain
            health_record::health_record_composition()?,
            health_record::problem()?,
            health_record::allergy()?,
            health_record::medication()?,
            health_record::vital_sign()?,
            health_record::lab_result()?,
            health_record::procedure_record()?,
            health_record::immunization()?,
            health_record::clinical_note()?,
            health_record::care_plan()?,
            health_record::encounter_record()?,
            health_record::health_record_provenance()?,
        ];

        let mut collections = BTreeMap::new();
        for spec in specs {
            debug!(
                collection = spec.name,
                fields = spec.fields.len(),
                indexes = spec.indexes.len(),
                "registered collection spec"
            );
            collections.insert(spec.name, spec);
        }

        Ok(SchemaRegistry { collections })
    }

    /// Look up a collection spec, erroring on unknown names.
    pub fn spec(&self, collection: &str) -> Result<&CollectionSpec> {
        self.collections
            .get(collection)
            .ok_or_else(|| EdmError::UnknownCollection(collection.to_string()))
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.collections.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_registers_all_collections() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        assert_eq!(registry.len(), 44);

        for name in [
            "org",
            "org_role",
            "employer_details",
            "portfolio",
            "person",
            "employee",
            "benefit_plan",
            "plan_member",
            "accumulator",
            "health_record_composition",
            "health_record_provenance",
        ] {
            assert!(registry.contains(name), "missing collection '{name}'");
        }
        assert!(!registry.contains("claims"));
    }

    #[test]
    fn test_every_collection_has_id_and_created_at() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        for name in registry.collection_names().collect::<Vec<_>>() {
            let spec = registry.spec(name).unwrap();
            let id = spec.field_spec("_id").unwrap_or_else(|| {
                panic!("collection '{name}' is missing _id");
            });
            assert!(id.required, "'_id' must be required in '{name}'");
            assert!(
                spec.field_spec("created_at").map(|f| f.required) == Some(true),
                "'created_at' must be required in '{name}'"
            );
        }
    }

    #[test]
    fn test_unique_sparse_business_keys() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        let cases = [
            ("client_details", "client_code"),
            ("provider_org_details", "npi"),
            ("provider", "npi"),
            ("benefit_plan", "plan_code"),
            ("plan_member", "wellnecity_id"),
            ("contract", "contract_number"),
        ];
        for (collection, field) in cases {
            let spec = registry.spec(collection).unwrap();
            let found = spec.indexes.iter().any(|idx| {
                idx.unique && idx.sparse && idx.fields.len() == 1 && idx.fields[0].0 == field
            });
            assert!(found, "expected unique sparse index on {collection}.{field}");
        }
    }

    #[test]
    fn test_detail_collections_key_on_role_id() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        for name in [
            "employer_details",
            "client_details",
            "vendor_details",
            "broker_details",
            "carrier_details",
            "health_plan_sponsor_details",
            "provider_org_details",
        ] {
            let spec = registry.spec(name).unwrap();
            assert!(
                spec.indexes
                    .iter()
                    .any(|i| i.unique && i.fields == vec![("org_role_id", IndexOrder::Ascending)]),
                "'{name}' must have a unique org_role_id index"
            );
        }
    }

    #[test]
    fn test_compound_index_order_preserved() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        let spec = registry.spec("plan_limit").unwrap();
        let compound = spec
            .indexes
            .iter()
            .find(|i| i.fields.len() == 4)
            .expect("plan_limit compound index");
        let names: Vec<_> = compound.fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["benefit_plan_id", "limit_type", "network_type", "level"]
        );
    }

    #[test]
    fn test_provenance_is_append_only() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        assert!(registry.spec("health_record_provenance").unwrap().append_only);
        assert!(!registry.spec("problem").unwrap().append_only);
    }

    #[test]
    fn test_unknown_collection_errors() {
        let registry = SchemaRegistry::bootstrap().unwrap();
        match registry.spec("nonexistent") {
            Err(EdmError::UnknownCollection(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected UnknownCollection, got {other:?}"),
        }
    }
}
