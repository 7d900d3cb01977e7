//! Portfolio-domain collection specs
//!
//! Portfolios are nestable groupings of orgs, owned by an org, a person,
//! or nobody (system-owned); membership is a unique (portfolio, org) join.

use super::collection::{CollectionSpec, IndexSpec};
use super::field::{opt, req, FieldType};
use crate::error::Result;

pub fn portfolio() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "portfolio",
        "Flexible grouping of organizations; can be nested and owned by ORG or PERSON",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("name", FieldType::string()))
    .field(opt("description", FieldType::string()))
    .field(req(
        "portfolio_type",
        FieldType::enumeration(&[
            "USER",
            "WELLNECITY",
            "BROKER",
            "VENDOR",
            "EMPLOYER",
            "CARRIER",
            "HEALTH_PLAN_SPONSOR",
        ]),
    ))
    .field(opt("owner_org_id", FieldType::Uuid))
    .field(opt("owner_person_id", FieldType::Uuid))
    .field(opt("parent_portfolio_id", FieldType::Uuid))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["name"]))
    .index(IndexSpec::ascending(&["portfolio_type"]))
    .index(IndexSpec::ascending(&["owner_org_id"]))
    .index(IndexSpec::ascending(&["owner_person_id"]))
    .index(IndexSpec::ascending(&["parent_portfolio_id"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn portfolio_member() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "portfolio_member",
        "Links a PORTFOLIO to an ORG (any org, not just clients)",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("portfolio_id", FieldType::Uuid))
    .field(req("org_id", FieldType::Uuid))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["portfolio_id"]))
    .index(IndexSpec::ascending(&["org_id"]))
    .index(IndexSpec::ascending(&["portfolio_id", "org_id"]).unique())
    .index(IndexSpec::ascending(&["is_active"])))
}
