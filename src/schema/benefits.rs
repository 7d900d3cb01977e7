//! Benefits-domain collection specs
//!
//! Benefit plans with their coverage tiers and limit templates,
//! employee eligibility, coverage instances, plan members, and the
//! accumulators that track spend against limits.

use super::collection::{CollectionSpec, IndexSpec};
use super::field::{opt, req, FieldType};
use crate::error::Result;

pub fn benefit_plan() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "benefit_plan",
        "Health plan offered by a HEALTH_PLAN_SPONSOR ORG; optionally linked to ORG_STRUCTURE_NODE",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("sponsor_org_id", FieldType::Uuid))
    .field(opt("org_structure_node_id", FieldType::Uuid))
    .field(req("plan_name", FieldType::string()))
    .field(opt("plan_code", FieldType::string()))
    .field(req(
        "plan_type",
        FieldType::enumeration(&["HMO", "PPO", "HDHP", "EPO", "POS", "INDEMNITY"]),
    ))
    .field(req(
        "benefit_type",
        FieldType::enumeration(&["MEDICAL", "DENTAL", "VISION", "PHARMACY", "LIFE_DISABILITY"]),
    ))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["sponsor_org_id"]))
    .index(IndexSpec::ascending(&["sponsor_org_id", "org_structure_node_id"]))
    .index(IndexSpec::ascending(&["org_structure_node_id"]).sparse())
    .index(IndexSpec::ascending(&["plan_code"]).unique().sparse())
    .index(IndexSpec::ascending(&["plan_type"]))
    .index(IndexSpec::ascending(&["benefit_type"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn coverage_type() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "coverage_type",
        "Tier within a plan (Single, Family, etc.) with financial limits",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("benefit_plan_id", FieldType::Uuid))
    .field(req(
        "name",
        FieldType::enumeration(&[
            "SINGLE",
            "SINGLE_DEPENDENT",
            "SINGLE_SPOUSE",
            "FAMILY",
            "SPOUSE_ONLY",
            "DEPENDENT_ONLY",
        ]),
    ))
    .field(opt("in_network_deductible_individual", FieldType::Decimal))
    .field(opt("in_network_deductible_family", FieldType::Decimal))
    .field(opt("in_network_coinsurance", FieldType::Decimal))
    .field(opt("in_network_oop_max_individual", FieldType::Decimal))
    .field(opt("in_network_oop_max_family", FieldType::Decimal))
    .field(opt("out_of_network_deductible_individual", FieldType::Decimal))
    .field(opt("out_of_network_deductible_family", FieldType::Decimal))
    .field(opt("out_of_network_coinsurance", FieldType::Decimal))
    .field(opt("out_of_network_oop_max_individual", FieldType::Decimal))
    .field(opt("out_of_network_oop_max_family", FieldType::Decimal))
    .field(opt("copay_primary_care", FieldType::Decimal))
    .field(opt("copay_specialist", FieldType::Decimal))
    .field(opt("copay_emergency", FieldType::Decimal))
    .field(opt("copay_urgent_care", FieldType::Decimal))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["benefit_plan_id"]))
    .index(IndexSpec::ascending(&["benefit_plan_id", "name"]).unique())
    .index(IndexSpec::ascending(&["name"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn plan_limit() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "plan_limit",
        "Template defining limits for a plan (deductible, OOP max, visit limits, etc.)",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("benefit_plan_id", FieldType::Uuid))
    .field(req(
        "limit_type",
        FieldType::enumeration(&[
            "DEDUCTIBLE",
            "OOP_MAX",
            "VISIT_LIMIT",
            "RX_SPENDING",
            "BENEFIT_MAX",
        ]),
    ))
    .field(req(
        "network_type",
        FieldType::enumeration(&["IN_NETWORK", "OUT_OF_NETWORK", "COMBINED"]),
    ))
    .field(req(
        "level",
        FieldType::enumeration(&["INDIVIDUAL", "FAMILY"]),
    ))
    .field(opt(
        "benefit_category",
        FieldType::enumeration(&[
            "MEDICAL",
            "DENTAL",
            "VISION",
            "PHARMACY",
            "PHYSICAL_THERAPY",
            "MENTAL_HEALTH",
        ]),
    ))
    .field(opt("limit_amount", FieldType::Decimal))
    .field(opt("limit_count", FieldType::int()))
    .field(req(
        "period_type",
        FieldType::enumeration(&["PLAN_YEAR", "CALENDAR_YEAR", "LIFETIME"]),
    ))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["benefit_plan_id"]))
    .index(IndexSpec::ascending(&["limit_type"]))
    .index(IndexSpec::ascending(&["network_type"]))
    .index(IndexSpec::ascending(&["level"]))
    .index(IndexSpec::ascending(&[
        "benefit_plan_id",
        "limit_type",
        "network_type",
        "level",
    ]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn eligibility() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "eligibility",
        "Links EMPLOYEE to BENEFIT_PLAN with eligibility status",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("employee_id", FieldType::Uuid))
    .field(req("benefit_plan_id", FieldType::Uuid))
    .field(req(
        "status",
        FieldType::enumeration(&["NOT_ELIGIBLE", "ELIGIBLE_ENROLLED", "ELIGIBLE_NOT_ENROLLED"]),
    ))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["employee_id"]))
    .index(IndexSpec::ascending(&["benefit_plan_id"]))
    .index(IndexSpec::ascending(&["employee_id", "benefit_plan_id"]))
    .index(IndexSpec::ascending(&["status"])))
}

pub fn coverage() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "coverage",
        "Instance of enrollment in a COVERAGE_TYPE",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("coverage_type_id", FieldType::Uuid))
    .field(req("benefit_plan_id", FieldType::Uuid))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req(
        "status",
        FieldType::enumeration(&["ACTIVE", "TERMINATED", "COBRA", "PENDING"]),
    ))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["coverage_type_id"]))
    .index(IndexSpec::ascending(&["benefit_plan_id"]))
    .index(IndexSpec::ascending(&["status"]))
    .index(IndexSpec::ascending(&["effective_date"])))
}

pub fn plan_member() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "plan_member",
        "Person enrolled in a COVERAGE (SUBSCRIBER or DEPENDENT)",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("person_id", FieldType::Uuid))
    .field(req("coverage_id", FieldType::Uuid))
    .field(opt("subscriber_plan_member_id", FieldType::Uuid))
    .field(req(
        "member_type",
        FieldType::enumeration(&["SUBSCRIBER", "DEPENDENT"]),
    ))
    .field(opt(
        "subscriber_relationship_type",
        FieldType::enumeration(&["SELF", "SPOUSE", "CHILD", "DOMESTIC_PARTNER"]),
    ))
    .field(opt("wellnecity_id", FieldType::string()))
    .field(opt("subscriber_id", FieldType::string()))
    .field(req("effective_date", FieldType::Date))
    .field(opt("termination_date", FieldType::Date))
    .field(req("is_active", FieldType::Bool))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["person_id"]))
    .index(IndexSpec::ascending(&["coverage_id"]))
    .index(IndexSpec::ascending(&["subscriber_plan_member_id"]))
    .index(IndexSpec::ascending(&["wellnecity_id"]).unique().sparse())
    .index(IndexSpec::ascending(&["subscriber_id"]))
    .index(IndexSpec::ascending(&["member_type"]))
    .index(IndexSpec::ascending(&["is_active"])))
}

pub fn accumulator() -> Result<CollectionSpec> {
    Ok(CollectionSpec::new(
        "accumulator",
        "Tracks spending/usage against PLAN_LIMIT for a PLAN_MEMBER or COVERAGE",
    )
    .field(req("_id", FieldType::Uuid))
    .field(req("plan_limit_id", FieldType::Uuid))
    .field(opt("plan_member_id", FieldType::Uuid))
    .field(opt("coverage_id", FieldType::Uuid))
    .field(opt("accumulated_amount", FieldType::Decimal))
    .field(opt("accumulated_count", FieldType::int()))
    .field(req("period_start", FieldType::Date))
    .field(req("period_end", FieldType::Date))
    .fields(super::timestamps())
    .index(IndexSpec::ascending(&["plan_limit_id"]))
    .index(IndexSpec::ascending(&["plan_member_id"]))
    .index(IndexSpec::ascending(&["coverage_id"]))
    .index(IndexSpec::ascending(&["period_start", "period_end"]))
    .index(IndexSpec::ascending(&["plan_limit_id", "plan_member_id", "period_start"]))
    .index(IndexSpec::ascending(&["plan_limit_id", "coverage_id", "period_start"])))
}
