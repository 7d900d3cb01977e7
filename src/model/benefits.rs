//! Benefits-domain entities
//!
//! Benefit plans with coverage tiers and limit templates, employee
//! eligibility, coverage instances, plan members (one SUBSCRIBER per
//! coverage, dependents chaining to it), and accumulators. Accumulator
//! scope is a tagged union over plan_member_id/coverage_id: a running
//! total is individual- or family-scoped, never both.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Hmo,
    Ppo,
    Hdhp,
    Epo,
    Pos,
    Indemnity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitType {
    Medical,
    Dental,
    Vision,
    Pharmacy,
    LifeDisability,
}

/// Health plan offered by an ORG holding a HEALTH_PLAN_SPONSOR role;
/// optionally assigned to an ORG_STRUCTURE_NODE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitPlan {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sponsor_org_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_structure_node_id: Option<Uuid>,
    pub plan_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_code: Option<String>,
    pub plan_type: PlanType,
    pub benefit_type: BenefitType,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(BenefitPlan, "benefit_plan");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageTier {
    Single,
    SingleDependent,
    SingleSpouse,
    Family,
    SpouseOnly,
    DependentOnly,
}

/// Tier within a plan (Single, Family, etc.) with financial limits,
/// unique per plan by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageType {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub benefit_plan_id: Uuid,
    pub name: CoverageTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_network_deductible_individual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_network_deductible_family: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_network_coinsurance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_network_oop_max_individual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_network_oop_max_family: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_network_deductible_individual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_network_deductible_family: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_network_coinsurance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_network_oop_max_individual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_network_oop_max_family: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copay_primary_care: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copay_specialist: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copay_emergency: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copay_urgent_care: Option<Decimal>,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(CoverageType, "coverage_type");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitType {
    Deductible,
    OopMax,
    VisitLimit,
    RxSpending,
    BenefitMax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkType {
    InNetwork,
    OutOfNetwork,
    Combined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitLevel {
    Individual,
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitCategory {
    Medical,
    Dental,
    Vision,
    Pharmacy,
    PhysicalTherapy,
    MentalHealth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    PlanYear,
    CalendarYear,
    Lifetime,
}

/// Template defining a limit for a plan, keyed by
/// limit_type x network_type x level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLimit {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub benefit_plan_id: Uuid,
    pub limit_type: LimitType,
    pub network_type: NetworkType,
    pub level: LimitLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefit_category: Option<BenefitCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_count: Option<i32>,
    pub period_type: PeriodType,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(PlanLimit, "plan_limit");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityStatus {
    NotEligible,
    EligibleEnrolled,
    EligibleNotEnrolled,
}

/// Links EMPLOYEE to BENEFIT_PLAN with eligibility status.
///
/// ELIGIBLE_ENROLLED should correlate with an actual PLAN_MEMBER row; the
/// registry reports that correlation as advisory unless configured
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub benefit_plan_id: Uuid,
    pub status: EligibilityStatus,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Eligibility, "eligibility");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Active,
    Terminated,
    Cobra,
    Pending,
}

/// Instance of enrollment in a COVERAGE_TYPE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub coverage_type_id: Uuid,
    pub benefit_plan_id: Uuid,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub status: CoverageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Coverage, "coverage");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanMemberType {
    Subscriber,
    Dependent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriberRelationship {
    #[serde(rename = "SELF")]
    Self_,
    Spouse,
    Child,
    DomesticPartner,
}

/// Person enrolled in a COVERAGE. Exactly one SUBSCRIBER per coverage;
/// each DEPENDENT references that subscriber via
/// subscriber_plan_member_id and never itself or another dependent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMember {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub coverage_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_plan_member_id: Option<Uuid>,
    pub member_type: PlanMemberType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_relationship_type: Option<SubscriberRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wellnecity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<String>,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(PlanMember, "plan_member");

/// Exclusive accumulator scope: individual (per plan member) or family
/// (per coverage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScopeFields", into = "ScopeFields")]
pub enum AccumulatorScope {
    Member(Uuid),
    Family(Uuid),
}

/// Wire shape of the two scope reference fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScopeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plan_member_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coverage_id: Option<Uuid>,
}

impl TryFrom<ScopeFields> for AccumulatorScope {
    type Error = String;

    fn try_from(fields: ScopeFields) -> Result<Self, Self::Error> {
        match (fields.plan_member_id, fields.coverage_id) {
            (Some(_), Some(_)) => {
                Err("accumulator cannot be scoped to both plan_member_id and coverage_id"
                    .to_string())
            }
            (Some(plan_member_id), None) => Ok(AccumulatorScope::Member(plan_member_id)),
            (None, Some(coverage_id)) => Ok(AccumulatorScope::Family(coverage_id)),
            (None, None) => {
                Err("accumulator requires either plan_member_id or coverage_id".to_string())
            }
        }
    }
}

impl From<AccumulatorScope> for ScopeFields {
    fn from(scope: AccumulatorScope) -> Self {
        match scope {
            AccumulatorScope::Member(plan_member_id) => ScopeFields {
                plan_member_id: Some(plan_member_id),
                coverage_id: None,
            },
            AccumulatorScope::Family(coverage_id) => ScopeFields {
                plan_member_id: None,
                coverage_id: Some(coverage_id),
            },
        }
    }
}

/// Running totals against a PLAN_LIMIT over a [period_start, period_end)
/// window. Totals never decrease within a period; new periods start
/// zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub plan_limit_id: Uuid,
    #[serde(flatten)]
    pub scope: AccumulatorScope,
    #[serde(default)]
    pub accumulated_amount: Decimal,
    #[serde(default)]
    pub accumulated_count: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Accumulator, "accumulator");

impl Accumulator {
    /// Whether the given service date falls inside this accumulator's
    /// period window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date < self.period_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;
    use serde_json::json;

    #[test]
    fn test_subscriber_relationship_self_rename() {
        assert_eq!(
            serde_json::to_value(SubscriberRelationship::Self_).unwrap(),
            "SELF"
        );
        assert_eq!(
            serde_json::to_value(SubscriberRelationship::DomesticPartner).unwrap(),
            "DOMESTIC_PARTNER"
        );
    }

    #[test]
    fn test_accumulator_scope_round_trip() {
        let member_id = Uuid::new_v4();
        let accumulator = Accumulator {
            id: Uuid::new_v4(),
            plan_limit_id: Uuid::new_v4(),
            scope: AccumulatorScope::Member(member_id),
            accumulated_amount: "1250.75".parse().unwrap(),
            accumulated_count: 3,
            period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let doc = accumulator.to_document().unwrap();
        assert_eq!(doc["plan_member_id"], json!(member_id.to_string()));
        assert!(doc.get("coverage_id").is_none());

        let back = Accumulator::from_document(&doc).unwrap();
        assert_eq!(back, accumulator);
        assert_eq!(back.accumulated_amount.to_string(), "1250.75");
    }

    #[test]
    fn test_accumulator_scope_exclusivity() {
        let doc = json!({
            "_id": Uuid::new_v4().to_string(),
            "plan_limit_id": Uuid::new_v4().to_string(),
            "plan_member_id": Uuid::new_v4().to_string(),
            "coverage_id": Uuid::new_v4().to_string(),
            "period_start": "2025-01-01",
            "period_end": "2026-01-01",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        });
        assert!(Accumulator::from_document(&doc).is_err());
    }

    #[test]
    fn test_accumulator_scope_required() {
        let doc = json!({
            "_id": Uuid::new_v4().to_string(),
            "plan_limit_id": Uuid::new_v4().to_string(),
            "period_start": "2025-01-01",
            "period_end": "2026-01-01",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        });
        assert!(Accumulator::from_document(&doc).is_err());
    }

    #[test]
    fn test_period_window_is_half_open() {
        let accumulator = Accumulator {
            id: Uuid::new_v4(),
            plan_limit_id: Uuid::new_v4(),
            scope: AccumulatorScope::Family(Uuid::new_v4()),
            accumulated_amount: Decimal::ZERO,
            accumulated_count: 0,
            period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(accumulator.covers(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(accumulator.covers(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!accumulator.covers(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }
}
