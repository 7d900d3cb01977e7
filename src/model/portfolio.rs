//! Portfolio-domain entities
//!
//! Portfolios group orgs and can nest. Ownership is a tagged union over
//! the owner_org_id/owner_person_id document fields: a portfolio is owned
//! by an org, by a person, or by nobody (system-owned). The
//! both-populated state is unrepresentable in the typed model and is
//! rejected at deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortfolioType {
    User,
    Wellnecity,
    Broker,
    Vendor,
    Employer,
    Carrier,
    HealthPlanSponsor,
}

/// Exclusive portfolio ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "OwnerFields", into = "OwnerFields")]
pub enum PortfolioOwner {
    Org(Uuid),
    Person(Uuid),
    #[default]
    Unowned,
}

/// Wire shape of the two nullable owner reference fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OwnerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner_org_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner_person_id: Option<Uuid>,
}

impl TryFrom<OwnerFields> for PortfolioOwner {
    type Error = String;

    fn try_from(fields: OwnerFields) -> Result<Self, Self::Error> {
        match (fields.owner_org_id, fields.owner_person_id) {
            (Some(_), Some(_)) => Err(
                "portfolio cannot populate both owner_org_id and owner_person_id".to_string(),
            ),
            (Some(org_id), None) => Ok(PortfolioOwner::Org(org_id)),
            (None, Some(person_id)) => Ok(PortfolioOwner::Person(person_id)),
            (None, None) => Ok(PortfolioOwner::Unowned),
        }
    }
}

impl From<PortfolioOwner> for OwnerFields {
    fn from(owner: PortfolioOwner) -> Self {
        match owner {
            PortfolioOwner::Org(org_id) => OwnerFields {
                owner_org_id: Some(org_id),
                owner_person_id: None,
            },
            PortfolioOwner::Person(person_id) => OwnerFields {
                owner_org_id: None,
                owner_person_id: Some(person_id),
            },
            PortfolioOwner::Unowned => OwnerFields {
                owner_org_id: None,
                owner_person_id: None,
            },
        }
    }
}

/// Flexible grouping of organizations; can be nested and owned by an ORG
/// or a PERSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub portfolio_type: PortfolioType,
    #[serde(flatten)]
    pub owner: PortfolioOwner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_portfolio_id: Option<Uuid>,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Portfolio, "portfolio");

/// Many-to-many join between PORTFOLIO and ORG, unique on the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMember {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub org_id: Uuid,
    pub effective_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(PortfolioMember, "portfolio_member");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;
    use serde_json::json;

    fn make_portfolio(owner: PortfolioOwner) -> Portfolio {
        Portfolio {
            id: Uuid::new_v4(),
            name: "Southeast Clients".into(),
            description: None,
            portfolio_type: PortfolioType::Broker,
            owner,
            parent_portfolio_id: None,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            termination_date: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_org_owner_serializes_to_owner_org_id() {
        let org_id = Uuid::new_v4();
        let doc = make_portfolio(PortfolioOwner::Org(org_id))
            .to_document()
            .unwrap();
        assert_eq!(doc["owner_org_id"], json!(org_id.to_string()));
        assert!(doc.get("owner_person_id").is_none());
    }

    #[test]
    fn test_unowned_serializes_neither_field() {
        let doc = make_portfolio(PortfolioOwner::Unowned)
            .to_document()
            .unwrap();
        assert!(doc.get("owner_org_id").is_none());
        assert!(doc.get("owner_person_id").is_none());
    }

    #[test]
    fn test_both_owners_rejected_on_deserialize() {
        let mut doc = make_portfolio(PortfolioOwner::Org(Uuid::new_v4()))
            .to_document()
            .unwrap();
        doc["owner_person_id"] = json!(Uuid::new_v4().to_string());
        let result = Portfolio::from_document(&doc);
        assert!(result.is_err());
    }

    #[test]
    fn test_owner_round_trip() {
        let person_id = Uuid::new_v4();
        let portfolio = make_portfolio(PortfolioOwner::Person(person_id));
        let doc = portfolio.to_document().unwrap();
        let back = Portfolio::from_document(&doc).unwrap();
        assert_eq!(back.owner, PortfolioOwner::Person(person_id));
        assert_eq!(back, portfolio);
    }
}
