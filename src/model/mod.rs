//! Typed entity models
//!
//! One Rust struct per collection, (de)serializing to the exact document
//! shape the schema registry declares: `_id` primary keys, snake_case
//! fields, and the enum literal casing of the collection contracts.
//! Portfolio ownership and accumulator scope are tagged unions,
//! eliminating the invalid both-populated states by construction.

pub mod benefits;
pub mod health_record;
pub mod org;
pub mod person;
pub mod portfolio;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;

pub use benefits::*;
pub use health_record::*;
pub use org::*;
pub use person::*;
pub use portfolio::*;

/// A typed record belonging to one registry collection.
pub trait Entity: Serialize + DeserializeOwned {
    /// Collection this entity is stored in.
    const COLLECTION: &'static str;

    /// Primary key.
    fn id(&self) -> Uuid;

    /// Bump the audit timestamp on mutation. Append-only entities keep
    /// this a no-op.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Serialize to the stored document shape.
    fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from a stored document.
    fn from_document(document: &Value) -> Result<Self> {
        Ok(serde_json::from_value(document.clone())?)
    }
}

macro_rules! impl_entity {
    ($entity:ty, $collection:literal) => {
        impl $crate::model::Entity for $entity {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> uuid::Uuid {
                self.id
            }

            fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
                self.updated_at = now;
            }
        }
    };
}

pub(crate) use impl_entity;
