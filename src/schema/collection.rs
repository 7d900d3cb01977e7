//! Collection-level schema types
//!
//! A `CollectionSpec` is the structural contract plus access-path hints for
//! one entity collection: its fields, its secondary indexes (exact
//! composite order, unique/sparse modifiers), and whether the collection is
//! append-only.

use super::field::FieldSpec;

/// Sort order of one index key. Every declared index key is ascending;
/// descending is kept for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrder {
    Ascending,
    Descending,
}

/// One secondary access path over a collection.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub fields: Vec<(&'static str, IndexOrder)>,
    pub unique: bool,
    pub sparse: bool,
}

impl IndexSpec {
    /// Ascending index over the given fields, in the given composite order.
    pub fn ascending(fields: &[&'static str]) -> IndexSpec {
        IndexSpec {
            fields: fields
                .iter()
                .map(|f| (*f, IndexOrder::Ascending))
                .collect(),
            unique: false,
            sparse: false,
        }
    }

    pub fn unique(mut self) -> IndexSpec {
        self.unique = true;
        self
    }

    pub fn sparse(mut self) -> IndexSpec {
        self.sparse = true;
        self
    }
}

/// The declared contract for one entity collection.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldSpec>,
    pub indexes: Vec<IndexSpec>,
    /// Append-only collections reject updates after creation
    /// (audit trails).
    pub append_only: bool,
}

impl CollectionSpec {
    pub fn new(name: &'static str, description: &'static str) -> CollectionSpec {
        CollectionSpec {
            name,
            description,
            fields: Vec::new(),
            indexes: Vec::new(),
            append_only: false,
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> CollectionSpec {
        self.fields.push(spec);
        self
    }

    pub fn fields(mut self, specs: Vec<FieldSpec>) -> CollectionSpec {
        self.fields.extend(specs);
        self
    }

    pub fn index(mut self, index: IndexSpec) -> CollectionSpec {
        self.indexes.push(index);
        self
    }

    pub fn append_only(mut self) -> CollectionSpec {
        self.append_only = true;
        self
    }

    /// Look up a field spec by name.
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of all required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::{opt, req, FieldType};

    #[test]
    fn test_collection_builder() {
        let spec = CollectionSpec::new("org", "Base entity for organizations")
            .field(req("_id", FieldType::Uuid))
            .field(req("name", FieldType::string()))
            .field(opt("website", FieldType::string()))
            .index(IndexSpec::ascending(&["name"]))
            .index(IndexSpec::ascending(&["is_active"]));

        assert_eq!(spec.name, "org");
        assert_eq!(spec.fields.len(), 3);
        assert_eq!(spec.indexes.len(), 2);
        assert!(!spec.append_only);
        assert_eq!(
            spec.required_fields().collect::<Vec<_>>(),
            vec!["_id", "name"]
        );
        assert!(spec.field_spec("website").is_some());
        assert!(spec.field_spec("missing").is_none());
    }

    #[test]
    fn test_index_modifiers() {
        let idx = IndexSpec::ascending(&["npi"]).unique().sparse();
        assert!(idx.unique);
        assert!(idx.sparse);
        assert_eq!(idx.fields, vec![("npi", IndexOrder::Ascending)]);
    }
}
