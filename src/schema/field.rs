//! Field-level schema types
//!
//! `FieldType` and `FieldSpec` describe the semantic type of a single
//! document field: UUIDs, strings with optional max length and pattern,
//! enumerated strings, dates, decimals, bounded integers, booleans, and
//! nested arrays/objects. These are the building blocks the per-domain
//! collection constructors assemble into `CollectionSpec`s.

use regex::Regex;

use crate::error::Result;

/// A compiled string pattern constraint.
///
/// Keeps the raw pattern text alongside the compiled regex so violations
/// can echo the rule back to the caller.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(raw: &str) -> Result<Self> {
        let regex = Regex::new(raw)?;
        Ok(Pattern {
            raw: raw.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Semantic type of a document field.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// 128-bit identifier, stored as its canonical string form.
    Uuid,
    /// String with optional maximum length and pattern constraint.
    String {
        max_length: Option<usize>,
        pattern: Option<Pattern>,
    },
    /// String restricted to a declared value set.
    Enum(Vec<&'static str>),
    /// Calendar date or timestamp (the store has a single date type
    /// covering both).
    Date,
    /// Arbitrary-precision decimal, for monetary amounts and measurements.
    Decimal,
    /// Integer with optional inclusive bounds.
    Int {
        min: Option<i64>,
        max: Option<i64>,
    },
    Bool,
    /// Homogeneous array of the given element type.
    Array(Box<FieldType>),
    /// Nested object with its own field specs.
    Object(Vec<FieldSpec>),
}

impl FieldType {
    pub fn string() -> FieldType {
        FieldType::String {
            max_length: None,
            pattern: None,
        }
    }

    pub fn string_max(max_length: usize) -> FieldType {
        FieldType::String {
            max_length: Some(max_length),
            pattern: None,
        }
    }

    pub fn string_pattern(pattern: &str) -> Result<FieldType> {
        Ok(FieldType::String {
            max_length: None,
            pattern: Some(Pattern::new(pattern)?),
        })
    }

    pub fn enumeration(values: &[&'static str]) -> FieldType {
        FieldType::Enum(values.to_vec())
    }

    pub fn int() -> FieldType {
        FieldType::Int {
            min: None,
            max: None,
        }
    }

    pub fn int_min(min: i64) -> FieldType {
        FieldType::Int {
            min: Some(min),
            max: None,
        }
    }

    pub fn array_of(element: FieldType) -> FieldType {
        FieldType::Array(Box::new(element))
    }

    pub fn object(fields: Vec<FieldSpec>) -> FieldType {
        FieldType::Object(fields)
    }

    /// Human-readable type name used in violation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Uuid => "uuid",
            FieldType::String { .. } => "string",
            FieldType::Enum(_) => "enum string",
            FieldType::Date => "date",
            FieldType::Decimal => "decimal",
            FieldType::Int { .. } => "integer",
            FieldType::Bool => "boolean",
            FieldType::Array(_) => "array",
            FieldType::Object(_) => "object",
        }
    }
}

/// One field of a collection contract.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

/// Required-field constructor.
pub fn req(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required: true,
    }
}

/// Optional-field constructor.
pub fn opt(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_match() {
        let p = Pattern::new("^[A-Z]{2}$").unwrap();
        assert!(p.is_match("NC"));
        assert!(!p.is_match("NCX"));
        assert_eq!(p.as_str(), "^[A-Z]{2}$");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(Pattern::new("([A-Z}").is_err());
    }

    #[test]
    fn test_field_constructors() {
        let f = req("role_type", FieldType::enumeration(&["EMPLOYER", "CLIENT"]));
        assert!(f.required);
        assert_eq!(f.field_type.type_name(), "enum string");

        let f = opt("employee_count", FieldType::int_min(0));
        assert!(!f.required);
        match f.field_type {
            FieldType::Int { min, max } => {
                assert_eq!(min, Some(0));
                assert_eq!(max, None);
            }
            _ => panic!("Expected Int field type"),
        }
    }
}
