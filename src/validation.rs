//! Structural document validation
//!
//! Validates a candidate document (as `serde_json::Value`) against its
//! collection's declared contract: required fields present, types correct,
//! enum values in set, patterns matched, lengths and numeric bounds
//! respected. Every violation found is reported so callers can correct the
//! record in one pass; acceptance is all-or-nothing. Unknown fields are
//! permitted, matching the open-world semantics of the backing document
//! store.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{StructuralError, StructuralViolation};
use crate::schema::{CollectionSpec, FieldSpec, FieldType};

/// Validate a document against a collection spec.
///
/// Returns every violation found, or `Ok(())` when the document satisfies
/// the full contract.
pub fn validate_document(spec: &CollectionSpec, document: &Value) -> Result<(), StructuralError> {
    let mut violations = Vec::new();

    let Some(map) = document.as_object() else {
        return Err(StructuralError {
            collection: spec.name.to_string(),
            violations: vec![StructuralViolation::NotADocument],
        });
    };

    for field in &spec.fields {
        match map.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    violations.push(StructuralViolation::MissingField {
                        field: field.name.to_string(),
                    });
                }
            }
            Some(value) => {
                check_value(field.name, &field.field_type, value, &mut violations);
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(StructuralError {
            collection: spec.name.to_string(),
            violations,
        })
    }
}

/// Type name used in mismatch messages for an actual JSON value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(path: &str, expected: &FieldType, value: &Value) -> StructuralViolation {
    StructuralViolation::TypeMismatch {
        field: path.to_string(),
        expected: expected.type_name().to_string(),
        actual: json_type_name(value).to_string(),
    }
}

/// A stored date is either a calendar date or an RFC 3339 timestamp; the
/// store has a single date type covering both.
fn is_date_like(raw: &str) -> bool {
    NaiveDate::from_str(raw).is_ok() || DateTime::parse_from_rfc3339(raw).is_ok()
}

fn check_value(
    path: &str,
    field_type: &FieldType,
    value: &Value,
    violations: &mut Vec<StructuralViolation>,
) {
    match field_type {
        FieldType::Uuid => match value.as_str() {
            Some(raw) if Uuid::parse_str(raw).is_ok() => {}
            _ => violations.push(type_mismatch(path, field_type, value)),
        },
        FieldType::String {
            max_length,
            pattern,
        } => {
            let Some(raw) = value.as_str() else {
                violations.push(type_mismatch(path, field_type, value));
                return;
            };
            if let Some(max) = max_length {
                let length = raw.chars().count();
                if length > *max {
                    violations.push(StructuralViolation::MaxLengthExceeded {
                        field: path.to_string(),
                        length,
                        max: *max,
                    });
                }
            }
            if let Some(pattern) = pattern {
                if !pattern.is_match(raw) {
                    violations.push(StructuralViolation::PatternMismatch {
                        field: path.to_string(),
                        value: raw.to_string(),
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }
        FieldType::Enum(allowed) => {
            let Some(raw) = value.as_str() else {
                violations.push(type_mismatch(path, field_type, value));
                return;
            };
            if !allowed.contains(&raw) {
                violations.push(StructuralViolation::EnumMismatch {
                    field: path.to_string(),
                    value: raw.to_string(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        FieldType::Date => match value.as_str() {
            Some(raw) if is_date_like(raw) => {}
            _ => violations.push(type_mismatch(path, field_type, value)),
        },
        FieldType::Decimal => {
            // Decimals arrive as precision-preserving strings or plain
            // JSON numbers.
            let ok = match value {
                Value::String(raw) => Decimal::from_str(raw).is_ok(),
                Value::Number(_) => true,
                _ => false,
            };
            if !ok {
                violations.push(type_mismatch(path, field_type, value));
            }
        }
        FieldType::Int { min, max } => {
            let Some(n) = value.as_i64() else {
                violations.push(type_mismatch(path, field_type, value));
                return;
            };
            if let Some(min) = min {
                if n < *min {
                    violations.push(StructuralViolation::OutOfBounds {
                        field: path.to_string(),
                        value: n,
                        bound: format!(">= {min}"),
                    });
                }
            }
            if let Some(max) = max {
                if n > *max {
                    violations.push(StructuralViolation::OutOfBounds {
                        field: path.to_string(),
                        value: n,
                        bound: format!("<= {max}"),
                    });
                }
            }
        }
        FieldType::Bool => {
            if !value.is_boolean() {
                violations.push(type_mismatch(path, field_type, value));
            }
        }
        FieldType::Array(element) => {
            let Some(items) = value.as_array() else {
                violations.push(type_mismatch(path, field_type, value));
                return;
            };
            for (i, item) in items.iter().enumerate() {
                check_value(&format!("{path}[{i}]"), element, item, violations);
            }
        }
        FieldType::Object(fields) => {
            let Some(map) = value.as_object() else {
                violations.push(type_mismatch(path, field_type, value));
                return;
            };
            for field in fields {
                let child_path = format!("{path}.{}", field.name);
                match map.get(field.name) {
                    None | Some(Value::Null) => {
                        if field.required {
                            violations.push(StructuralViolation::MissingField {
                                field: child_path,
                            });
                        }
                    }
                    Some(child) => {
                        check_value(&child_path, &field.field_type, child, violations);
                    }
                }
            }
        }
    }
}

/// Validate a single field value in isolation (used by targeted checks
/// and tests).
pub fn validate_field(field: &FieldSpec, value: &Value) -> Vec<StructuralViolation> {
    let mut violations = Vec::new();
    check_value(field.name, &field.field_type, value, &mut violations);
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::{opt, req};
    use crate::schema::{CollectionSpec, FieldType};
    use serde_json::json;

    fn sample_spec() -> CollectionSpec {
        CollectionSpec::new("org_role", "test spec")
            .field(req("_id", FieldType::Uuid))
            .field(req("org_id", FieldType::Uuid))
            .field(req(
                "role_type",
                FieldType::enumeration(&["EMPLOYER", "CLIENT", "BROKER"]),
            ))
            .field(req("effective_date", FieldType::Date))
            .field(req("is_active", FieldType::Bool))
            .field(opt("level", FieldType::int_min(0)))
            .field(opt("state", FieldType::string_pattern("^[A-Z]{2}$").unwrap()))
    }

    fn valid_doc() -> serde_json::Value {
        json!({
            "_id": "1f0a81f4-52b2-4f2e-a1f9-0cb0b45f1a10",
            "org_id": "37a1f2f0-9203-4a53-8a7d-3a64bb2e7f22",
            "role_type": "EMPLOYER",
            "effective_date": "2024-01-01",
            "is_active": true
        })
    }

    #[test]
    fn test_valid_document_passes() {
        assert!(validate_document(&sample_spec(), &valid_doc()).is_ok());
    }

    #[test]
    fn test_missing_required_field_named() {
        let mut doc = valid_doc();
        doc.as_object_mut().unwrap().remove("role_type");
        let err = validate_document(&sample_spec(), &doc).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field(), Some("role_type"));
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let mut doc = valid_doc();
        doc["is_active"] = serde_json::Value::Null;
        let err = validate_document(&sample_spec(), &doc).unwrap_err();
        assert!(matches!(
            &err.violations[0],
            StructuralViolation::MissingField { field } if field == "is_active"
        ));
    }

    #[test]
    fn test_enum_outside_declared_set() {
        let mut doc = valid_doc();
        doc["role_type"] = json!("LANDLORD");
        let err = validate_document(&sample_spec(), &doc).unwrap_err();
        match &err.violations[0] {
            StructuralViolation::EnumMismatch { field, value, allowed } => {
                assert_eq!(field, "role_type");
                assert_eq!(value, "LANDLORD");
                assert_eq!(allowed.len(), 3);
            }
            other => panic!("Expected EnumMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_mismatch() {
        let mut doc = valid_doc();
        doc["state"] = json!("North Carolina");
        let err = validate_document(&sample_spec(), &doc).unwrap_err();
        assert!(matches!(
            &err.violations[0],
            StructuralViolation::PatternMismatch { field, .. } if field == "state"
        ));
    }

    #[test]
    fn test_int_bound() {
        let mut doc = valid_doc();
        doc["level"] = json!(-1);
        let err = validate_document(&sample_spec(), &doc).unwrap_err();
        assert!(matches!(
            &err.violations[0],
            StructuralViolation::OutOfBounds { field, value: -1, .. } if field == "level"
        ));
    }

    #[test]
    fn test_datetime_accepted_for_date() {
        let mut doc = valid_doc();
        doc["effective_date"] = json!("2024-01-01T08:30:00Z");
        assert!(validate_document(&sample_spec(), &doc).is_ok());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let doc = json!({
            "_id": "not-a-uuid",
            "role_type": "LANDLORD",
            "is_active": "yes"
        });
        let err = validate_document(&sample_spec(), &doc).unwrap_err();
        // bad uuid, missing org_id, bad enum, missing effective_date,
        // bad bool
        assert_eq!(err.violations.len(), 5);
    }

    #[test]
    fn test_unknown_fields_permitted() {
        let mut doc = valid_doc();
        doc["annotations"] = json!({"source": "import"});
        assert!(validate_document(&sample_spec(), &doc).is_ok());
    }

    #[test]
    fn test_nested_array_object_paths() {
        let spec = CollectionSpec::new("care_plan", "test").field(opt(
            "goals",
            FieldType::array_of(FieldType::object(vec![
                opt("description", FieldType::string()),
                opt("target_date", FieldType::Date),
            ])),
        ));
        let doc = json!({"goals": [{"description": "walk daily", "target_date": "bad"}]});
        let err = validate_document(&spec, &doc).unwrap_err();
        assert_eq!(err.violations[0].field(), Some("goals[0].target_date"));
    }

    #[test]
    fn test_decimal_accepts_string_and_number() {
        let spec =
            CollectionSpec::new("accumulator", "test").field(opt("amount", FieldType::Decimal));
        assert!(validate_document(&spec, &json!({"amount": "1250.75"})).is_ok());
        assert!(validate_document(&spec, &json!({"amount": 1250.75})).is_ok());
        assert!(validate_document(&spec, &json!({"amount": "12x"})).is_err());
    }
}
