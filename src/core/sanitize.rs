use crate::core::catalog::{AGE_FIELD, BREED_FIELD, SEX_FIELD};
use crate::models::{AnimalRecord, Document};
use serde_json::Value;
use thiserror::Error;

/// Internal row identifier the store may leak into documents
pub const ID_FIELD: &str = "_id";

/// Optional passthrough fields and the default each gets when missing
const OPTIONAL_FIELDS: [(&str, Value); 3] = [
    ("name", Value::String(String::new())),
    ("location_lat", Value::Null),
    ("location_long", Value::Null),
];

/// A record field whose value cannot be interpreted
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Malformed value for {field}: {value}")]
pub struct MalformedField {
    pub field: &'static str,
    pub value: Value,
}

/// Interpret an age value as weeks
///
/// Numbers and numeric text (surrounding whitespace allowed) convert;
/// null is a legitimate "unknown". Anything else, including non-finite
/// numbers, is malformed.
pub fn parse_age(value: &Value) -> Result<Option<f64>, MalformedField> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(age) if age.is_finite() => Ok(Some(age)),
        _ => Err(MalformedField {
            field: AGE_FIELD,
            value: value.clone(),
        }),
    }
}

fn text_field(document: &mut Document, key: &str) -> Option<String> {
    match document.shift_remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Normalize one raw store document for scoring and display
///
/// Drops the internal `_id`, types the breed/sex/age core, and fills the
/// optional display fields without overwriting values already present.
/// A malformed age becomes `None`; nothing here fails.
pub fn sanitize_record(document: &Document) -> AnimalRecord {
    let mut fields = document.clone();
    fields.shift_remove(ID_FIELD);

    let breed = text_field(&mut fields, BREED_FIELD);
    let sex_upon_outcome = text_field(&mut fields, SEX_FIELD);
    let age_upon_outcome_in_weeks = match fields.shift_remove(AGE_FIELD) {
        None => None,
        Some(raw) => parse_age(&raw).unwrap_or_else(|e| {
            tracing::debug!("{}, substituting null", e);
            None
        }),
    };

    for (key, default) in OPTIONAL_FIELDS {
        fields.entry(key).or_insert(default);
    }

    AnimalRecord {
        breed,
        sex_upon_outcome,
        age_upon_outcome_in_weeks,
        fields,
    }
}

/// Sanitize a batch; output has the input's length and order
pub fn sanitize_records(documents: &[Document]) -> Vec<AnimalRecord> {
    documents.iter().map(sanitize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_adds_required_and_optional_fields() {
        let record = sanitize_record(&document(json!({"_id": "abc", "animal_id": "A1"})));

        assert_eq!(record.breed, None);
        assert_eq!(record.sex_upon_outcome, None);
        assert_eq!(record.age_upon_outcome_in_weeks, None);
        assert_eq!(record.field("name"), Some(&json!("")));
        assert_eq!(record.field("location_lat"), Some(&Value::Null));
        assert_eq!(record.field("location_long"), Some(&Value::Null));
        assert_eq!(record.field("animal_id"), Some(&json!("A1")));
        assert!(record.field(ID_FIELD).is_none());
    }

    #[test]
    fn test_keeps_existing_optional_values() {
        let record = sanitize_record(&document(json!({
            "name": "Rex",
            "location_lat": 30.6,
            "location_long": -97.4,
        })));

        assert_eq!(record.name(), "Rex");
        assert_eq!(record.field("location_lat"), Some(&json!(30.6)));
        assert_eq!(record.field("location_long"), Some(&json!(-97.4)));
    }

    #[test]
    fn test_coerces_age() {
        let cases = [
            (json!("12"), Some(12.0)),
            (json!(" 52.5 "), Some(52.5)),
            (json!(52), Some(52.0)),
            (json!("bad"), None),
            (json!(null), None),
            (json!(true), None),
            (json!([1]), None),
            (json!("NaN"), None),
            (json!("inf"), None),
        ];

        for (raw, expected) in cases {
            let record = sanitize_record(&document(json!({ "age_upon_outcome_in_weeks": raw })));
            assert_eq!(record.age_upon_outcome_in_weeks, expected, "raw {}", raw);
        }
    }

    #[test]
    fn test_parse_age_reports_malformed() {
        let err = parse_age(&json!("bad")).unwrap_err();
        assert_eq!(err.field, AGE_FIELD);
        assert_eq!(parse_age(&Value::Null), Ok(None));
    }

    #[test]
    fn test_non_text_breed_is_absent() {
        let record = sanitize_record(&document(json!({"breed": 42, "sex_upon_outcome": null})));
        assert_eq!(record.breed, None);
        assert_eq!(record.sex_upon_outcome, None);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let first = sanitize_record(&document(json!({
            "_id": {"$oid": "5f"},
            "breed": "Newfoundland",
            "age_upon_outcome_in_weeks": "104",
            "color": "Black",
        })));

        let reserialized = serde_json::to_value(&first).unwrap();
        let second = sanitize_record(&document(reserialized));

        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_preserves_length_and_order() {
        let docs = vec![
            document(json!({"breed": "Collie"})),
            document(json!({"age_upon_outcome_in_weeks": "bad"})),
            document(json!({"breed": "Poodle"})),
        ];

        let records = sanitize_records(&docs);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].breed.as_deref(), Some("Collie"));
        assert_eq!(records[1].breed, None);
        assert_eq!(records[2].breed.as_deref(), Some("Poodle"));
    }
}
