use crate::models::{Condition, Document, SortDirection, SortSpec, StructuredPredicate};
use serde_json::{json, Value};
use std::cmp::Ordering;

/// Check whether a raw document satisfies a predicate
///
/// Range conditions only match JSON numbers; numeric text stored in the
/// age field does not satisfy them, the same as a document-store `$gte`.
#[inline]
pub fn matches_predicate(document: &Document, predicate: &StructuredPredicate) -> bool {
    predicate
        .conditions
        .iter()
        .all(|condition| matches_condition(document, condition))
}

#[inline]
fn matches_condition(document: &Document, condition: &Condition) -> bool {
    match condition {
        Condition::In { field, values } => document
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
        Condition::Equals { field, value } => document
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| v == value),
        Condition::Between { field, min, max } => document
            .get(field)
            .and_then(Value::as_f64)
            .is_some_and(|v| *min <= v && v <= *max),
    }
}

/// Render a predicate as a document-store filter
///
/// `{}` for the match-all predicate, otherwise `{"$and": [...]}`.
pub fn predicate_document(predicate: &StructuredPredicate) -> Value {
    if predicate.is_match_all() {
        return json!({});
    }

    let clauses: Vec<Value> = predicate
        .conditions
        .iter()
        .map(|condition| match condition {
            Condition::In { field, values } => json!({ field: { "$in": values } }),
            Condition::Equals { field, value } => json!({ field: value }),
            Condition::Between { field, min, max } => {
                json!({ field: { "$gte": min, "$lte": max } })
            }
        })
        .collect();

    json!({ "$and": clauses })
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Bool(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over JSON field values for store sorting
///
/// Missing/null < numbers < text < booleans < arrays < objects. Values of
/// the two container kinds compare equal among themselves.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare two documents by a list of sort keys, in priority order
pub fn compare_documents(a: &Document, b: &Document, sort: &[SortSpec]) -> Ordering {
    sort.iter()
        .map(|spec| {
            let ordering = compare_values(a.get(&spec.field), b.get(&spec.field));
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::predicate_for;
    use crate::models::Category;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_match_all_matches_everything() {
        let predicate = predicate_for(Category::All);
        assert!(matches_predicate(&document(json!({})), &predicate));
        assert!(matches_predicate(&document(json!({"breed": 1})), &predicate));
    }

    #[test]
    fn test_water_predicate() {
        let predicate = predicate_for(Category::Water);

        let hit = document(json!({
            "breed": "Newfoundland",
            "sex_upon_outcome": "Intact Female",
            "age_upon_outcome_in_weeks": 26,
        }));
        assert!(matches_predicate(&hit, &predicate));

        let wrong_sex = document(json!({
            "breed": "Newfoundland",
            "sex_upon_outcome": "Intact Male",
            "age_upon_outcome_in_weeks": 26,
        }));
        assert!(!matches_predicate(&wrong_sex, &predicate));

        let too_old = document(json!({
            "breed": "Newfoundland",
            "sex_upon_outcome": "Intact Female",
            "age_upon_outcome_in_weeks": 157,
        }));
        assert!(!matches_predicate(&too_old, &predicate));

        let text_age = document(json!({
            "breed": "Newfoundland",
            "sex_upon_outcome": "Intact Female",
            "age_upon_outcome_in_weeks": "52",
        }));
        assert!(!matches_predicate(&text_age, &predicate));
    }

    #[test]
    fn test_predicate_document() {
        assert_eq!(predicate_document(&predicate_for(Category::All)), json!({}));

        let water = predicate_document(&predicate_for(Category::Water));
        let clauses = water["$and"].as_array().unwrap();

        assert_eq!(clauses.len(), 3);
        assert_eq!(
            clauses[0]["breed"]["$in"],
            json!(["Labrador Retriever Mix", "Chesapeake Bay Retriever", "Newfoundland"])
        );
        assert_eq!(clauses[1], json!({"sex_upon_outcome": "Intact Female"}));
        assert_eq!(clauses[2]["age_upon_outcome_in_weeks"]["$gte"], json!(26.0));
        assert_eq!(clauses[2]["age_upon_outcome_in_weeks"]["$lte"], json!(156.0));
    }

    #[test]
    fn test_compare_values_cross_type() {
        assert_eq!(compare_values(None, Some(&json!(1))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(99)), Some(&json!("a"))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("b")), Some(&json!("a"))), Ordering::Greater);
        assert_eq!(compare_values(Some(&Value::Null), None), Ordering::Equal);
    }

    #[test]
    fn test_compare_documents_multi_key() {
        let a = document(json!({"breed": "Collie", "age_upon_outcome_in_weeks": 10}));
        let b = document(json!({"breed": "Collie", "age_upon_outcome_in_weeks": 20}));
        let sort = vec![
            SortSpec::new("breed", SortDirection::Asc),
            SortSpec::new("age_upon_outcome_in_weeks", SortDirection::Desc),
        ];

        assert_eq!(compare_documents(&a, &b, &sort), Ordering::Greater);
        assert_eq!(compare_documents(&a, &b, &[]), Ordering::Equal);
    }
}
