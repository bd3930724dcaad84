use crate::core::scoring::score_record;
use crate::models::{AnimalRecord, MatchCriteria, RankedRecord};

/// Ranked slice of one page, best matches first
pub type RankedPage = Vec<RankedRecord>;

/// Keys the ranker writes onto every record
pub const MATCH_SCORE_FIELD: &str = "match_score";
pub const SCORE_BREAKDOWN_FIELD: &str = "score_breakdown";

/// Score every record, keeping arrival order
///
/// Stale `match_score`/`score_breakdown` passthrough values (e.g. from an
/// earlier export) are replaced by the fresh annotation.
pub fn annotate(records: Vec<AnimalRecord>, criteria: &MatchCriteria) -> RankedPage {
    records
        .into_iter()
        .map(|mut record| {
            let score = score_record(&record, criteria);
            record.fields.shift_remove(MATCH_SCORE_FIELD);
            record.fields.shift_remove(SCORE_BREAKDOWN_FIELD);

            RankedRecord {
                record,
                match_score: score.total_score(),
                score_breakdown: score,
            }
        })
        .collect()
}

/// Score and order records by match score, highest first
///
/// The sort is stable: records with equal scores keep their input order,
/// which is the only tie-break.
pub fn rank(records: Vec<AnimalRecord>, criteria: &MatchCriteria) -> RankedPage {
    let mut ranked = annotate(records, criteria);
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}

/// Score and order records lowest score first, ties in input order
pub fn rank_ascending(records: Vec<AnimalRecord>, criteria: &MatchCriteria) -> RankedPage {
    let mut ranked = annotate(records, criteria);
    ranked.sort_by(|a, b| a.match_score.cmp(&b.match_score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::criteria_for;
    use crate::models::Category;
    use serde_json::{json, Map};

    fn create_record(breed: &str, age: f64, sex: &str) -> AnimalRecord {
        AnimalRecord {
            breed: Some(breed.to_string()),
            sex_upon_outcome: Some(sex.to_string()),
            age_upon_outcome_in_weeks: Some(age),
            fields: Map::new(),
        }
    }

    fn breeds(page: &RankedPage) -> Vec<&str> {
        page.iter()
            .map(|r| r.record.breed.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_rank_orders_by_score() {
        let records = vec![
            create_record("Terrier Mix", 50.0, "Intact Male"),
            create_record("Labrador Retriever Mix", 52.0, "Intact Female"),
            create_record("Beagle", 500.0, "Neutered Male"),
        ];

        let ranked = rank(records, &criteria_for(Category::Water));

        assert_eq!(breeds(&ranked), vec!["Labrador Retriever Mix", "Terrier Mix", "Beagle"]);
        assert_eq!(ranked[0].match_score, 100);
        assert_eq!(ranked[0].score_breakdown.breed_match(), 50);
        assert_eq!(ranked[1].match_score, 30);
        assert_eq!(ranked[2].match_score, 0);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let records = vec![
            create_record("Terrier", 10.0, "Intact Male"),
            create_record("Poodle", 20.0, "Intact Male"),
            create_record("Collie", 30.0, "Intact Male"),
        ];

        let ranked = rank(records, &MatchCriteria::empty());

        assert_eq!(breeds(&ranked), vec!["Terrier", "Poodle", "Collie"]);
        assert!(ranked.iter().all(|r| r.match_score == 0));
    }

    #[test]
    fn test_rank_ascending_keeps_ties_in_order() {
        let records = vec![
            create_record("Labrador Retriever Mix", 52.0, "Intact Female"),
            create_record("Terrier", 50.0, "Intact Male"),
            create_record("Beagle", 500.0, "Neutered Male"),
            create_record("Poodle", 60.0, "Intact Male"),
        ];

        let ranked = rank_ascending(records, &criteria_for(Category::Water));

        assert_eq!(
            breeds(&ranked),
            vec!["Beagle", "Terrier", "Poodle", "Labrador Retriever Mix"]
        );
        assert!(ranked.windows(2).all(|w| w[0].match_score <= w[1].match_score));
    }

    #[test]
    fn test_annotate_keeps_arrival_order() {
        let records = vec![
            create_record("Beagle", 500.0, "Neutered Male"),
            create_record("Labrador Retriever Mix", 52.0, "Intact Female"),
        ];

        let annotated = annotate(records, &criteria_for(Category::Water));

        assert_eq!(breeds(&annotated), vec!["Beagle", "Labrador Retriever Mix"]);
        assert_eq!(annotated[1].match_score, 100);
    }

    #[test]
    fn test_passthrough_fields_survive() {
        let mut record = create_record("Bloodhound", 40.0, "Intact Male");
        record.fields.insert("name".to_string(), json!("Scout"));
        record.fields.insert("animal_id".to_string(), json!("A123456"));

        let ranked = rank(vec![record.clone()], &criteria_for(Category::Disaster));

        assert_eq!(ranked[0].record, record);
        assert_eq!(ranked[0].match_score, 100);
    }

    #[test]
    fn test_stale_score_fields_replaced() {
        let mut record = create_record("Poodle", 10.0, "Spayed Female");
        record.fields.insert(MATCH_SCORE_FIELD.to_string(), json!(100));

        let ranked = rank(vec![record], &criteria_for(Category::Water));
        let value = serde_json::to_value(&ranked[0]).unwrap();

        assert_eq!(value[MATCH_SCORE_FIELD], json!(0));
        assert_eq!(value[SCORE_BREAKDOWN_FIELD]["age_match"], json!(0));
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(Vec::new(), &criteria_for(Category::Water)).is_empty());
    }
}
