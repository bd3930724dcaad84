use crate::models::{Category, Condition, InvalidCategory, MatchCriteria, StructuredPredicate};

pub const BREED_FIELD: &str = "breed";
pub const SEX_FIELD: &str = "sex_upon_outcome";
pub const AGE_FIELD: &str = "age_upon_outcome_in_weeks";

/// Fixed definition of one rescue category
struct RescueProfile {
    breeds: &'static [&'static str],
    sex: &'static str,
    min_weeks: u32,
    max_weeks: u32,
}

// 6 months to 3 years
const WATER: RescueProfile = RescueProfile {
    breeds: &["Labrador Retriever Mix", "Chesapeake Bay Retriever", "Newfoundland"],
    sex: "Intact Female",
    min_weeks: 26,
    max_weeks: 156,
};

// 6 months to 3 years
const MOUNTAIN: RescueProfile = RescueProfile {
    breeds: &[
        "German Shepherd",
        "Alaskan Malamute",
        "Old English Sheepdog",
        "Siberian Husky",
        "Rottweiler",
    ],
    sex: "Intact Male",
    min_weeks: 26,
    max_weeks: 156,
};

// 5 months to 7 years
const DISASTER: RescueProfile = RescueProfile {
    breeds: &[
        "Doberman Pinscher",
        "German Shepherd",
        "Golden Retriever",
        "Bloodhound",
        "Rottweiler",
    ],
    sex: "Intact Male",
    min_weeks: 20,
    max_weeks: 300,
};

fn profile(category: Category) -> Option<&'static RescueProfile> {
    match category {
        Category::All => None,
        Category::Water => Some(&WATER),
        Category::Mountain => Some(&MOUNTAIN),
        Category::Disaster => Some(&DISASTER),
    }
}

/// Validate a raw filter value from the dashboard
///
/// Must run before any query or criteria resolution.
pub fn validate_category(value: &str) -> Result<Category, InvalidCategory> {
    value.parse()
}

/// Scoring criteria for a category; `all` has no preferences
pub fn criteria_for(category: Category) -> MatchCriteria {
    match profile(category) {
        Some(p) => MatchCriteria::rescue(p.breeds, p.min_weeks, p.max_weeks, p.sex),
        None => MatchCriteria::empty(),
    }
}

/// Store predicate selecting the records a category targets
///
/// Conjunction of breed-in-set, exact sex, and inclusive age range.
/// `all` yields the empty predicate, which matches every record.
pub fn predicate_for(category: Category) -> StructuredPredicate {
    let Some(p) = profile(category) else {
        return StructuredPredicate::match_all();
    };

    StructuredPredicate {
        conditions: vec![
            Condition::In {
                field: BREED_FIELD.to_string(),
                values: p.breeds.iter().map(|b| b.to_string()).collect(),
            },
            Condition::Equals {
                field: SEX_FIELD.to_string(),
                value: p.sex.to_string(),
            },
            Condition::Between {
                field: AGE_FIELD.to_string(),
                min: f64::from(p.min_weeks),
                max: f64::from(p.max_weeks),
            },
        ],
    }
}
