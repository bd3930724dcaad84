use crate::models::{AnimalRecord, MatchCriteria, ScoreBreakdown};

/// Points for a preferred breed
pub const BREED_WEIGHT: u8 = 50;
/// Points for an age inside the preferred range
pub const AGE_WEIGHT: u8 = 30;
/// Points for the required sex/reproductive status
pub const SEX_WEIGHT: u8 = 20;

/// Score a record (0-100) against rescue criteria
///
/// Scoring formula:
/// score = (
///     breed_match      # 50 if breed is in the preferred set
///     + age_match      # 30 if min_weeks <= age <= max_weeks
///     + sex_match      # 20 if sex equals the required label
/// )
///
/// Each dimension is binary. A dimension the criteria leave unset always
/// scores 0, so empty criteria score every record 0.
pub fn score_record(record: &AnimalRecord, criteria: &MatchCriteria) -> ScoreBreakdown {
    ScoreBreakdown::new(
        score_breed(record, criteria),
        score_age(record, criteria),
        score_sex(record, criteria),
    )
}

#[inline]
fn score_breed(record: &AnimalRecord, criteria: &MatchCriteria) -> u8 {
    match (criteria.preferred_breeds(), record.breed.as_deref()) {
        (Some(breeds), Some(breed)) if breeds.contains(breed) => BREED_WEIGHT,
        _ => 0,
    }
}

#[inline]
fn score_age(record: &AnimalRecord, criteria: &MatchCriteria) -> u8 {
    let (Some(min), Some(max)) = (criteria.min_weeks(), criteria.max_weeks()) else {
        return 0;
    };

    match record.age_upon_outcome_in_weeks {
        Some(age) if f64::from(min) <= age && age <= f64::from(max) => AGE_WEIGHT,
        _ => 0,
    }
}

#[inline]
fn score_sex(record: &AnimalRecord, criteria: &MatchCriteria) -> u8 {
    match (criteria.preferred_sex(), record.sex_upon_outcome.as_deref()) {
        (Some(required), Some(sex)) if required == sex => SEX_WEIGHT,
        _ => 0,
    }
}
