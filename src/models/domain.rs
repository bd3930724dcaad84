use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw record as returned by a store: an open JSON object
pub type Document = Map<String, Value>;

/// Rescue-suitability filter selected on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Water,
    Mountain,
    Disaster,
}

impl Category {
    /// All categories in catalog order
    pub fn all() -> [Category; 4] {
        [Category::All, Category::Water, Category::Mountain, Category::Disaster]
    }

    /// Canonical filter value accepted at the boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Water => "water",
            Category::Mountain => "mountain",
            Category::Disaster => "disaster",
        }
    }

    /// Label shown next to the filter selector
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Water => "Water Rescue",
            Category::Mountain => "Mountain or Wilderness Rescue",
            Category::Disaster => "Disaster or Individual Tracking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter value that is not one of the canonical category strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid filter type: {value:?}")]
pub struct InvalidCategory {
    pub value: String,
}

impl FromStr for Category {
    type Err = InvalidCategory;

    /// Exact, case-sensitive match. No trimming.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Category::All),
            "water" => Ok(Category::Water),
            "mountain" => Ok(Category::Mountain),
            "disaster" => Ok(Category::Disaster),
            _ => Err(InvalidCategory {
                value: value.to_string(),
            }),
        }
    }
}

/// Age range whose minimum exceeds its maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid age range: min {min} weeks is greater than max {max} weeks")]
pub struct InvalidCriteria {
    pub min: u32,
    pub max: u32,
}

/// Breed/age/sex preferences a record is scored against
///
/// Every field absent means "no preference" and scores zero on every
/// dimension; that is what the `all` category resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchCriteria {
    preferred_breeds: Option<BTreeSet<String>>,
    min_weeks: Option<u32>,
    max_weeks: Option<u32>,
    preferred_sex: Option<String>,
}

impl MatchCriteria {
    /// Build criteria, rejecting an inverted age range
    pub fn new(
        preferred_breeds: Option<BTreeSet<String>>,
        min_weeks: Option<u32>,
        max_weeks: Option<u32>,
        preferred_sex: Option<String>,
    ) -> Result<Self, InvalidCriteria> {
        if let (Some(min), Some(max)) = (min_weeks, max_weeks) {
            if min > max {
                return Err(InvalidCriteria { min, max });
            }
        }

        Ok(Self {
            preferred_breeds,
            min_weeks,
            max_weeks,
            preferred_sex,
        })
    }

    /// Criteria with no preferences at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog constructor for rows known to be well-formed
    pub(crate) fn rescue(breeds: &[&str], min_weeks: u32, max_weeks: u32, sex: &str) -> Self {
        debug_assert!(min_weeks <= max_weeks);
        Self {
            preferred_breeds: Some(breeds.iter().map(|b| b.to_string()).collect()),
            min_weeks: Some(min_weeks),
            max_weeks: Some(max_weeks),
            preferred_sex: Some(sex.to_string()),
        }
    }

    pub fn preferred_breeds(&self) -> Option<&BTreeSet<String>> {
        self.preferred_breeds.as_ref()
    }

    pub fn min_weeks(&self) -> Option<u32> {
        self.min_weeks
    }

    pub fn max_weeks(&self) -> Option<u32> {
        self.max_weeks
    }

    pub fn preferred_sex(&self) -> Option<&str> {
        self.preferred_sex.as_deref()
    }

    /// True when no dimension carries a preference
    pub fn is_empty(&self) -> bool {
        self.preferred_breeds.is_none()
            && self.min_weeks.is_none()
            && self.max_weeks.is_none()
            && self.preferred_sex.is_none()
    }
}

/// One condition of a structured store predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// `field` is one of `values`
    In { field: String, values: Vec<String> },
    /// `field` equals `value` exactly
    Equals { field: String, value: String },
    /// `min <= field <= max`, numeric values only
    Between { field: String, min: f64, max: f64 },
}

/// Conjunction of conditions; no conditions matches every record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredPredicate {
    pub conditions: Vec<Condition>,
}

impl StructuredPredicate {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Shelter animal after sanitization
///
/// The fields the scorer reads are typed; everything else the store returned
/// rides along untouched in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub breed: Option<String>,
    pub sex_upon_outcome: Option<String>,
    pub age_upon_outcome_in_weeks: Option<f64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl AnimalRecord {
    /// Passthrough field lookup
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Display name, empty when the shelter never named the animal
    pub fn name(&self) -> &str {
        self.fields.get("name").and_then(Value::as_str).unwrap_or("")
    }
}

/// Per-dimension points for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    breed_match: u8,
    age_match: u8,
    sex_match: u8,
    total_score: u8,
}

impl ScoreBreakdown {
    pub fn new(breed_match: u8, age_match: u8, sex_match: u8) -> Self {
        Self {
            breed_match,
            age_match,
            sex_match,
            total_score: breed_match + age_match + sex_match,
        }
    }

    pub fn breed_match(&self) -> u8 {
        self.breed_match
    }

    pub fn age_match(&self) -> u8 {
        self.age_match
    }

    pub fn sex_match(&self) -> u8 {
        self.sex_match
    }

    pub fn total_score(&self) -> u8 {
        self.total_score
    }
}

/// Sanitized record annotated with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: AnimalRecord,
    pub match_score: u8,
    pub score_breakdown: ScoreBreakdown,
}

/// How a fetched page is ordered for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageOrdering {
    /// Highest score first, ties in arrival order
    ByScore,
    /// Lowest score first, ties in arrival order
    ByScoreAscending,
    /// Keep the order the store returned (caller asked for an explicit sort)
    AsFetched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `(field, direction)` pair of a store sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Malformed `field:direction` sort token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid sort specification: {0:?}")]
pub struct InvalidSort(pub String);

impl FromStr for SortSpec {
    type Err = InvalidSort;

    /// Parses `field` or `field:asc|desc`; a bare field sorts ascending
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match token.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some(_) => return Err(InvalidSort(token.to_string())),
            None => (token, SortDirection::Asc),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(InvalidSort(token.to_string()));
        }

        Ok(SortSpec::new(field, direction))
    }
}

/// Breed bucket of the distribution chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedCount {
    pub breed: Option<String>,
    pub count: u64,
}

/// Sex/reproductive-status bucket of the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexCount {
    pub sex_upon_outcome: Option<String>,
    pub count: u64,
}

/// Age rollup over records with a numeric age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub min_weeks: f64,
    pub max_weeks: f64,
    pub avg_weeks: f64,
}

/// Map pin for the selected table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub tooltip: String,
    pub popup: String,
}

/// Initial viewport of the location map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [30.75, -97.48],
            zoom: 10,
        }
    }
}
