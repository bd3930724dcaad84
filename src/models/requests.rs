use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{InvalidSort, SortSpec};

/// Query string of the ranked table endpoint
///
/// `filter` is not checked against the category list here:
/// an unknown category degrades to an empty table rather than a 400.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Comma separated `field:asc|desc` tokens
    #[serde(default)]
    #[validate(length(max = 512))]
    pub sort: Option<String>,
    /// Selected table row, drives the map marker
    #[serde(default)]
    pub selected: Option<usize>,
}

impl PageQuery {
    /// Parse the `sort` parameter into store sort specs
    pub fn sort_specs(&self) -> Result<Vec<SortSpec>, InvalidSort> {
        match self.sort.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| token.parse::<SortSpec>())
                .collect(),
        }
    }
}

/// Query string of the chart and summary endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "all".to_string()
}
