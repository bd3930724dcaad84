use serde::{Deserialize, Serialize};
use crate::models::domain::{
    AgeSummary, BreedCount, Category, MapMarker, MapView, MatchCriteria, PageOrdering,
    RankedRecord, SexCount,
};

/// Response for the ranked table endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub category: Option<Category>,
    pub page: u32,
    pub page_size: u32,
    pub total_results: u64,
    pub ordering: PageOrdering,
    pub columns: Vec<String>,
    pub rows: Vec<RankedRecord>,
    pub marker: Option<MapMarker>,
    pub map: MapView,
    pub message: Option<String>,
}

/// Response for the breed distribution chart
#[derive(Debug, Clone, Serialize)]
pub struct BreedsResponse {
    pub category: Option<Category>,
    pub breeds: Vec<BreedCount>,
    pub message: Option<String>,
}

/// Response for the summary rollups
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub category: Option<Category>,
    pub sex_counts: Vec<SexCount>,
    pub age_summary: Option<AgeSummary>,
    pub message: Option<String>,
}

/// One entry of the category catalog endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub value: Category,
    pub label: String,
    pub criteria: MatchCriteria,
    pub predicate: serde_json::Value,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
