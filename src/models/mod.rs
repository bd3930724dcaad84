// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeSummary, AnimalRecord, BreedCount, Category, Condition, Document, InvalidCategory,
    InvalidCriteria, InvalidSort, MapMarker, MapView, MatchCriteria, PageOrdering, RankedRecord,
    ScoreBreakdown, SexCount, SortDirection, SortSpec, StructuredPredicate,
};
pub use requests::{FilterQuery, PageQuery};
pub use responses::{
    BreedsResponse, CategoryInfo, ErrorResponse, HealthResponse, PageResponse, SummaryResponse,
};
