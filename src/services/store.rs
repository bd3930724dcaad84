use crate::models::{AgeSummary, BreedCount, Document, SexCount, SortSpec, StructuredPredicate};
use async_trait::async_trait;
use thiserror::Error;

/// Largest page a store will return in one read
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Errors that can occur when reading from an animal store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Clamp a requested page size to `[1, MAX_PAGE_LIMIT]`
#[inline]
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

/// Page and aggregation reads over the shelter dataset
///
/// Implementations apply `sort` before `skip`/`limit` and break ties by
/// insertion order. Aggregate buckets come back ordered by count
/// descending, then key ascending with the null key last.
#[async_trait]
pub trait AnimalStore: Send + Sync {
    /// Whether the backing store is reachable right now
    async fn ping(&self) -> bool;

    /// Read one page of raw documents matching `predicate`
    async fn fetch_page(
        &self,
        predicate: &StructuredPredicate,
        sort: &[SortSpec],
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError>;

    /// Number of documents matching `predicate`
    async fn count(&self, predicate: &StructuredPredicate) -> Result<u64, StoreError>;

    /// Documents per breed
    async fn breed_counts(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Vec<BreedCount>, StoreError>;

    /// Documents per sex/reproductive status
    async fn sex_counts(&self, predicate: &StructuredPredicate)
        -> Result<Vec<SexCount>, StoreError>;

    /// Min/max/avg over numeric ages; `None` when no document has one
    async fn age_summary(
        &self,
        predicate: &StructuredPredicate,
    ) -> Result<Option<AgeSummary>, StoreError>;
}
