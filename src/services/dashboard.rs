use crate::core::{
    annotate, criteria_for, predicate_for, rank, rank_ascending, sanitize_records,
    validate_category, RankedPage,
};
use crate::core::ranker::{MATCH_SCORE_FIELD, SCORE_BREAKDOWN_FIELD};
use crate::models::{
    AgeSummary, BreedCount, Category, InvalidCategory, PageOrdering, SexCount, SortDirection,
    SortSpec,
};
use crate::services::cache::{CacheStats, CategoryCache};
use crate::services::store::{clamp_limit, AnimalStore, StoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced to the rendering layer
///
/// Neither is fatal: the HTTP layer turns both into an empty, renderable
/// payload.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    InvalidCategory(#[from] InvalidCategory),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for DashboardError {
    fn from(e: StoreError) -> Self {
        DashboardError::StoreUnavailable(e.to_string())
    }
}

/// One page request from the table
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    /// Sort applied by the store before paging
    pub sort: Vec<SortSpec>,
    pub ordering: PageOrdering,
}

impl PageRequest {
    /// Build a request from the table's sort state
    ///
    /// Computed score columns do not exist in the store, so sorts on them are
    /// not sent there. Any remaining store sort wins over score ordering;
    /// otherwise the direction of the first score sort picks the page order.
    pub fn from_table_sort(page: u32, page_size: u32, sort: Vec<SortSpec>) -> Self {
        let is_score = |spec: &SortSpec| {
            spec.field == MATCH_SCORE_FIELD || spec.field == SCORE_BREAKDOWN_FIELD
        };

        let score_direction = sort.iter().find(|spec| is_score(spec)).map(|spec| spec.direction);
        let sort: Vec<SortSpec> = sort.into_iter().filter(|spec| !is_score(spec)).collect();

        let ordering = match (sort.is_empty(), score_direction) {
            (false, _) => PageOrdering::AsFetched,
            (true, Some(SortDirection::Asc)) => PageOrdering::ByScoreAscending,
            (true, _) => PageOrdering::ByScore,
        };

        Self {
            page,
            page_size,
            sort,
            ordering,
        }
    }
}

/// Ranked page plus the paging context it was read with
#[derive(Debug, Clone)]
pub struct PageResult {
    pub category: Category,
    pub page: u32,
    pub page_size: u32,
    pub total_results: u64,
    pub ordering: PageOrdering,
    pub rows: RankedPage,
}

/// Sex breakdown and age rollup for a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub sex_counts: Vec<SexCount>,
    pub age_summary: Option<AgeSummary>,
}

/// Dashboard orchestration: validate, resolve, fetch, sanitize, rank
pub struct DashboardService {
    store: Arc<dyn AnimalStore>,
    breed_cache: CategoryCache<Arc<Vec<BreedCount>>>,
    summary_cache: CategoryCache<Arc<Summary>>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn AnimalStore>, cache_entries: u64, cache_ttl_secs: u64) -> Self {
        Self {
            store,
            breed_cache: CategoryCache::new(cache_entries, cache_ttl_secs),
            summary_cache: CategoryCache::new(cache_entries, cache_ttl_secs),
        }
    }

    /// Service without aggregate caching
    pub fn uncached(store: Arc<dyn AnimalStore>) -> Self {
        Self::new(store, 0, 0)
    }

    pub async fn is_healthy(&self) -> bool {
        self.store.ping().await
    }

    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.breed_cache.stats(), self.summary_cache.stats())
    }

    /// Drop cached aggregates, e.g. after new records were loaded
    pub fn invalidate_aggregates(&self) {
        self.breed_cache.invalidate_all();
        self.summary_cache.invalidate_all();
    }

    async fn ensure_available(&self) -> Result<(), DashboardError> {
        if self.store.ping().await {
            Ok(())
        } else {
            tracing::error!("Database unavailable for query");
            Err(DashboardError::StoreUnavailable("ping failed".to_string()))
        }
    }

    /// Read, sanitize and score one table page for a filter value
    pub async fn ranked_page(
        &self,
        filter: &str,
        request: &PageRequest,
    ) -> Result<PageResult, DashboardError> {
        let category = validate_category(filter)?;
        self.ensure_available().await?;

        let predicate = predicate_for(category);
        let criteria = criteria_for(category);

        let page_size = clamp_limit(request.page_size);
        let skip = u64::from(request.page) * u64::from(page_size);

        let documents = self
            .store
            .fetch_page(&predicate, &request.sort, skip, page_size)
            .await
            .inspect_err(|e| tracing::error!("Failed to read page for {}: {}", category, e))?;
        let total_results = self.store.count(&predicate).await?;

        let records = sanitize_records(&documents);
        let rows = match request.ordering {
            PageOrdering::ByScore => rank(records, &criteria),
            PageOrdering::ByScoreAscending => rank_ascending(records, &criteria),
            PageOrdering::AsFetched => annotate(records, &criteria),
        };

        tracing::info!(
            "Ranked page ok filter={} page={} results={} total={}",
            category,
            request.page,
            rows.len(),
            total_results
        );

        Ok(PageResult {
            category,
            page: request.page,
            page_size,
            total_results,
            ordering: request.ordering,
            rows,
        })
    }

    /// Breed counts for the distribution chart, most common first
    pub async fn breed_distribution(
        &self,
        filter: &str,
    ) -> Result<Arc<Vec<BreedCount>>, DashboardError> {
        let category = validate_category(filter)?;
        self.ensure_available().await?;

        if let Some(cached) = self.breed_cache.get(category).await {
            return Ok(cached);
        }

        let counts = self
            .store
            .breed_counts(&predicate_for(category))
            .await
            .inspect_err(|e| tracing::error!("Breed aggregation failed for {}: {}", category, e))?;
        let counts = Arc::new(counts);

        self.breed_cache.insert(category, Arc::clone(&counts)).await;
        tracing::debug!("Computed {} breed buckets for {}", counts.len(), category);

        Ok(counts)
    }

    /// Sex breakdown and age rollup for the summary panel
    pub async fn summary(&self, filter: &str) -> Result<Arc<Summary>, DashboardError> {
        let category = validate_category(filter)?;
        self.ensure_available().await?;

        if let Some(cached) = self.summary_cache.get(category).await {
            return Ok(cached);
        }

        let predicate = predicate_for(category);
        let sex_counts = self.store.sex_counts(&predicate).await?;
        let age_summary = self.store.age_summary(&predicate).await?;

        let summary = Arc::new(Summary {
            sex_counts,
            age_summary,
        });
        self.summary_cache.insert(category, Arc::clone(&summary)).await;

        Ok(summary)
    }
}
