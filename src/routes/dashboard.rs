use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::PagingSettings;
use crate::core::{criteria_for, marker_for, predicate_document, predicate_for};
use crate::models::{
    BreedsResponse, Category, CategoryInfo, ErrorResponse, FilterQuery, HealthResponse, MapView,
    PageOrdering, PageQuery, PageResponse, RankedRecord, SummaryResponse,
};
use crate::services::{DashboardError, DashboardService, PageRequest};
use std::sync::Arc;

pub const NO_DATA_MESSAGE: &str = "No data available for this filter.";
pub const NO_SUMMARY_MESSAGE: &str = "No summary data available.";
pub const INVALID_FILTER_MESSAGE: &str = "Invalid filter.";
pub const UNAVAILABLE_MESSAGE: &str = "Database unavailable.";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
    pub paging: PagingSettings,
}

/// Configure all dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/categories", web::get().to(categories))
        .route("/animals", web::get().to(ranked_animals))
        .route("/breeds", web::get().to(breed_distribution))
        .route("/summary", web::get().to(summary));
}

/// Message shown in place of data when a request degrades
fn degraded_message(error: &DashboardError) -> &'static str {
    match error {
        DashboardError::InvalidCategory(e) => {
            tracing::warn!("Invalid filter type received: {:?}", e.value);
            INVALID_FILTER_MESSAGE
        }
        DashboardError::StoreUnavailable(reason) => {
            tracing::error!("Dashboard degraded, store unavailable: {}", reason);
            UNAVAILABLE_MESSAGE
        }
    }
}

fn validation_failed(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

/// Column ids for the table, taken from the first row's keys
fn column_names(row: &RankedRecord) -> Vec<String> {
    match serde_json::to_value(row) {
        Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.dashboard.is_healthy().await {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Category catalog endpoint
///
/// GET /api/v1/categories
async fn categories() -> impl Responder {
    let catalog: Vec<CategoryInfo> = Category::all()
        .into_iter()
        .map(|category| CategoryInfo {
            value: category,
            label: category.label().to_string(),
            criteria: criteria_for(category),
            predicate: predicate_document(&predicate_for(category)),
        })
        .collect();

    HttpResponse::Ok().json(catalog)
}

/// Ranked table endpoint
///
/// GET /api/v1/animals?filter=water&page=0&page_size=10&sort=breed:asc&selected=0
///
/// Without `sort` the page is ordered by match score. With a store sort the
/// rows keep the store's order and still carry their scores.
async fn ranked_animals(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors.to_string());
    }

    let sort = match query.sort_specs() {
        Ok(sort) => sort,
        Err(e) => return validation_failed(e.to_string()),
    };

    let page_size = state.paging.page_size(query.page_size);
    let request = PageRequest::from_table_sort(query.page, page_size, sort);

    let response = match state.dashboard.ranked_page(&query.filter, &request).await {
        Ok(result) => {
            let columns = result.rows.first().map(column_names).unwrap_or_default();
            let marker = marker_for(&result.rows, query.selected);
            let message = result.rows.is_empty().then(|| NO_DATA_MESSAGE.to_string());

            PageResponse {
                category: Some(result.category),
                page: result.page,
                page_size: result.page_size,
                total_results: result.total_results,
                ordering: result.ordering,
                columns,
                rows: result.rows,
                marker,
                map: MapView::default(),
                message,
            }
        }
        Err(e) => PageResponse {
            category: None,
            page: query.page,
            page_size: request.page_size,
            total_results: 0,
            ordering: PageOrdering::ByScore,
            columns: Vec::new(),
            rows: Vec::new(),
            marker: None,
            map: MapView::default(),
            message: Some(degraded_message(&e).to_string()),
        },
    };

    HttpResponse::Ok().json(response)
}

/// Breed distribution endpoint
///
/// GET /api/v1/breeds?filter=mountain
async fn breed_distribution(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> impl Responder {
    let response = match state.dashboard.breed_distribution(&query.filter).await {
        Ok(breeds) => BreedsResponse {
            category: query.filter.parse().ok(),
            message: breeds.is_empty().then(|| NO_DATA_MESSAGE.to_string()),
            breeds: breeds.to_vec(),
        },
        Err(e) => BreedsResponse {
            category: None,
            breeds: Vec::new(),
            message: Some(degraded_message(&e).to_string()),
        },
    };

    HttpResponse::Ok().json(response)
}

/// Summary rollups endpoint
///
/// GET /api/v1/summary?filter=disaster
async fn summary(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> impl Responder {
    let response = match state.dashboard.summary(&query.filter).await {
        Ok(summary) => {
            let empty = summary.sex_counts.is_empty() && summary.age_summary.is_none();
            SummaryResponse {
                category: query.filter.parse().ok(),
                sex_counts: summary.sex_counts.clone(),
                age_summary: summary.age_summary,
                message: empty.then(|| NO_SUMMARY_MESSAGE.to_string()),
            }
        }
        Err(e) => SummaryResponse {
            category: None,
            sex_counts: Vec::new(),
            age_summary: None,
            message: Some(degraded_message(&e).to_string()),
        },
    };

    HttpResponse::Ok().json(response)
}
