use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use rescue_match::config::{LoggingSettings, Settings, StoreBackend};
use rescue_match::models::StructuredPredicate;
use rescue_match::routes::{self, dashboard::AppState};
use rescue_match::services::{AnimalStore, DashboardService, MemoryStore, PostgresStore, StoreError};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON body for rejected query strings
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Install the global subscriber; LOG_LEVEL and LOG_FORMAT win over the file
fn init_logging(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

/// Build the configured store, seeding it when a seed file is set
async fn build_store(settings: &Settings) -> Result<Arc<dyn AnimalStore>, StoreError> {
    let seed_path = settings.store.seed_path.as_deref();

    match settings.store.backend {
        StoreBackend::Memory => {
            let store = match seed_path {
                Some(path) => MemoryStore::load(path).await?,
                None => {
                    warn!("Memory store started without a seed file");
                    MemoryStore::default()
                }
            };
            info!("Memory store ready with {} records", store.len());
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            let db = &settings.database;
            let store = PostgresStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await?;

            if let Some(path) = seed_path {
                if store.count(&StructuredPredicate::match_all()).await? == 0 {
                    let seed = MemoryStore::load(path).await?;
                    store.insert_documents(seed.documents()).await?;
                }
            }

            info!(
                "PostgreSQL store ready (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    init_logging(&settings.logging);

    info!("Starting rescue match dashboard service...");

    let store = build_store(&settings).await.unwrap_or_else(|e| {
        error!("Failed to initialize store: {}", e);
        panic!("Store initialization error: {}", e);
    });

    let dashboard = Arc::new(DashboardService::new(
        store,
        settings.cache.max_entries,
        settings.cache.ttl_secs,
    ));

    info!(
        "Dashboard service initialized (cache TTL: {}s, entries: {})",
        settings.cache.ttl_secs, settings.cache.max_entries
    );

    let app_state = AppState {
        dashboard,
        paging: settings.paging.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
