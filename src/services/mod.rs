// Service exports
pub mod cache;
pub mod dashboard;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheStats, CategoryCache};
pub use dashboard::{DashboardError, DashboardService, PageRequest, PageResult, Summary};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{clamp_limit, AnimalStore, StoreError, MAX_PAGE_LIMIT};
