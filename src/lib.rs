//! Rescue Match - ranking service for the shelter rescue dashboard
//!
//! Shelter outcome records are filtered by rescue category, sanitized,
//! scored against the category's criteria (breed 50, age 30, sex 20) and
//! served page by page together with breed and summary aggregates.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{criteria_for, predicate_for, rank, sanitize_record, score_record, validate_category};
pub use models::{AnimalRecord, Category, MatchCriteria, RankedRecord, ScoreBreakdown, StructuredPredicate};
pub use services::{AnimalStore, DashboardService, MemoryStore, PostgresStore};
