// Core algorithm exports
pub mod catalog;
pub mod filters;
pub mod location;
pub mod ranker;
pub mod sanitize;
pub mod scoring;

pub use catalog::{criteria_for, predicate_for, validate_category};
pub use filters::{compare_documents, matches_predicate, predicate_document};
pub use location::marker_for;
pub use ranker::{annotate, rank, rank_ascending, RankedPage};
pub use sanitize::{sanitize_record, sanitize_records, MalformedField};
pub use scoring::score_record;
