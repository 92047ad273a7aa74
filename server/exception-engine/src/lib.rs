//! Log Exception Extraction Engine — deterministic, heuristic, rule-based.
//!
//! Scans free-form log text for structured header lines and traceback
//! blocks, turns each into a `LogOccurrence`, and classifies the detected
//! exception name against a category -> sub-error table. Aggregation,
//! filtering, timelines and export are built on top of the occurrence list.
//!
//! No DB, no network; pure computation over in-memory text.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod taxonomy;
pub mod timeline;
pub mod types;

pub use aggregate::{aggregate_counts, category_label};
pub use config::Config;
pub use decode::{decode_log_bytes, DecodePolicy};
pub use engine::Engine;
pub use error::EngineError;
pub use extract::extract_occurrences;
pub use filter::{filter_occurrences, FilterCriteria};
pub use taxonomy::ClassificationTable;
pub use types::{AggregatedCounts, CategoryDefinition, ExportRecord, LogOccurrence};
