//! Core types for the exception engine (taxonomy, occurrences, output contracts).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Level assigned to occurrences recovered from a traceback with no header line.
pub const TRACEBACK_ONLY_LEVEL: &str = "ERROR";

/// Message assigned to occurrences recovered from a traceback with no header line.
pub const TRACEBACK_ONLY_MESSAGE: &str = "(traceback-only entry)";

/// Display label for an exception name that no category claims.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// One top-level bucket of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
  pub key: String,
  pub name: String,
  pub description: String,
  /// Recognized sub-error names, in curation order.
  pub errors: Vec<String>,
}

impl CategoryDefinition {
  pub fn new(key: &str, name: &str, description: &str, errors: &[&str]) -> Self {
    Self {
      key: key.to_string(),
      name: name.to_string(),
      description: description.to_string(),
      errors: errors.iter().map(|e| e.to_string()).collect(),
    }
  }

  pub fn contains(&self, sub_error: &str) -> bool {
    self.errors.iter().any(|e| e == sub_error)
  }
}

// ---------------------------------------------------------------------------
// Occurrence
// ---------------------------------------------------------------------------

/// One detected error/exception event, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogOccurrence {
  /// Zero-based index of the first source line of this occurrence.
  pub line: usize,
  pub timestamp: Option<NaiveDateTime>,
  pub timestamp_raw: Option<String>,
  pub module: Option<String>,
  pub level: String,
  pub message: String,
  pub exception_name: Option<String>,
  pub exception_message: String,
  pub category_key: Option<String>,
  pub raw_traceback: String,
}

impl LogOccurrence {
  pub fn is_traceback_only(&self) -> bool {
    self.message == TRACEBACK_ONLY_MESSAGE && self.module.is_none()
  }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
  pub key: String,
  pub name: String,
  pub total: u64,
}

/// Zero-filled counts over the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedCounts {
  /// Every known sub-error name (sorted) with its observed count.
  pub sub_errors: BTreeMap<String, u64>,
  /// One entry per category, in definition order.
  pub categories: Vec<CategoryTotal>,
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
  Minute,
  Hour,
  Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
  Module,
  Level,
  Exception,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
  pub bucket: NaiveDateTime,
  pub key: String,
  pub count: u64,
}

/// Top series per dimension at one shared granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timelines {
  pub granularity: Granularity,
  pub module: Vec<TimelinePoint>,
  pub level: Vec<TimelinePoint>,
  pub exception: Vec<TimelinePoint>,
}

// ---------------------------------------------------------------------------
// Scan results
// ---------------------------------------------------------------------------

/// Output of one extraction pass over an input.
#[derive(Debug, Clone)]
pub struct Scan {
  pub total_lines: usize,
  pub occurrences: Vec<LogOccurrence>,
}

/// Headline numbers for a scan and a filtered view of it.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
  pub total_lines: usize,
  pub detected: usize,
  pub filtered: usize,
  pub traceback_only: usize,
  /// Categories with a non-zero total, in definition order.
  pub categories: Vec<CategoryTotal>,
  /// Sub-errors with a non-zero count.
  pub sub_errors: BTreeMap<String, u64>,
}

// ---------------------------------------------------------------------------
// Export contract
// ---------------------------------------------------------------------------

/// One exported row. Field names are the stable CSV/JSON column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
  /// ISO-8601 or empty.
  pub timestamp: String,
  pub module: Option<String>,
  pub level: String,
  pub exception: Option<String>,
  pub exception_message: String,
  pub category: Option<String>,
  pub traceback: String,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for the binary.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
    }
  }
}
