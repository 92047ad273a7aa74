//! Engine facade: owns the configuration and classification table and
//! runs the decode -> extract -> aggregate/filter/timeline pipeline.

use std::borrow::Cow;
use tracing::{debug, info};

use crate::aggregate;
use crate::config::Config;
use crate::decode;
use crate::error::EngineError;
use crate::extract;
use crate::filter::{self, FilterCriteria};
use crate::taxonomy::ClassificationTable;
use crate::timeline;
use crate::types::*;

pub struct Engine {
  config: Config,
  table: ClassificationTable,
}

impl Engine {
  /// Build an engine, loading the classification table from
  /// `config.table_path` when set.
  pub fn new(config: Config) -> Result<Self, EngineError> {
    let table = match &config.table_path {
      Some(path) => {
        let table = ClassificationTable::from_json_file(path)?;
        info!(path = %path.display(), categories = table.categories().len(), "loaded classification table");
        table
      }
      None => ClassificationTable::builtin(),
    };
    Ok(Self::with_table(config, table))
  }

  pub fn with_table(config: Config, table: ClassificationTable) -> Self {
    Self { config, table }
  }

  pub fn with_defaults() -> Self {
    Self::with_table(Config::default(), ClassificationTable::builtin())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn table(&self) -> &ClassificationTable {
    &self.table
  }

  /// Extract occurrences from already-decoded text.
  pub fn extract(&self, text: &str) -> Vec<LogOccurrence> {
    extract::extract_occurrences(text, &self.table)
  }

  /// Decode raw input per the configured policy.
  pub fn decode<'b>(&self, bytes: &'b [u8]) -> Result<Cow<'b, str>, EngineError> {
    decode::decode_log_bytes(bytes, self.config.decode_policy)
  }

  pub fn scan(&self, text: &str) -> Scan {
    let occurrences = self.extract(text);
    let total_lines = extract::split_lines(text).len();
    debug!(total_lines, detected = occurrences.len(), "scan complete");
    Scan {
      total_lines,
      occurrences,
    }
  }

  pub fn aggregate(&self, occurrences: &[LogOccurrence]) -> AggregatedCounts {
    aggregate::aggregate_counts(occurrences, &self.table)
  }

  pub fn filter<'a>(
    &self,
    occurrences: &'a [LogOccurrence],
    criteria: &FilterCriteria,
  ) -> Vec<&'a LogOccurrence> {
    filter::filter_occurrences(occurrences, criteria, &self.table)
  }

  /// Timelines for module, level and exception, or `None` when no
  /// occurrence carries a timestamp.
  pub fn timelines(&self, occurrences: &[&LogOccurrence]) -> Option<Timelines> {
    let granularity = timeline::granularity_for(occurrences.iter().copied())?;
    let series = |dimension| {
      timeline::top_series(
        timeline::timeline(occurrences, dimension, granularity),
        self.config.max_series(dimension),
      )
    };
    Some(Timelines {
      granularity,
      module: series(Dimension::Module),
      level: series(Dimension::Level),
      exception: series(Dimension::Exception),
    })
  }

  /// Counts over the whole scan, plus the size of a filtered view.
  pub fn summarize(&self, scan: &Scan, filtered: &[&LogOccurrence]) -> ScanSummary {
    let counts = self.aggregate(&scan.occurrences);
    ScanSummary {
      total_lines: scan.total_lines,
      detected: scan.occurrences.len(),
      filtered: filtered.len(),
      traceback_only: scan
        .occurrences
        .iter()
        .filter(|o| o.is_traceback_only())
        .count(),
      categories: counts.visible_categories().cloned().collect(),
      sub_errors: counts
        .sub_errors
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect(),
    }
  }

  /// Leading slice of the raw input, shown when nothing was detected.
  pub fn preview(&self, text: &str) -> String {
    let limit = self.config.preview_chars;
    match text.char_indices().nth(limit) {
      Some((cut, _)) => format!("{}\n...", &text[..cut]),
      None => text.to_string(),
    }
  }
}
