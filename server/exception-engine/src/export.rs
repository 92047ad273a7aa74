//! CSV and JSON export of occurrence records.

use std::io::Write;

use crate::aggregate::category_label;
use crate::error::EngineError;
use crate::taxonomy::ClassificationTable;
use crate::types::{ExportRecord, LogOccurrence};

impl ExportRecord {
  pub fn from_occurrence(occ: &LogOccurrence, table: &ClassificationTable) -> Self {
    Self {
      timestamp: occ
        .timestamp
        .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
        .unwrap_or_default(),
      module: occ.module.clone(),
      level: occ.level.clone(),
      exception: occ.exception_name.clone(),
      exception_message: occ.exception_message.clone(),
      category: category_label(occ, table).map(str::to_string),
      traceback: occ.raw_traceback.clone(),
    }
  }
}

pub fn to_records(occurrences: &[&LogOccurrence], table: &ClassificationTable) -> Vec<ExportRecord> {
  occurrences
    .iter()
    .map(|occ| ExportRecord::from_occurrence(occ, table))
    .collect()
}

/// Header row (the record's field names) plus one row per record; absent
/// values become empty strings.
pub fn write_csv<W: Write>(writer: W, records: &[ExportRecord]) -> Result<(), EngineError> {
  let mut wtr = csv::Writer::from_writer(writer);
  for r in records {
    wtr.serialize(r)?;
  }

  wtr.flush()?;
  Ok(())
}

/// A JSON array of record objects; absent values become `null`.
pub fn write_json<W: Write>(writer: W, records: &[ExportRecord]) -> Result<(), EngineError> {
  serde_json::to_writer(writer, records)?;
  Ok(())
}
