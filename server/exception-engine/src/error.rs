//! Structured error types for the exception engine.
//!
//! Extraction itself is total over text; these cover the edges around it
//! (decoding input bytes, loading a table file, writing exports).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("decode: input is not valid UTF-8 (first invalid byte at offset {offset})")]
  Decode { offset: usize },

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("table: {0}")]
  Table(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("csv: {0}")]
  Csv(#[from] csv::Error),
}

impl EngineError {
  pub fn table(msg: impl Into<String>) -> Self {
    Self::Table(msg.into())
  }
}
