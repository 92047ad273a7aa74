//! Engine configuration with sane defaults.

use std::path::PathBuf;

use crate::decode::DecodePolicy;
use crate::types::Dimension;

#[derive(Debug, Clone)]
pub struct Config {
  /// How invalid UTF-8 in the input is handled.
  pub decode_policy: DecodePolicy,
  /// JSON classification table replacing the built-in one.
  pub table_path: Option<PathBuf>,
  /// Max series kept per timeline dimension.
  pub max_module_series: usize,
  pub max_level_series: usize,
  pub max_exception_series: usize,
  /// Characters of raw input echoed when nothing was detected.
  pub preview_chars: usize,
}

impl Config {
  pub fn max_series(&self, dimension: Dimension) -> usize {
    match dimension {
      Dimension::Module => self.max_module_series,
      Dimension::Level => self.max_level_series,
      Dimension::Exception => self.max_exception_series,
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      decode_policy: DecodePolicy::Strict,
      table_path: None,
      max_module_series: 6,
      max_level_series: 6,
      max_exception_series: 12,
      preview_chars: 800,
    }
  }
}
