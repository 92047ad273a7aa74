//! Turn uploaded bytes into log text before extraction.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::error::EngineError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
  /// Reject input that is not valid UTF-8.
  #[default]
  Strict,
  /// Replace invalid sequences with U+FFFD.
  Lossy,
}

/// Decode raw bytes as UTF-8, dropping a leading BOM.
///
/// A decode error reports its offset into the original bytes, BOM included.
pub fn decode_log_bytes(raw: &[u8], policy: DecodePolicy) -> Result<Cow<'_, str>, EngineError> {
  let bytes = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
  let skipped = raw.len() - bytes.len();
  match policy {
    DecodePolicy::Strict => std::str::from_utf8(bytes)
      .map(Cow::Borrowed)
      .map_err(|e| EngineError::Decode {
        offset: skipped + e.valid_up_to(),
      }),
    DecodePolicy::Lossy => Ok(String::from_utf8_lossy(bytes)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strict_accepts_utf8_and_strips_bom() {
    let text = decode_log_bytes(b"\xEF\xBB\xBFhello", DecodePolicy::Strict).unwrap();
    assert_eq!(text, "hello");
  }

  #[test]
  fn strict_reports_offset_of_invalid_byte() {
    let err = decode_log_bytes(b"abc\xFFdef", DecodePolicy::Strict).unwrap_err();
    assert!(matches!(err, EngineError::Decode { offset: 3 }));
    assert!(err.to_string().contains("offset 3"));
  }

  #[test]
  fn offset_counts_the_stripped_bom() {
    let err = decode_log_bytes(b"\xEF\xBB\xBFab\xFF", DecodePolicy::Strict).unwrap_err();
    assert!(matches!(err, EngineError::Decode { offset: 5 }));
  }

  #[test]
  fn lossy_replaces_invalid_bytes() {
    let text = decode_log_bytes(b"abc\xFFdef", DecodePolicy::Lossy).unwrap();
    assert_eq!(text, "abc\u{FFFD}def");
  }
}
