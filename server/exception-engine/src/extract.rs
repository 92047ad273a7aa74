//! Extraction engine: one forward pass over the log lines, assembling header
//! lines and traceback blocks into occurrence records.
//!
//! Three entry shapes are recognized:
//! - a header line, optionally followed by a traceback block or by a bare
//!   `Name: message` line;
//! - a traceback block with no header in front of it (orphaned);
//! - anything else, which is skipped.
//!
//! The cursor advances on every iteration, so the scan is linear and total.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::classify::{self, ExceptionMatch, HeaderLine};
use crate::taxonomy::ClassificationTable;
use crate::types::{LogOccurrence, TRACEBACK_ONLY_LEVEL, TRACEBACK_ONLY_MESSAGE};

/// Extract every occurrence from `text`, in source order.
pub fn extract_occurrences(text: &str, table: &ClassificationTable) -> Vec<LogOccurrence> {
  let lines = split_lines(text);
  let mut occurrences = Vec::new();
  let mut i = 0;

  while i < lines.len() {
    if let Some(header) = classify::parse_header(lines[i]) {
      let (occurrence, next) = from_header(&lines, i, &header, table);
      occurrences.push(occurrence);
      i = next;
    } else if classify::is_traceback_start(lines[i]) {
      let (occurrence, next) = from_orphaned_traceback(&lines, i, table);
      occurrences.push(occurrence);
      i = next;
    } else {
      i += 1;
    }
  }

  occurrences
}

/// Split on every line boundary a log file may use: `\n`, `\r\n`, a bare
/// `\r`, vertical tab, form feed, the file/group/record separators, NEL and
/// the Unicode line and paragraph separators. A final terminator does not
/// start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
  let mut lines = Vec::new();
  let mut start = 0;
  let mut chars = text.char_indices().peekable();

  while let Some((idx, c)) = chars.next() {
    if !is_line_break(c) {
      continue;
    }
    lines.push(&text[start..idx]);
    start = idx + c.len_utf8();
    if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
      start += 1;
    }
  }

  if start < text.len() {
    lines.push(&text[start..]);
  }
  lines
}

fn is_line_break(c: char) -> bool {
  matches!(
    c,
    '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
  )
}

/// Parse `YYYY-MM-DD HH:MM:SS,mmm` (a `.` separator is accepted too).
///
/// Naive wall-clock time; no timezone is inferred.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let normalized = raw.trim().replacen(',', ".", 1);
  NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f").ok()
}

/// Lines consumed from a traceback start up to (and including) the first
/// exception line, or to end of input.
struct TracebackBlock {
  text: String,
  exception: Option<ExceptionMatch>,
  /// Index of the first line after the block.
  end: usize,
}

fn consume_traceback(lines: &[&str], start: usize) -> TracebackBlock {
  let mut buffered = Vec::new();
  let mut exception = None;
  let mut end = lines.len();

  for (offset, line) in lines[start..].iter().enumerate() {
    buffered.push(*line);
    if let Some(m) = classify::match_exception_line(line) {
      exception = Some(m);
      end = start + offset + 1;
      break;
    }
  }

  if exception.is_none() {
    debug!(start, lines = buffered.len(), "traceback block ran to end of input");
  }

  TracebackBlock {
    text: buffered.join("\n"),
    exception,
    end,
  }
}

fn from_header(
  lines: &[&str],
  i: usize,
  header: &HeaderLine<'_>,
  table: &ClassificationTable,
) -> (LogOccurrence, usize) {
  let timestamp = parse_timestamp(header.timestamp);
  if timestamp.is_none() {
    debug!(line = i, raw = header.timestamp, "unparsable timestamp");
  }

  let mut exception = classify::find_inline_exception(header.message);
  let mut raw_traceback = String::new();
  let mut next = i + 1;

  if lines.get(i + 1).is_some_and(|l| classify::is_traceback_start(l)) {
    let block = consume_traceback(lines, i + 1);
    if block.exception.is_some() {
      exception = block.exception;
    }
    raw_traceback = block.text;
    next = block.end;
  }

  // A message that is itself `Name:` with nothing after the colon.
  if exception.is_none() {
    exception = classify::match_exception_line(header.message);
  }

  // A bare exception line directly under the header, with no traceback.
  if exception.is_none() && raw_traceback.is_empty() {
    if let Some(m) = lines.get(i + 1).and_then(|l| trailing_exception(l)) {
      debug!(line = i + 1, name = %m.name, "absorbed trailing exception line");
      exception = Some(m);
      next = i + 2;
    }
  }

  let (exception_name, exception_message) = split_exception(exception);
  let category_key = resolve_category(exception_name.as_deref(), table);

  let occurrence = LogOccurrence {
    line: i,
    timestamp_raw: timestamp.map(|_| header.timestamp.to_string()),
    timestamp,
    module: Some(header.module)
      .filter(|m| !m.is_empty())
      .map(str::to_string),
    level: header.level.to_string(),
    message: header.message.to_string(),
    exception_name,
    exception_message,
    category_key,
    raw_traceback,
  };
  (occurrence, next)
}

fn trailing_exception(line: &str) -> Option<ExceptionMatch> {
  if classify::parse_header(line).is_some() || classify::is_traceback_start(line) {
    return None;
  }
  classify::match_exception_line(line)
}

fn from_orphaned_traceback(
  lines: &[&str],
  i: usize,
  table: &ClassificationTable,
) -> (LogOccurrence, usize) {
  debug!(line = i, "traceback without a header line");
  let block = consume_traceback(lines, i);
  let (exception_name, exception_message) = split_exception(block.exception);
  let category_key = resolve_category(exception_name.as_deref(), table);

  let occurrence = LogOccurrence {
    line: i,
    timestamp: None,
    timestamp_raw: None,
    module: None,
    level: TRACEBACK_ONLY_LEVEL.to_string(),
    message: TRACEBACK_ONLY_MESSAGE.to_string(),
    exception_name,
    exception_message,
    category_key,
    raw_traceback: block.text,
  };
  (occurrence, block.end)
}

fn split_exception(exception: Option<ExceptionMatch>) -> (Option<String>, String) {
  match exception {
    Some(m) => (Some(m.name), m.message),
    None => (None, String::new()),
  }
}

fn resolve_category(name: Option<&str>, table: &ClassificationTable) -> Option<String> {
  name
    .and_then(|n| table.category_for(n))
    .map(str::to_string)
}
