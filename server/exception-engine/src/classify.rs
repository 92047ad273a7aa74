//! Line classifier: header lines, traceback starts, exception lines.
//!
//! These are heuristics over text, not a grammar. They are tuned for the
//! Python `logging` default format and Python tracebacks, and accept false
//! positives in exchange for tolerating heterogeneous log formats.

use regex::Regex;
use std::sync::LazyLock;

pub const TRACEBACK_MARKER: &str = "Traceback (most recent call last):";

#[allow(clippy::expect_used)]
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(?P<ts>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2},\d{3})\s*-\s*(?P<module>[^-]+?)\s*-\s*(?P<level>[A-Z]+)\s*-\s*(?P<message>.*)$",
  )
  .expect("valid regex")
});

#[allow(clippy::expect_used)]
static EXCEPTION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^\s*(?P<exc>[A-Za-z_][\w.:<>-]*?(?:Error|Exception|Warning|Exit|Interrupt)?)\s*:\s*(?P<msg>.*)$",
  )
  .expect("valid regex")
});

#[allow(clippy::expect_used)]
static INLINE_EXCEPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"(?P<exc>[A-Za-z_][\w.:<>-]*?(?:Error|Exception|Warning|Exit|Interrupt)?)\s*[-:]\s*(?P<msg>.+)$",
  )
  .expect("valid regex")
});

/// Fields of a `TIMESTAMP - MODULE - LEVEL - MESSAGE` line, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine<'a> {
  pub timestamp: &'a str,
  pub module: &'a str,
  pub level: &'a str,
  pub message: &'a str,
}

/// An exception name with the text after its separator (trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionMatch {
  pub name: String,
  pub message: String,
}

pub fn parse_header(line: &str) -> Option<HeaderLine<'_>> {
  let caps = HEADER_RE.captures(line)?;
  Some(HeaderLine {
    timestamp: caps.name("ts")?.as_str(),
    module: caps.name("module")?.as_str().trim(),
    level: caps.name("level")?.as_str().trim(),
    message: caps.name("message")?.as_str().trim(),
  })
}

/// The marker may be indented and may carry trailing text.
pub fn is_traceback_start(line: &str) -> bool {
  line.trim_start().starts_with(TRACEBACK_MARKER)
}

/// Anchored match: the whole (trimmed) line must be `Name: message`.
/// This is the form of the last line of a traceback.
pub fn match_exception_line(line: &str) -> Option<ExceptionMatch> {
  EXCEPTION_LINE_RE
    .captures(line.trim())
    .and_then(|caps| exception_from(&caps))
}

/// Search-anywhere match: finds `Name: message` or `Name - message` inside
/// arbitrary text, e.g. appended after an ordinary log message.
pub fn find_inline_exception(text: &str) -> Option<ExceptionMatch> {
  INLINE_EXCEPTION_RE
    .captures(text)
    .and_then(|caps| exception_from(&caps))
}

fn exception_from(caps: &regex::Captures<'_>) -> Option<ExceptionMatch> {
  Some(ExceptionMatch {
    name: caps.name("exc")?.as_str().to_string(),
    message: caps.name("msg")?.as_str().trim().to_string(),
  })
}
