//! Binary entrypoint: read log text from a file or stdin, write records to stdout.
//!
//! Output depends on `--format`:
//! - `jsonl` (default): one occurrence per line
//! - `json` / `csv`: export records
//! - `summary`: counts for the scan and the filtered view
//! - `timeline`: top series per module / level / exception
//!
//! Fatal errors (decode, I/O, table file) are written to stdout as an
//! ErrorOutput line and the process exits with status 1.

use clap::{Parser, ValueEnum};
use exception_engine::types::{ErrorOutput, LogOccurrence};
use exception_engine::{export, Config, DecodePolicy, Engine, EngineError, FilterCriteria};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
  Jsonl,
  Json,
  Csv,
  Summary,
  Timeline,
}

#[derive(Parser)]
#[command(name = "exception-engine")]
#[command(version, about = "Extract and classify exception occurrences from log text")]
struct Cli {
  /// Log file to read (stdin when omitted)
  input: Option<PathBuf>,

  /// Output format
  #[clap(short, long, value_enum, default_value_t = Format::Jsonl)]
  format: Format,

  /// Replace invalid UTF-8 instead of failing
  #[clap(long, default_value_t = false)]
  lossy: bool,

  /// JSON classification table to use instead of the built-in one
  #[clap(long)]
  table: Option<PathBuf>,

  /// Keep only occurrences listed under this category key
  #[clap(long)]
  category: Option<String>,

  /// Keep only these sub-error names (repeatable)
  #[clap(long = "sub-error")]
  sub_errors: Vec<String>,

  /// Case-insensitive search over exception, messages and module
  #[clap(long)]
  search: Option<String>,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  if let Err(e) = run_binary(cli) {
    let mut out = io::stdout().lock();
    let _ = serde_json::to_writer(&mut out, &ErrorOutput::new(e.to_string()));
    let _ = writeln!(out);
    let _ = writeln!(io::stderr(), "exception-engine: {}", e);
    std::process::exit(1);
  }
}

fn run_binary(cli: Cli) -> Result<(), EngineError> {
  let config = Config {
    decode_policy: if cli.lossy {
      DecodePolicy::Lossy
    } else {
      DecodePolicy::Strict
    },
    table_path: cli.table.clone(),
    ..Config::default()
  };
  let engine = Engine::new(config)?;

  let raw = read_input(cli.input.as_ref())?;
  let text = engine.decode(&raw)?;
  let scan = engine.scan(&text);
  info!(lines = scan.total_lines, detected = scan.occurrences.len(), "parsed input");

  if scan.occurrences.is_empty() {
    warn!("no exception-like entries detected");
    let _ = writeln!(io::stderr(), "{}", engine.preview(&text));
  }

  let criteria = FilterCriteria {
    category_key: cli.category,
    sub_errors: cli.sub_errors,
    search: cli.search,
  };
  let filtered = engine.filter(&scan.occurrences, &criteria);

  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  match cli.format {
    Format::Jsonl => write_jsonl(&mut out, &filtered)?,
    Format::Json => export::write_json(&mut out, &export::to_records(&filtered, engine.table()))?,
    Format::Csv => export::write_csv(&mut out, &export::to_records(&filtered, engine.table()))?,
    Format::Summary => serde_json::to_writer(&mut out, &engine.summarize(&scan, &filtered))?,
    Format::Timeline => match engine.timelines(&filtered) {
      Some(timelines) => serde_json::to_writer(&mut out, &timelines)?,
      None => {
        warn!("no timestamped entries in the current filter");
        serde_json::to_writer(&mut out, &serde_json::Value::Null)?;
      }
    },
  }
  if !matches!(cli.format, Format::Jsonl | Format::Csv) {
    writeln!(out)?;
  }
  out.flush()?;
  Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>, EngineError> {
  match path {
    Some(p) => Ok(std::fs::read(p)?),
    None => {
      let mut raw = Vec::new();
      io::stdin().lock().read_to_end(&mut raw)?;
      Ok(raw)
    }
  }
}

fn write_jsonl<W: Write>(out: &mut W, occurrences: &[&LogOccurrence]) -> Result<(), EngineError> {
  for occ in occurrences {
    serde_json::to_writer(&mut *out, occ)?;
    writeln!(out)?;
  }
  Ok(())
}
