//! Classification table: category -> sub-error names, plus the reverse index.
//!
//! When a sub-error name is listed under several categories, the category that
//! comes first in definition order owns it. Changing the order of the table
//! changes classification results.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::EngineError;
use crate::types::CategoryDefinition;

#[derive(Debug, Clone)]
pub struct ClassificationTable {
  categories: Vec<CategoryDefinition>,
  /// sub-error name -> index into `categories`.
  index: HashMap<String, usize>,
}

impl ClassificationTable {
  /// Build a table from definitions in priority order.
  pub fn from_definitions(categories: Vec<CategoryDefinition>) -> Self {
    let mut index = HashMap::new();
    for (pos, cat) in categories.iter().enumerate() {
      for sub in &cat.errors {
        index.entry(sub.clone()).or_insert(pos);
      }
    }
    Self { categories, index }
  }

  /// Parse a JSON array of `{key, name, description, errors}` objects.
  pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
    let categories: Vec<CategoryDefinition> = serde_json::from_str(raw)?;
    validate(&categories)?;
    Ok(Self::from_definitions(categories))
  }

  pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json_str(&raw)
  }

  pub fn builtin() -> Self {
    Self::from_definitions(builtin_categories())
  }

  pub fn categories(&self) -> &[CategoryDefinition] {
    &self.categories
  }

  /// Display info for a category key.
  pub fn category(&self, key: &str) -> Option<&CategoryDefinition> {
    self.categories.iter().find(|c| c.key == key)
  }

  /// Owning category key for a sub-error name.
  pub fn category_for(&self, sub_error: &str) -> Option<&str> {
    self
      .index
      .get(sub_error)
      .map(|&pos| self.categories[pos].key.as_str())
  }

  /// Every recognized sub-error name, deduplicated, lexicographic order.
  pub fn all_sub_errors(&self) -> Vec<&str> {
    let set: BTreeSet<&str> = self
      .categories
      .iter()
      .flat_map(|c| c.errors.iter().map(String::as_str))
      .collect();
    set.into_iter().collect()
  }
}

impl Default for ClassificationTable {
  fn default() -> Self {
    Self::builtin()
  }
}

fn validate(categories: &[CategoryDefinition]) -> Result<(), EngineError> {
  if categories.is_empty() {
    return Err(EngineError::table("must define at least one category"));
  }
  let mut seen = BTreeSet::new();
  for cat in categories {
    if cat.key.trim().is_empty() {
      return Err(EngineError::table("category key must not be empty"));
    }
    if !seen.insert(cat.key.as_str()) {
      return Err(EngineError::table(format!("duplicate category key {}", cat.key)));
    }
  }
  Ok(())
}

/// The hand-curated default table.
pub fn builtin_categories() -> Vec<CategoryDefinition> {
  vec![
    CategoryDefinition::new(
      "Type_1_Syntax",
      "Syntax and Parsing Errors",
      "Errors raised while parsing source code, before it runs.",
      &["SyntaxError", "IndentationError", "TabError", "SyntaxWarning"],
    ),
    CategoryDefinition::new(
      "Type_2_Runtime",
      "Runtime and Logical Errors",
      "Errors raised while valid code is running.",
      &[
        "Exception", "BaseException", "AssertionError", "AttributeError", "BufferError",
        "EOFError", "GeneratorExit", "ImportError", "ModuleNotFoundError", "IndexError",
        "KeyError", "KeyboardInterrupt", "MemoryError", "NameError", "NotImplementedError",
        "OSError", "RecursionError", "ReferenceError", "RuntimeError", "StopIteration",
        "StopAsyncIteration", "SyntaxError", "SystemError", "SystemExit", "TypeError",
        "ValueError", "LookupError", "UnboundLocalError", "TimeoutError", "BlockingIOError", "BrokenPipeError",
        "ChildProcessError", "ConnectionError", "PermissionError", "ProcessLookupError",
        "FileNotFoundError", "FileExistsError", "IsADirectoryError", "NotADirectoryError",
        "InterruptedError",
      ],
    ),
    CategoryDefinition::new(
      "Type_3_Import",
      "Import and Module Errors",
      "Errors related to imports and package availability.",
      &["ImportError", "ModuleNotFoundError", "PackageNotFoundError", "ZipImportError"],
    ),
    CategoryDefinition::new(
      "Type_4_IO_OS",
      "I/O and Operating System Errors",
      "File, OS and I/O errors.",
      &[
        "OSError", "IOError", "FileNotFoundError", "PermissionError", "FileExistsError",
        "IsADirectoryError", "NotADirectoryError", "BlockingIOError", "ChildProcessError",
        "BrokenPipeError", "InterruptedError", "ProcessLookupError", "TimeoutError",
        "UnsupportedOperation", "EOFError",
      ],
    ),
    CategoryDefinition::new(
      "Type_5_Network",
      "Network and AsyncIO Errors",
      "Networking, socket and asyncio errors.",
      &[
        "ConnectionError", "ConnectionAbortedError", "ConnectionRefusedError",
        "ConnectionResetError", "socket.gaierror", "socket.herror", "socket.timeout",
        "ssl.SSLError", "asyncio.TimeoutError", "asyncio.CancelledError",
        "asyncio.InvalidStateError", "asyncio.IncompleteReadError", "asyncio.LimitOverrunError",
        "requests.exceptions.RequestException", "requests.exceptions.Timeout",
        "requests.exceptions.ConnectionError", "http.client.HTTPException",
      ],
    ),
    CategoryDefinition::new(
      "Type_6_Concurrency",
      "Threading and Multiprocessing Errors",
      "Errors from threading, multiprocessing and concurrency libraries.",
      &[
        "threading.ThreadError", "concurrent.futures.TimeoutError", "BrokenProcessPool",
        "multiprocessing.ProcessError", "multiprocessing.AuthenticationError",
        "multiprocessing.BufferTooShort", "RuntimeError", "DeadlockError",
      ],
    ),
    CategoryDefinition::new(
      "Type_7_System",
      "System Exit and Signal Errors",
      "Process exit and signals.",
      &["SystemExit", "KeyboardInterrupt", "GeneratorExit"],
    ),
    CategoryDefinition::new(
      "Type_8_Arithmetic",
      "Arithmetic and Numeric Errors",
      "Numeric and math related errors.",
      &[
        "ArithmeticError", "FloatingPointError", "OverflowError", "ZeroDivisionError",
        "numpy.linalg.LinAlgError", "numpy.AxisError", "decimal.InvalidOperation",
      ],
    ),
    CategoryDefinition::new(
      "Type_9_Database",
      "Database and ORM Errors",
      "Database driver and ORM errors.",
      &[
        "DatabaseError", "InterfaceError", "OperationalError", "IntegrityError", "DataError",
        "ProgrammingError", "InternalError", "NotSupportedError", "psycopg2.Error",
        "psycopg2.OperationalError", "psycopg2.IntegrityError", "sqlite3.Error",
        "sqlite3.OperationalError", "pymongo.errors.PyMongoError", "django.db.IntegrityError",
        "django.core.exceptions.ObjectDoesNotExist", "sqlalchemy.exc.IntegrityError",
        "sqlalchemy.exc.OperationalError",
      ],
    ),
    CategoryDefinition::new(
      "Type_10_Serialization",
      "Serialization and Data Parsing Errors",
      "JSON, YAML, XML parsing and serialization errors.",
      &[
        "json.JSONDecodeError", "pickle.PickleError", "pickle.UnpicklingError",
        "pickle.PicklingError", "yaml.YAMLError", "xml.etree.ElementTree.ParseError",
        "csv.Error", "configparser.Error", "msgpack.ExtraData",
      ],
    ),
    CategoryDefinition::new(
      "Type_11_Warnings",
      "Warnings (Non-fatal Issues)",
      "Warning classes (non-fatal).",
      &[
        "Warning", "UserWarning", "DeprecationWarning", "PendingDeprecationWarning",
        "SyntaxWarning", "RuntimeWarning", "FutureWarning", "ImportWarning", "UnicodeWarning",
        "BytesWarning", "ResourceWarning",
      ],
    ),
    CategoryDefinition::new(
      "Type_12_Unicode",
      "Unicode and Encoding Errors",
      "Encoding, decoding and unicode problems.",
      &["UnicodeError", "UnicodeEncodeError", "UnicodeDecodeError", "UnicodeTranslateError"],
    ),
    CategoryDefinition::new(
      "Type_13_Security",
      "Security and Cryptography Errors",
      "TLS, cryptography, JWT and auth errors.",
      &[
        "ssl.SSLError", "cryptography.exceptions.InvalidSignature",
        "cryptography.exceptions.InvalidKey", "jwt.exceptions.ExpiredSignatureError",
        "jwt.exceptions.InvalidTokenError", "PermissionError",
        "paramiko.ssh_exception.SSHException",
      ],
    ),
    CategoryDefinition::new(
      "Type_14_HTTP_API",
      "HTTP and API Client Errors",
      "HTTP client and web framework errors.",
      &[
        "requests.exceptions.Timeout", "requests.exceptions.ConnectionError",
        "requests.exceptions.SSLError", "requests.exceptions.TooManyRedirects",
        "http.client.HTTPException", "starlette.exceptions.HTTPException",
        "fastapi.exceptions.RequestValidationError", "werkzeug.exceptions.BadRequest",
        "werkzeug.exceptions.NotFound", "werkzeug.exceptions.InternalServerError",
        "aiohttp.ClientError", "aiohttp.ClientConnectorError",
      ],
    ),
    CategoryDefinition::new(
      "Type_15_Custom",
      "Custom and Framework-Specific Errors",
      "Application-specific or third-party error classes.",
      &[
        "MyAppError", "CustomError", "ValidationError", "AuthenticationError",
        "AuthorizationError", "RateLimitError", "ServiceUnavailableError", "ThirdPartyAPIError",
        "django.core.exceptions.ValidationError", "flask_restful.errors.BadRequest",
      ],
    ),
    CategoryDefinition::new(
      "Type_99_Others",
      "Other/Additional Exceptions",
      "Miscellaneous builtin and library exceptions.",
      &[
        "BaseException", "Exception", "EnvironmentError", "WindowsError", "ImportWarning",
        "ResourceWarning", "StopIteration", "StopAsyncIteration", "MemoryError", "BufferError",
        "LookupError", "IndexError", "KeyError", "OSError", "ModuleNotFoundError", "ImportError",
        "AttributeError", "NameError", "ReferenceError", "RecursionError", "NotImplementedError",
        "SystemError", "SystemExit", "pandas.errors.EmptyDataError", "pandas.errors.ParserError",
        "numpy.AxisError", "sklearn.exceptions.NotFittedError", "tensorflow.errors.OpError",
        "concurrent.futures.TimeoutError", "asyncio.CancelledError",
      ],
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn shared_name_table() -> ClassificationTable {
    ClassificationTable::from_definitions(vec![
      CategoryDefinition::new("A", "Alpha", "first", &["SharedError", "AlphaError"]),
      CategoryDefinition::new("B", "Beta", "second", &["BetaError", "SharedError"]),
    ])
  }

  #[test]
  fn first_registration_wins() {
    let table = shared_name_table();
    for _ in 0..3 {
      assert_eq!(table.category_for("SharedError"), Some("A"));
    }
    assert_eq!(table.category_for("BetaError"), Some("B"));
    assert_eq!(table.category_for("GammaError"), None);
  }

  #[test]
  fn builtin_owners_follow_definition_order() {
    let table = ClassificationTable::builtin();
    assert_eq!(table.category_for("OSError"), Some("Type_2_Runtime"));
    assert_eq!(table.category_for("SyntaxError"), Some("Type_1_Syntax"));
    assert!(table.category("Type_2_Runtime").unwrap().contains("SyntaxError"));
    assert_eq!(table.category_for("ZeroDivisionError"), Some("Type_8_Arithmetic"));
    assert_eq!(table.category_for("ssl.SSLError"), Some("Type_5_Network"));
    assert_eq!(table.category_for("json.JSONDecodeError"), Some("Type_10_Serialization"));
  }

  #[test]
  fn every_index_entry_points_at_a_real_category() {
    let table = ClassificationTable::builtin();
    for name in table.all_sub_errors() {
      let key = table.category_for(name).unwrap();
      let cat = table.category(key).unwrap();
      assert!(cat.contains(name));
    }
  }

  #[test]
  fn all_sub_errors_sorted_and_deduplicated() {
    let table = shared_name_table();
    assert_eq!(
      table.all_sub_errors(),
      vec!["AlphaError", "BetaError", "SharedError"]
    );

    let builtin = ClassificationTable::builtin();
    let all = builtin.all_sub_errors();
    let mut sorted = all.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(all, sorted);
  }

  #[test]
  fn category_display_info() {
    let table = ClassificationTable::builtin();
    let cat = table.category("Type_12_Unicode").unwrap();
    assert_eq!(cat.name, "Unicode and Encoding Errors");
    assert_eq!(cat.errors.len(), 4);
    assert!(table.category("Type_404").is_none());
  }

  #[test]
  fn loads_table_from_json() {
    let raw = r#"[
      {"key": "net", "name": "Network", "description": "sockets", "errors": ["TimeoutError"]},
      {"key": "io", "name": "I/O", "description": "files", "errors": ["TimeoutError", "OSError"]}
    ]"#;
    let table = ClassificationTable::from_json_str(raw).unwrap();
    assert_eq!(table.categories().len(), 2);
    assert_eq!(table.category_for("TimeoutError"), Some("net"));
    assert_eq!(table.category_for("OSError"), Some("io"));
  }

  #[test]
  fn rejects_duplicate_keys_and_empty_tables() {
    let dup = r#"[
      {"key": "x", "name": "X", "description": "", "errors": []},
      {"key": "x", "name": "Y", "description": "", "errors": []}
    ]"#;
    let err = ClassificationTable::from_json_str(dup).unwrap_err();
    assert!(err.to_string().contains("duplicate"));

    let err = ClassificationTable::from_json_str("[]").unwrap_err();
    assert!(err.to_string().contains("at least one"));

    assert!(ClassificationTable::from_json_str("{not json").is_err());
  }
}
