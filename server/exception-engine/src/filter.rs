//! Pure occurrence filtering by category, sub-errors and free-text search.

use crate::taxonomy::ClassificationTable;
use crate::types::LogOccurrence;

#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
  pub category_key: Option<String>,
  /// Explicit sub-error names. Takes precedence over the category's member list.
  pub sub_errors: Vec<String>,
  /// Case-insensitive substring over exception, exception message, message and module.
  pub search: Option<String>,
}

impl FilterCriteria {
  pub fn is_empty(&self) -> bool {
    self.category_key.is_none()
      && self.sub_errors.is_empty()
      && self.search.as_deref().map_or(true, |s| s.trim().is_empty())
  }
}

/// Return the occurrences matching `criteria`, preserving input order.
pub fn filter_occurrences<'a>(
  occurrences: &'a [LogOccurrence],
  criteria: &FilterCriteria,
  table: &ClassificationTable,
) -> Vec<&'a LogOccurrence> {
  let allowed: Option<Vec<&str>> = if !criteria.sub_errors.is_empty() {
    Some(criteria.sub_errors.iter().map(String::as_str).collect())
  } else {
    criteria.category_key.as_deref().map(|key| {
      table
        .category(key)
        .map(|cat| cat.errors.iter().map(String::as_str).collect())
        .unwrap_or_default()
    })
  };

  let query = criteria
    .search
    .as_deref()
    .map(|s| s.trim().to_lowercase())
    .filter(|s| !s.is_empty());

  occurrences
    .iter()
    .filter(|occ| match &allowed {
      Some(names) => occ
        .exception_name
        .as_deref()
        .is_some_and(|name| names.contains(&name)),
      None => true,
    })
    .filter(|occ| match &query {
      Some(q) => matches_search(occ, q),
      None => true,
    })
    .collect()
}

fn matches_search(occ: &LogOccurrence, query: &str) -> bool {
  [
    occ.exception_name.as_deref(),
    Some(occ.exception_message.as_str()),
    Some(occ.message.as_str()),
    occ.module.as_deref(),
  ]
  .into_iter()
  .flatten()
  .any(|field| field.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::CategoryDefinition;

  fn occurrence(module: &str, exception: Option<&str>, message: &str) -> LogOccurrence {
    LogOccurrence {
      line: 0,
      timestamp: None,
      timestamp_raw: None,
      module: Some(module.into()),
      level: "ERROR".into(),
      message: message.into(),
      exception_name: exception.map(Into::into),
      exception_message: String::new(),
      category_key: None,
      raw_traceback: String::new(),
    }
  }

  fn table() -> ClassificationTable {
    ClassificationTable::from_definitions(vec![
      CategoryDefinition::new("io", "I/O", "", &["OSError", "EOFError"]),
      CategoryDefinition::new("rt", "Runtime", "", &["OSError", "KeyError"]),
    ])
  }

  fn sample() -> Vec<LogOccurrence> {
    vec![
      occurrence("db", Some("OSError"), "disk full"),
      occurrence("api", Some("KeyError"), "lookup failed"),
      occurrence("api", None, "Payment declined"),
      occurrence("worker", Some("EOFError"), "stream closed"),
    ]
  }

  #[test]
  fn empty_criteria_keeps_everything() {
    let occs = sample();
    let criteria = FilterCriteria::default();
    assert!(criteria.is_empty());
    assert_eq!(filter_occurrences(&occs, &criteria, &table()).len(), 4);
  }

  #[test]
  fn category_uses_member_list_not_owner() {
    let occs = sample();
    let criteria = FilterCriteria {
      category_key: Some("rt".into()),
      ..Default::default()
    };
    let out = filter_occurrences(&occs, &criteria, &table());
    let names: Vec<_> = out.iter().map(|o| o.exception_name.as_deref().unwrap()).collect();
    assert_eq!(names, vec!["OSError", "KeyError"]);
  }

  #[test]
  fn sub_errors_narrow_the_category() {
    let occs = sample();
    let criteria = FilterCriteria {
      category_key: Some("io".into()),
      sub_errors: vec!["EOFError".into()],
      search: None,
    };
    let out = filter_occurrences(&occs, &criteria, &table());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].module.as_deref(), Some("worker"));
  }

  #[test]
  fn unknown_category_matches_nothing() {
    let occs = sample();
    let criteria = FilterCriteria {
      category_key: Some("nope".into()),
      ..Default::default()
    };
    assert!(filter_occurrences(&occs, &criteria, &table()).is_empty());
  }

  #[test]
  fn search_is_trimmed_and_case_insensitive() {
    let occs = sample();
    let criteria = FilterCriteria {
      search: Some("  PAYMENT ".into()),
      ..Default::default()
    };
    let out = filter_occurrences(&occs, &criteria, &table());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].message, "Payment declined");

    let by_module = FilterCriteria {
      search: Some("api".into()),
      ..Default::default()
    };
    assert_eq!(filter_occurrences(&occs, &by_module, &table()).len(), 2);
  }

  #[test]
  fn search_combines_with_category() {
    let occs = sample();
    let criteria = FilterCriteria {
      category_key: Some("rt".into()),
      sub_errors: vec![],
      search: Some("disk".into()),
    };
    let out = filter_occurrences(&occs, &criteria, &table());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].exception_name.as_deref(), Some("OSError"));
  }
}
