//! Occurrence aggregation: zero-filled counts and category display labels.

use std::collections::{BTreeMap, HashMap};

use crate::taxonomy::ClassificationTable;
use crate::types::{AggregatedCounts, CategoryTotal, LogOccurrence, UNKNOWN_CATEGORY_LABEL};

/// Count occurrences per known sub-error (zero-filled) and per category.
///
/// A category total sums the counts of every name in its member list, so a
/// name listed under two categories contributes to both totals.
pub fn aggregate_counts(occurrences: &[LogOccurrence], table: &ClassificationTable) -> AggregatedCounts {
  let mut observed: HashMap<&str, u64> = HashMap::new();
  for occ in occurrences {
    if let Some(name) = occ.exception_name.as_deref() {
      *observed.entry(name).or_insert(0) += 1;
    }
  }

  let sub_errors: BTreeMap<String, u64> = table
    .all_sub_errors()
    .into_iter()
    .map(|name| (name.to_string(), observed.get(name).copied().unwrap_or(0)))
    .collect();

  let categories = table
    .categories()
    .iter()
    .map(|cat| CategoryTotal {
      key: cat.key.clone(),
      name: cat.name.clone(),
      total: cat
        .errors
        .iter()
        .map(|e| sub_errors.get(e).copied().unwrap_or(0))
        .sum(),
    })
    .collect();

  AggregatedCounts {
    sub_errors,
    categories,
  }
}

impl AggregatedCounts {
  pub fn sub_error_count(&self, name: &str) -> u64 {
    self.sub_errors.get(name).copied().unwrap_or(0)
  }

  pub fn category_total(&self, key: &str) -> Option<u64> {
    self.categories.iter().find(|c| c.key == key).map(|c| c.total)
  }

  /// Categories with at least one occurrence, in definition order.
  pub fn visible_categories(&self) -> impl Iterator<Item = &CategoryTotal> {
    self.categories.iter().filter(|c| c.total > 0)
  }

  /// Members of `category_key` with at least one occurrence, in member order.
  pub fn visible_sub_errors<'a>(
    &'a self,
    category_key: &str,
    table: &'a ClassificationTable,
  ) -> Vec<(&'a str, u64)> {
    table
      .category(category_key)
      .map(|cat| {
        cat
          .errors
          .iter()
          .map(|e| (e.as_str(), self.sub_error_count(e)))
          .filter(|(_, count)| *count > 0)
          .collect()
      })
      .unwrap_or_default()
  }
}

/// Category label shown next to an occurrence.
///
/// Known category -> its display name; exception name with no category ->
/// `"Unknown"`; no exception name -> `None`.
pub fn category_label<'a>(occurrence: &LogOccurrence, table: &'a ClassificationTable) -> Option<&'a str> {
  let name = occurrence.exception_name.as_deref()?;
  let label = occurrence
    .category_key
    .as_deref()
    .or_else(|| table.category_for(name))
    .and_then(|key| table.category(key))
    .map(|cat| cat.name.as_str())
    .unwrap_or(UNKNOWN_CATEGORY_LABEL);
  Some(label)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::CategoryDefinition;

  fn occurrence(exception: Option<&str>, category: Option<&str>) -> LogOccurrence {
    LogOccurrence {
      line: 0,
      timestamp: None,
      timestamp_raw: None,
      module: Some("app".into()),
      level: "ERROR".into(),
      message: "boom".into(),
      exception_name: exception.map(Into::into),
      exception_message: String::new(),
      category_key: category.map(Into::into),
      raw_traceback: String::new(),
    }
  }

  fn small_table() -> ClassificationTable {
    ClassificationTable::from_definitions(vec![
      CategoryDefinition::new("io", "I/O", "files", &["OSError", "EOFError"]),
      CategoryDefinition::new("rt", "Runtime", "runtime", &["OSError", "KeyError", "ValueError"]),
    ])
  }

  #[test]
  fn counts_are_zero_filled_for_every_known_name() {
    let table = ClassificationTable::builtin();
    let counts = aggregate_counts(&[], &table);
    assert_eq!(counts.sub_errors.len(), table.all_sub_errors().len());
    assert!(counts.sub_errors.values().all(|&c| c == 0));
    for cat in table.categories() {
      for name in &cat.errors {
        assert!(counts.sub_errors.contains_key(name));
      }
      assert_eq!(counts.category_total(&cat.key), Some(0));
    }
  }

  #[test]
  fn shared_names_count_toward_each_listing_category() {
    let table = small_table();
    let occs = vec![
      occurrence(Some("OSError"), Some("io")),
      occurrence(Some("OSError"), Some("io")),
      occurrence(Some("KeyError"), Some("rt")),
      occurrence(Some("NotInTableError"), None),
      occurrence(None, None),
    ];
    let counts = aggregate_counts(&occs, &table);
    assert_eq!(counts.sub_error_count("OSError"), 2);
    assert_eq!(counts.sub_error_count("EOFError"), 0);
    assert_eq!(counts.sub_error_count("NotInTableError"), 0);
    assert_eq!(counts.category_total("io"), Some(2));
    assert_eq!(counts.category_total("rt"), Some(3));
    assert_eq!(counts.category_total("nope"), None);
  }

  #[test]
  fn visible_views_hide_zero_counts() {
    let table = small_table();
    let occs = vec![occurrence(Some("ValueError"), Some("rt"))];
    let counts = aggregate_counts(&occs, &table);
    let visible: Vec<&str> = counts.visible_categories().map(|c| c.key.as_str()).collect();
    assert_eq!(visible, vec!["rt"]);
    assert_eq!(counts.visible_sub_errors("rt", &table), vec![("ValueError", 1)]);
    assert!(counts.visible_sub_errors("io", &table).is_empty());
    assert!(counts.visible_sub_errors("missing", &table).is_empty());
  }

  #[test]
  fn labels_cover_known_unknown_and_absent() {
    let table = small_table();
    assert_eq!(category_label(&occurrence(Some("EOFError"), Some("io")), &table), Some("I/O"));
    assert_eq!(
      category_label(&occurrence(Some("MadeUpError"), None), &table),
      Some(UNKNOWN_CATEGORY_LABEL)
    );
    assert_eq!(category_label(&occurrence(None, None), &table), None);
  }
}
