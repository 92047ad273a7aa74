//! Timeline bucketing: counts per (time bucket, key) for one dimension.

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use std::collections::{BTreeMap, HashMap};

use crate::types::{Dimension, Granularity, LogOccurrence, TimelinePoint};

/// Pick the bucket size from the span of the timestamped occurrences:
/// up to 6 hours -> minute, up to 10 days -> hour, otherwise day.
pub fn granularity_for<'a, I>(occurrences: I) -> Option<Granularity>
where
  I: IntoIterator<Item = &'a LogOccurrence>,
{
  let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;
  for ts in occurrences.into_iter().filter_map(|o| o.timestamp) {
    bounds = Some(match bounds {
      Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
      None => (ts, ts),
    });
  }
  let (lo, hi) = bounds?;
  let span = hi - lo;
  Some(if span <= TimeDelta::hours(6) {
    Granularity::Minute
  } else if span <= TimeDelta::days(10) {
    Granularity::Hour
  } else {
    Granularity::Day
  })
}

/// Floor a timestamp to the start of its bucket.
pub fn bucket_start(ts: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
  let (hour, minute) = match granularity {
    Granularity::Minute => (ts.hour(), ts.minute()),
    Granularity::Hour => (ts.hour(), 0),
    Granularity::Day => (0, 0),
  };
  ts.date().and_hms_opt(hour, minute, 0).unwrap_or(ts)
}

fn dimension_key(occ: &LogOccurrence, dimension: Dimension) -> Option<&str> {
  match dimension {
    Dimension::Module => occ.module.as_deref(),
    Dimension::Level => Some(occ.level.as_str()),
    Dimension::Exception => occ.exception_name.as_deref(),
  }
}

/// Count occurrences per (bucket, key), sorted by bucket then key.
///
/// Occurrences without a timestamp, or without a value for `dimension`,
/// are left out.
pub fn timeline(
  occurrences: &[&LogOccurrence],
  dimension: Dimension,
  granularity: Granularity,
) -> Vec<TimelinePoint> {
  let mut counts: BTreeMap<(NaiveDateTime, &str), u64> = BTreeMap::new();
  for occ in occurrences {
    let (Some(ts), Some(key)) = (occ.timestamp, dimension_key(occ, dimension)) else {
      continue;
    };
    *counts.entry((bucket_start(ts, granularity), key)).or_insert(0) += 1;
  }

  counts
    .into_iter()
    .map(|((bucket, key), count)| TimelinePoint {
      bucket,
      key: key.to_string(),
      count,
    })
    .collect()
}

/// Keep the points of the `max` keys with the highest total count
/// (ties broken by key).
pub fn top_series(points: Vec<TimelinePoint>, max: usize) -> Vec<TimelinePoint> {
  let mut totals: HashMap<&str, u64> = HashMap::new();
  for p in &points {
    *totals.entry(p.key.as_str()).or_insert(0) += p.count;
  }
  if totals.len() <= max {
    return points;
  }

  let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
  let keep: Vec<String> = ranked.into_iter().take(max).map(|(k, _)| k.to_string()).collect();

  points.into_iter().filter(|p| keep.contains(&p.key)).collect()
}
