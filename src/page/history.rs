//! Time range helpers for a region's history bar.

use super::models::HistoricalRecord;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Number of buckets shown per region.
pub const RECENT_BUCKETS: usize = 30;

/// Display granularity for a history bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Minutes,
    Hours,
    Days,
}

impl Granularity {
    pub fn for_records(records: &[HistoricalRecord]) -> Self {
        if records.len() < 2 {
            return Granularity::Minutes;
        }

        match history_span(records) {
            Some((min, max)) if min != max => Self::for_span(max - min),
            _ => Granularity::Minutes,
        }
    }

    fn for_span(span: ChronoDuration) -> Self {
        if span <= ChronoDuration::hours(6) {
            Granularity::Minutes
        } else if span <= ChronoDuration::days(3) {
            Granularity::Hours
        } else {
            Granularity::Days
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Minutes => "in minutes",
            Granularity::Hours => "in hours",
            Granularity::Days => "in days",
        }
    }
}

/// Earliest and latest parsable timestamps. Unparsable ones are ignored.
pub fn history_span(records: &[HistoricalRecord]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    records
        .iter()
        .filter_map(|r| r.parsed_timestamp())
        .fold(None, |acc, ts| match acc {
            None => Some((ts, ts)),
            Some((min, max)) => Some((min.min(ts), max.max(ts))),
        })
}

/// Human readable label for the time covered by `records`,
/// e.g. "120 minutes uptime history" or "7 days uptime history".
pub fn range_label(records: &[HistoricalRecord]) -> String {
    if records.is_empty() {
        return "uptime history".to_string();
    }

    let span = match history_span(records) {
        Some((min, max)) if min != max => max - min,
        _ => return "1 minute uptime history".to_string(),
    };

    let millis = span.num_milliseconds() as f64;
    match Granularity::for_span(span) {
        Granularity::Minutes => {
            let mins = rounded_units(millis, 60_000.0);
            let plural = if mins == 1 { "" } else { "s" };
            format!("{} minute{} uptime history", mins, plural)
        }
        Granularity::Hours => format!("{} hrs uptime history", rounded_units(millis, 3_600_000.0)),
        Granularity::Days => format!("{} days uptime history", rounded_units(millis, 86_400_000.0)),
    }
}

/// The trailing `n` buckets.
pub fn recent(records: &[HistoricalRecord], n: usize) -> &[HistoricalRecord] {
    &records[records.len().saturating_sub(n)..]
}

fn rounded_units(millis: f64, unit: f64) -> i64 {
    ((millis / unit).round() as i64).max(1)
}
