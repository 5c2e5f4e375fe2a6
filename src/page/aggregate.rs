//! Aggregation of raw monitor history into display statistics.
//!
//! Everything here is pure: the raw payload is borrowed and a new aggregated
//! structure is returned, so a payload can never be aggregated twice.

use super::models::*;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Aggregate one monitor's history.
///
/// Records are ordered by timestamp (stable; unparsable timestamps sort
/// before every parsable one), then folded into check-weighted uptime and
/// response time and grouped by region in first-seen order. Records with
/// no region are counted but not grouped.
pub fn aggregate_monitor(raw: &RawMonitor) -> Monitor {
    let records = sort_chronologically(&raw.historical_data);

    let mut total_checks: u64 = 0;
    let mut weighted_response = 0.0;
    let mut weighted_uptime = 0.0;
    let mut last_checked = None;

    let mut by_region: Vec<RegionHistory> = Vec::new();
    let mut region_index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let weight = record.total_checks as f64;
        total_checks = total_checks.saturating_add(record.total_checks);
        weighted_response += sanitize_float(record.avg_response_time_ms) * weight;
        weighted_uptime += sanitize_float(record.uptime_percent) * weight;

        let mut record = record.clone();
        if record.last_checked.as_deref().map_or(true, str::is_empty) {
            record.last_checked = Some(record.timestamp.clone());
        }
        last_checked = record.last_checked.clone();

        if record.region.is_empty() {
            continue;
        }

        match region_index.get(&record.region) {
            Some(&idx) => by_region[idx].records.push(record),
            None => {
                region_index.insert(record.region.clone(), by_region.len());
                by_region.push(RegionHistory {
                    region: record.region.clone(),
                    records: vec![record],
                });
            }
        }
    }

    Monitor {
        id: raw.id,
        name: raw.name.clone(),
        url: raw.url.clone(),
        status: raw.status,
        check_interval: raw.check_interval,
        created_at: raw.created_at.clone(),
        ssl_expiry_date: raw.ssl_expiry_date.clone(),
        uptime_percentage: weighted_mean(weighted_uptime, total_checks),
        avg_response_time_ms: weighted_mean(weighted_response, total_checks),
        total_checks,
        last_checked,
        historical_data_by_region: by_region,
    }
}

/// Aggregate every monitor on a page and compute the overall uptime.
///
/// Overall uptime is the plain mean of each monitor's own uptime, so a
/// monitor with few checks counts as much as one with many. The upstream
/// counters are trusted and passed through.
pub fn aggregate_page(raw: &RawStatusPage) -> StatusPageResponse {
    let monitors: Vec<Monitor> = raw.monitors.iter().map(aggregate_monitor).collect();

    let overall_uptime_percent = if monitors.is_empty() {
        0.0
    } else {
        monitors.iter().map(|m| m.uptime_percentage).sum::<f64>() / monitors.len() as f64
    };

    let stats = &raw.statistics;

    StatusPageResponse {
        name: raw.name.clone(),
        key: raw.key.clone(),
        description: raw.description.clone(),
        updated_at: raw.updated_at.clone(),
        monitors,
        statistics: StatusPageStatistics {
            total_monitors: stats.total_monitors,
            online_monitors: stats.online_monitors,
            offline_monitors: stats.offline_monitors,
            overall_uptime_percent,
            avg_response_time_ms: stats.avg_response_time_ms,
            last_updated: stats.last_updated.clone(),
        },
    }
}

fn sort_chronologically(records: &[HistoricalRecord]) -> Vec<&HistoricalRecord> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &HistoricalRecord)> = records
        .iter()
        .map(|r| (r.parsed_timestamp(), r))
        .collect();

    // `None` orders first; sort_by_key is stable
    keyed.sort_by_key(|(ts, _)| *ts);
    keyed.into_iter().map(|(_, r)| r).collect()
}

fn weighted_mean(sum: f64, total_checks: u64) -> f64 {
    if total_checks == 0 {
        0.0
    } else {
        sanitize_float(sum / total_checks as f64)
    }
}

fn sanitize_float(f: f64) -> f64 {
    if f.is_nan() || f.is_infinite() {
        0.0
    } else {
        f
    }
}
