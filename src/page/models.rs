//! Status page model types.
//!
//! `Raw*` types mirror the payload served by the status API. The aggregated
//! types are what the rest of the service renders.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reported state of a single monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorStatus {
    Online,
    Offline,
}

impl MonitorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MonitorStatus::Online => "Online",
            MonitorStatus::Offline => "Offline",
        }
    }
}

/// How often a monitor is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckInterval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "10min")]
    TenMinutes,
    #[serde(rename = "20min")]
    TwentyMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "1hr")]
    OneHour,
}

impl CheckInterval {
    /// Wire form, also used for display.
    pub fn label(&self) -> &'static str {
        match self {
            CheckInterval::OneMinute => "1min",
            CheckInterval::FiveMinutes => "5min",
            CheckInterval::TenMinutes => "10min",
            CheckInterval::TwentyMinutes => "20min",
            CheckInterval::ThirtyMinutes => "30min",
            CheckInterval::OneHour => "1hr",
        }
    }

    pub fn duration(&self) -> Duration {
        let minutes = match self {
            CheckInterval::OneMinute => 1,
            CheckInterval::FiveMinutes => 5,
            CheckInterval::TenMinutes => 10,
            CheckInterval::TwentyMinutes => 20,
            CheckInterval::ThirtyMinutes => 30,
            CheckInterval::OneHour => 60,
        };
        Duration::from_secs(minutes * 60)
    }
}

/// One bucket of checks for a monitor in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_checks: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub successful_checks: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uptime_percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_response_time_ms: f64,
    #[serde(default)]
    pub last_checked: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
}

impl HistoricalRecord {
    /// Parsed `timestamp`, `None` if upstream sent something unreadable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Records for one region, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionHistory {
    pub region: String,
    pub records: Vec<HistoricalRecord>,
}

/// A monitor as served by the status API, before aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMonitor {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub status: MonitorStatus,
    pub check_interval: CheckInterval,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub ssl_expiry_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub historical_data: Vec<HistoricalRecord>,
}

/// A monitor with its history folded into statistics and grouped by region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub status: MonitorStatus,
    pub check_interval: CheckInterval,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_expiry_date: Option<String>,
    pub uptime_percentage: f64,
    pub avg_response_time_ms: f64,
    pub total_checks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
    pub historical_data_by_region: Vec<RegionHistory>,
}

/// Page level counters as served by the status API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatistics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_monitors: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub online_monitors: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offline_monitors: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_response_time_ms: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
}

/// Page level rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPageStatistics {
    pub total_monitors: u32,
    pub online_monitors: u32,
    pub offline_monitors: u32,
    pub overall_uptime_percent: f64,
    pub avg_response_time_ms: f64,
    pub last_updated: String,
}

/// The public status page payload, before aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatusPage {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub monitors: Vec<RawMonitor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub statistics: RawStatistics,
}

/// A fully aggregated status page, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPageResponse {
    pub name: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub updated_at: String,
    pub monitors: Vec<Monitor>,
    pub statistics: StatusPageStatistics,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Upstream sends `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a timestamp sent by the status API.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Naive forms are taken as UTC
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    None
}
