//! HTML rendering of a status page snapshot.

use crate::page::{
    parse_timestamp, recent, range_label, Granularity, HistoricalRecord, Monitor, MonitorStatus,
    RegionHistory, UptimeBand, RECENT_BUCKETS,
};
use crate::refresh::PageState;

use chrono::{DateTime, Utc};
use std::time::Duration;

const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");
const PAGE_TEMPLATE: &str = include_str!("templates/page.html");
const ERROR_TEMPLATE: &str = include_str!("templates/error.html");

/// Refresh interval while waiting for the first cycle.
const LOADING_REFRESH_SECS: u64 = 5;

// ============================================================================
// Formatting
// ============================================================================

pub fn format_uptime(uptime: Option<f64>) -> String {
    match uptime {
        Some(u) => format!("{:.2}%", u),
        None => "N/A".to_string(),
    }
}

/// Milliseconds shown as seconds.
pub fn format_response_time(ms: Option<f64>) -> String {
    match ms {
        Some(ms) => format!("{:.1} s", ms / 1000.0),
        None => "N/A".to_string(),
    }
}

pub fn format_total_checks(checks: Option<u64>) -> String {
    let Some(checks) = checks else {
        return "N/A".to_string();
    };

    let digits = checks.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_check_interval(interval: Duration) -> String {
    let minutes = interval.as_secs() / 60;
    if minutes >= 60 && minutes % 60 == 0 {
        let hours = minutes / 60;
        format!("Every {} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else {
        format!("Every {} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Date part of an upstream timestamp.
pub fn format_date(s: &str) -> String {
    if s.is_empty() {
        return "N/A".to_string();
    }

    match parse_timestamp(s) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => s.to_string(),
    }
}

fn format_instant(dt: Option<DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "N/A".to_string(),
    }
}

/// Escape text for HTML bodies and attributes. Braces are escaped too so
/// upstream text can never look like a template placeholder.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// Pages
// ============================================================================

/// Render the full HTML document for the current state.
pub fn render_state(state: &PageState, refresh_secs: u64) -> String {
    let Some(page) = &state.page else {
        return match &state.error {
            Some(error) => layout(
                "Status page not found",
                refresh_secs,
                &render_error("Status page not found", error),
            ),
            None => layout(
                "Loading status page",
                LOADING_REFRESH_SECS,
                &render_error("Loading status page…", "The first refresh has not finished yet."),
            ),
        };
    };

    let stats = &page.statistics;
    let status = state.overall_status();

    let description = page
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!("<p class=\"muted\">{}</p>", escape_html(d)))
        .unwrap_or_default();

    // Stale data stays on screen with a warning
    let banner = state
        .error
        .as_deref()
        .map(|e| {
            format!(
                "<div class=\"banner\">Showing data from {}. Latest refresh failed: {}</div>",
                format_instant(state.last_refresh),
                escape_html(e)
            )
        })
        .unwrap_or_default();

    let monitors = if page.monitors.is_empty() {
        "<p class=\"muted empty\">No monitors configured for this status page</p>".to_string()
    } else {
        page.monitors
            .iter()
            .map(render_monitor)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = PAGE_TEMPLATE
        .replace("{{status_class}}", status.css_class())
        .replace("{{status_message}}", status.message())
        .replace("{{last_updated}}", &escape_html(&format_date(&stats.last_updated)))
        .replace("{{total}}", &stats.total_monitors.to_string())
        .replace("{{online}}", &stats.online_monitors.to_string())
        .replace("{{offline}}", &stats.offline_monitors.to_string())
        .replace("{{overall_uptime}}", &format_uptime(Some(stats.overall_uptime_percent)))
        .replace("{{last_refresh}}", &format_instant(state.last_refresh))
        .replace("{{name}}", &escape_html(&page.name))
        .replace("{{description}}", &description)
        .replace("{{banner}}", &banner)
        .replace("{{monitors}}", &monitors);

    layout(&page.name, refresh_secs, &content)
}

fn layout(title: &str, refresh_secs: u64, content: &str) -> String {
    LAYOUT_TEMPLATE
        .replace("{{title}}", &escape_html(title))
        .replace("{{refresh_secs}}", &refresh_secs.to_string())
        .replace("{{content}}", content)
}

fn render_error(heading: &str, message: &str) -> String {
    ERROR_TEMPLATE
        .replace("{{heading}}", &escape_html(heading))
        .replace("{{message}}", &escape_html(message))
}

fn render_monitor(monitor: &Monitor) -> String {
    let badge_class = match monitor.status {
        MonitorStatus::Online => "badge-online",
        MonitorStatus::Offline => "badge-offline",
    };

    let tiles = [
        ("Total checks", format_total_checks(Some(monitor.total_checks))),
        ("Check interval", format_check_interval(monitor.check_interval.duration())),
        (
            "Last checked",
            monitor.last_checked.as_deref().map(format_date).unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "SSL expiry",
            monitor.ssl_expiry_date.as_deref().map(format_date).unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Response time", format_response_time(Some(monitor.avg_response_time_ms))),
        ("Uptime", format_uptime(Some(monitor.uptime_percentage))),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            "<div class=\"tile\"><span class=\"muted small\">{}</span><p>{}</p></div>",
            label,
            escape_html(value)
        )
    })
    .collect::<String>();

    let regions = monitor
        .historical_data_by_region
        .iter()
        .map(render_region)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<article class=\"monitor\">\
         <div class=\"monitor-head\"><div><h3>{}</h3><p class=\"muted small\">{}</p></div>\
         <span class=\"badge {}\">{}</span></div>\
         <div class=\"tiles\">{}</div>{}</article>",
        escape_html(&monitor.name),
        escape_html(&monitor.url),
        badge_class,
        monitor.status.label(),
        tiles,
        regions
    )
}

fn render_region(region: &RegionHistory) -> String {
    let bars = recent(&region.records, RECENT_BUCKETS)
        .iter()
        .map(render_bar)
        .collect::<String>();

    format!(
        "<div class=\"region\"><div class=\"region-head\"><span>{}</span>\
         <span class=\"muted\">{}</span></div>\
         <div class=\"bars\" title=\"Buckets {}\">{}</div></div>",
        escape_html(&region.region),
        range_label(&region.records),
        Granularity::for_records(&region.records).label(),
        bars
    )
}

fn render_bar(record: &HistoricalRecord) -> String {
    let band = if record.total_checks == 0 {
        UptimeBand::NoData
    } else {
        UptimeBand::from_percent(Some(record.uptime_percent))
    };

    let tooltip = format!(
        "{}&#10;Uptime: {}&#10;Response: {}",
        escape_html(&format_date(&record.timestamp)),
        format_uptime(Some(record.uptime_percent)),
        format_response_time(Some(record.avg_response_time_ms))
    );

    format!("<div class=\"bar {}\" title=\"{}\"></div>", band.css_class(), tooltip)
}
