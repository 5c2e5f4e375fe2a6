//! Page-wide status classification.

use super::models::StatusPageStatistics;
use serde::Serialize;

/// Overall state of a status page, derived from monitor counts only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallStatus {
    Operational,
    PartialOutage,
    MajorOutage,
    NoMonitors,
    Unknown,
}

impl OverallStatus {
    pub fn message(&self) -> &'static str {
        match self {
            OverallStatus::Operational => "All Systems Operational",
            OverallStatus::PartialOutage => "Partial Outage",
            OverallStatus::MajorOutage => "Major Outage",
            OverallStatus::NoMonitors => "No Monitors",
            OverallStatus::Unknown => "Unknown",
        }
    }

    /// CSS modifier used by the page template.
    pub fn css_class(&self) -> &'static str {
        match self {
            OverallStatus::Operational => "operational",
            OverallStatus::PartialOutage => "partial-outage",
            OverallStatus::MajorOutage => "major-outage",
            OverallStatus::NoMonitors => "no-monitors",
            OverallStatus::Unknown => "unknown",
        }
    }
}

/// Classify a page from its statistics.
pub fn classify(statistics: Option<&StatusPageStatistics>) -> OverallStatus {
    let Some(stats) = statistics else {
        return OverallStatus::Unknown;
    };

    if stats.total_monitors == 0 {
        OverallStatus::NoMonitors
    } else if stats.online_monitors == stats.total_monitors {
        OverallStatus::Operational
    } else if stats.online_monitors == 0 {
        OverallStatus::MajorOutage
    } else {
        OverallStatus::PartialOutage
    }
}

/// Color band for a single history bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeBand {
    Good,
    Degraded,
    Down,
    NoData,
}

impl UptimeBand {
    pub fn from_percent(uptime: Option<f64>) -> Self {
        match uptime {
            None => UptimeBand::NoData,
            Some(u) if u >= 99.0 => UptimeBand::Good,
            Some(u) if u >= 95.0 => UptimeBand::Degraded,
            Some(_) => UptimeBand::Down,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            UptimeBand::Good => "bar-good",
            UptimeBand::Degraded => "bar-degraded",
            UptimeBand::Down => "bar-down",
            UptimeBand::NoData => "bar-none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: u32, online: u32) -> StatusPageStatistics {
        StatusPageStatistics {
            total_monitors: total,
            online_monitors: online,
            offline_monitors: total.saturating_sub(online),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_scenarios() {
        assert_eq!(classify(Some(&stats(3, 3))), OverallStatus::Operational);
        assert_eq!(classify(Some(&stats(3, 0))), OverallStatus::MajorOutage);
        assert_eq!(classify(Some(&stats(3, 1))), OverallStatus::PartialOutage);
        assert_eq!(classify(Some(&stats(0, 0))), OverallStatus::NoMonitors);
        assert_eq!(classify(None), OverallStatus::Unknown);
    }

    #[test]
    fn test_classify_total() {
        for total in 0..=6u32 {
            for online in 0..=total {
                let status = classify(Some(&stats(total, online)));
                let expected = if total == 0 {
                    OverallStatus::NoMonitors
                } else if online == total {
                    OverallStatus::Operational
                } else if online == 0 {
                    OverallStatus::MajorOutage
                } else {
                    OverallStatus::PartialOutage
                };
                assert_eq!(status, expected, "total={} online={}", total, online);
                assert_ne!(status, OverallStatus::Unknown);
                // Operational needs at least one monitor
                if status == OverallStatus::Operational {
                    assert!(total > 0);
                }
            }
        }
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&OverallStatus::PartialOutage).unwrap(),
            "\"partial-outage\""
        );
        assert_eq!(OverallStatus::Operational.message(), "All Systems Operational");
        assert_eq!(OverallStatus::NoMonitors.css_class(), "no-monitors");
    }

    #[test]
    fn test_uptime_band() {
        assert_eq!(UptimeBand::from_percent(Some(100.0)), UptimeBand::Good);
        assert_eq!(UptimeBand::from_percent(Some(99.0)), UptimeBand::Good);
        assert_eq!(UptimeBand::from_percent(Some(98.99)), UptimeBand::Degraded);
        assert_eq!(UptimeBand::from_percent(Some(95.0)), UptimeBand::Degraded);
        assert_eq!(UptimeBand::from_percent(Some(10.0)), UptimeBand::Down);
        assert_eq!(UptimeBand::from_percent(None), UptimeBand::NoData);
    }
}
