//! Common types shared between the Netwatch dashboard and its API clients

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Alert severity level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warn,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warn, Severity::Info];

    /// Wire name, as the alert manager sends it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warn => "WARN",
            Self::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CRITICAL" => Ok(Self::Critical),
            "WARN" => Ok(Self::Warn),
            "INFO" => Ok(Self::Info),
            other => Err(ParseEnumError::Severity(other.to_string())),
        }
    }
}

/// Alert lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    Active,
    Suppressed,
    Cleared,
    Expired,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 4] = [
        AlertStatus::Active,
        AlertStatus::Suppressed,
        AlertStatus::Cleared,
        AlertStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suppressed => "SUPPRESSED",
            Self::Cleared => "CLEARED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Suppressed => write!(f, "suppressed"),
            Self::Cleared => write!(f, "cleared"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for AlertStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "SUPPRESSED" => Ok(Self::Suppressed),
            "CLEARED" => Ok(Self::Cleared),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(ParseEnumError::Status(other.to_string())),
        }
    }
}

/// Error raised when a wire value does not name a known enum variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseEnumError {
    #[error("unknown severity: {0}")]
    Severity(String),
    #[error("unknown alert status: {0}")]
    Status(String),
}

/// One entry in an alert's event history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEvent {
    pub event: String,
    pub timestamp: i64, // unix seconds
}

/// A single network alert, as returned by the alert manager.
///
/// Records are immutable per fetch: the dashboard replaces the whole
/// snapshot on every load instead of patching individual rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRecord {
    pub id: String,
    pub severity: Severity,
    pub status: AlertStatus,
    pub name: String,
    pub site: String,
    pub device: String,
    pub entity: String,
    pub source: String,
    pub start_time: i64,  // unix seconds
    pub last_active: i64, // unix seconds
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
}

impl AlertRecord {
    /// Normalize display fields after a fetch: history is kept newest-first.
    pub fn normalize(&mut self) {
        self.history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}

/// How long a suppression should hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SuppressDuration {
    Hours(u32),
    UntilCleared,
}

impl std::fmt::Display for SuppressDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hours(h) => write!(f, "{}h", h),
            Self::UntilCleared => write!(f, "until cleared"),
        }
    }
}

/// A team that alerts can be routed to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_alert() -> AlertRecord {
        AlertRecord {
            id: "alrt-1001".to_string(),
            severity: Severity::Critical,
            status: AlertStatus::Active,
            name: "BGP session down".to_string(),
            site: "fra1".to_string(),
            device: "edge-rtr-03".to_string(),
            entity: "ge-0/0/12".to_string(),
            source: "bgpmon".to_string(),
            start_time: 1_700_000_000,
            last_active: 1_700_003_600,
            history: vec![
                HistoryEvent { event: "RAISED".to_string(), timestamp: 1_700_000_000 },
                HistoryEvent { event: "REFIRED".to_string(), timestamp: 1_700_003_600 },
            ],
        }
    }

    #[test]
    fn test_alert_record_serialization() {
        let alert = sample_alert();
        let json = serde_json::to_string(&alert).unwrap();
        let deserialized: AlertRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, alert);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(serde_json::to_string(&AlertStatus::Suppressed).unwrap(), "\"SUPPRESSED\"");

        let sev: Severity = serde_json::from_str("\"WARN\"").unwrap();
        assert_eq!(sev, Severity::Warn);
        let status: AlertStatus = serde_json::from_str("\"EXPIRED\"").unwrap();
        assert_eq!(status, AlertStatus::Expired);
    }

    #[test]
    fn test_enum_parsing_round_trip() {
        for sev in Severity::ALL {
            assert_eq!(sev.as_str().parse::<Severity>().unwrap(), sev);
        }
        for status in AlertStatus::ALL {
            assert_eq!(status.as_str().parse::<AlertStatus>().unwrap(), status);
        }
        assert!("bogus".parse::<Severity>().is_err());
        assert!("active".parse::<AlertStatus>().is_err());
    }

    #[test]
    fn test_history_defaults_to_empty() {
        let json = r#"{
            "id": "alrt-2",
            "severity": "INFO",
            "status": "CLEARED",
            "name": "link flap",
            "site": "ams2",
            "device": "agg-sw-01",
            "entity": "xe-1/0/4",
            "source": "snmptrap",
            "start_time": 1700000000,
            "last_active": 1700000060
        }"#;
        let alert: AlertRecord = serde_json::from_str(json).unwrap();
        assert!(alert.history.is_empty());
    }

    #[test]
    fn test_normalize_orders_history_newest_first() {
        let mut alert = sample_alert();
        alert.history = vec![
            HistoryEvent { event: "RAISED".to_string(), timestamp: 100 },
            HistoryEvent { event: "ACKNOWLEDGED".to_string(), timestamp: 300 },
            HistoryEvent { event: "REFIRED".to_string(), timestamp: 200 },
        ];
        alert.normalize();
        let stamps: Vec<i64> = alert.history.iter().map(|h| h.timestamp).collect();
        assert_eq!(stamps, vec![300, 200, 100]);
    }

    #[test]
    fn test_suppress_duration_serialization() {
        let json = serde_json::to_string(&SuppressDuration::Hours(4)).unwrap();
        assert_eq!(json, r#"{"kind":"hours","value":4}"#);
        let back: SuppressDuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SuppressDuration::Hours(4));

        let forever = serde_json::to_string(&SuppressDuration::UntilCleared).unwrap();
        let back: SuppressDuration = serde_json::from_str(&forever).unwrap();
        assert_eq!(back, SuppressDuration::UntilCleared);
    }
}
