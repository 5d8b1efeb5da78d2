//! Static column model for the alert table.
//!
//! Columns are defined once at startup; everything else (filtering, grouping,
//! selection) refers back to them by `ColumnId`.

use netwatch_common::AlertRecord;
use std::collections::BTreeSet;

/// Identifies one alert attribute shown as a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnId {
    Name,
    Severity,
    Status,
    Site,
    Device,
    Entity,
    Source,
    StartTime,
    LastActive,
}

impl ColumnId {
    /// Stable key, used for group keys and render keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Severity => "severity",
            Self::Status => "status",
            Self::Site => "site",
            Self::Device => "device",
            Self::Entity => "entity",
            Self::Source => "source",
            Self::StartTime => "start_time",
            Self::LastActive => "last_active",
        }
    }
}

/// Value a filter holds for one filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Free-text query (name search)
    Text(String),
    /// Exact multi-value selection; empty set means "no constraint"
    OneOf(BTreeSet<String>),
}

/// Per-row filter predicate. The default is exact multi-value membership on
/// the column's accessor value; columns can override it.
pub type FilterPredicate = fn(&AlertRecord, ColumnId, &FilterValue) -> bool;

/// Declarative description of one column
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub label: &'static str,
    pub visible: bool,
    pub groupable: bool,
    /// None means the column takes no client-side filter
    pub predicate: Option<FilterPredicate>,
}

/// Cell value of `record` under `column`, as a display/filter string.
/// Timestamps come back as raw unix seconds; the view layer formats them.
pub fn accessor(record: &AlertRecord, column: ColumnId) -> String {
    match column {
        ColumnId::Name => record.name.clone(),
        ColumnId::Severity => record.severity.as_str().to_string(),
        ColumnId::Status => record.status.as_str().to_string(),
        ColumnId::Site => record.site.clone(),
        ColumnId::Device => record.device.clone(),
        ColumnId::Entity => record.entity.clone(),
        ColumnId::Source => record.source.clone(),
        ColumnId::StartTime => record.start_time.to_string(),
        ColumnId::LastActive => record.last_active.to_string(),
    }
}

/// Default predicate: exact membership in the selected value set
pub fn membership_predicate(record: &AlertRecord, column: ColumnId, value: &FilterValue) -> bool {
    match value {
        FilterValue::OneOf(set) => set.is_empty() || set.contains(&accessor(record, column)),
        // A multi-value column fed a text query constrains nothing
        FilterValue::Text(_) => true,
    }
}

/// Name filter: case-sensitive substring match
pub fn substring_predicate(record: &AlertRecord, column: ColumnId, value: &FilterValue) -> bool {
    match value {
        FilterValue::Text(query) => query.is_empty() || accessor(record, column).contains(query.as_str()),
        FilterValue::OneOf(set) => set.is_empty() || set.contains(&accessor(record, column)),
    }
}

/// The alert table's column registry. Status carries no client-side
/// predicate: status filtering happens server-side via the mutation
/// coordinator's top-level filters.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec {
            id: ColumnId::Name,
            label: "Alert",
            visible: true,
            groupable: false,
            predicate: Some(substring_predicate),
        },
        ColumnSpec {
            id: ColumnId::Severity,
            label: "Severity",
            visible: true,
            groupable: true,
            predicate: Some(membership_predicate),
        },
        ColumnSpec {
            id: ColumnId::Status,
            label: "Status",
            visible: true,
            groupable: false,
            predicate: None,
        },
        ColumnSpec {
            id: ColumnId::Site,
            label: "Site",
            visible: true,
            groupable: true,
            predicate: Some(membership_predicate),
        },
        ColumnSpec {
            id: ColumnId::Device,
            label: "Device",
            visible: true,
            groupable: true,
            predicate: Some(membership_predicate),
        },
        ColumnSpec {
            id: ColumnId::Entity,
            label: "Entity",
            visible: true,
            groupable: false,
            predicate: None,
        },
        ColumnSpec {
            id: ColumnId::Source,
            label: "Source",
            visible: true,
            groupable: true,
            predicate: Some(membership_predicate),
        },
        ColumnSpec {
            id: ColumnId::StartTime,
            label: "Started",
            visible: true,
            groupable: false,
            predicate: None,
        },
        ColumnSpec {
            id: ColumnId::LastActive,
            label: "Last Active",
            visible: true,
            groupable: false,
            predicate: None,
        },
    ]
}

/// Columns eligible for the group-by toolbar
pub fn groupable_columns(columns: &[ColumnSpec]) -> Vec<ColumnId> {
    columns.iter().filter(|c| c.groupable).map(|c| c.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use netwatch_common::{AlertStatus, Severity};

    fn record() -> AlertRecord {
        AlertRecord {
            id: "a1".to_string(),
            severity: Severity::Warn,
            status: AlertStatus::Active,
            name: "Interface down".to_string(),
            site: "fra1".to_string(),
            device: "edge-rtr-03".to_string(),
            entity: "ge-0/0/12".to_string(),
            source: "snmptrap".to_string(),
            start_time: 1_700_000_000,
            last_active: 1_700_000_900,
            history: vec![],
        }
    }

    #[test]
    fn test_accessor_covers_every_column() {
        let r = record();
        assert_eq!(accessor(&r, ColumnId::Name), "Interface down");
        assert_eq!(accessor(&r, ColumnId::Severity), "WARN");
        assert_eq!(accessor(&r, ColumnId::Status), "ACTIVE");
        assert_eq!(accessor(&r, ColumnId::Site), "fra1");
        assert_eq!(accessor(&r, ColumnId::Device), "edge-rtr-03");
        assert_eq!(accessor(&r, ColumnId::Entity), "ge-0/0/12");
        assert_eq!(accessor(&r, ColumnId::Source), "snmptrap");
        assert_eq!(accessor(&r, ColumnId::StartTime), "1700000000");
        assert_eq!(accessor(&r, ColumnId::LastActive), "1700000900");
    }

    #[test]
    fn test_membership_predicate() {
        let r = record();
        let empty = FilterValue::OneOf(BTreeSet::new());
        assert!(membership_predicate(&r, ColumnId::Site, &empty));

        let hit = FilterValue::OneOf(BTreeSet::from(["fra1".to_string(), "ams2".to_string()]));
        assert!(membership_predicate(&r, ColumnId::Site, &hit));

        let miss = FilterValue::OneOf(BTreeSet::from(["ams2".to_string()]));
        assert!(!membership_predicate(&r, ColumnId::Site, &miss));
    }

    #[test]
    fn test_substring_predicate_is_case_sensitive() {
        let r = record();
        assert!(substring_predicate(&r, ColumnId::Name, &FilterValue::Text("face do".to_string())));
        assert!(!substring_predicate(&r, ColumnId::Name, &FilterValue::Text("interface".to_string())));
        assert!(substring_predicate(&r, ColumnId::Name, &FilterValue::Text(String::new())));
    }

    #[test]
    fn test_status_column_has_no_client_predicate() {
        let columns = default_columns();
        let status = columns.iter().find(|c| c.id == ColumnId::Status).unwrap();
        assert!(status.predicate.is_none());
    }

    #[test]
    fn test_groupable_columns() {
        let columns = default_columns();
        assert_eq!(
            groupable_columns(&columns),
            vec![ColumnId::Severity, ColumnId::Site, ColumnId::Device, ColumnId::Source]
        );
    }
}
