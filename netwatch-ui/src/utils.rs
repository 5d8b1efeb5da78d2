use netwatch_common::Severity;

/// Format unix seconds as a UTC timestamp for table cells and modals
pub fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Compact age like "3d 4h", "2h 05m" or "45s" for the Last Active column
pub fn format_age(now_secs: i64, then_secs: i64) -> String {
    let delta = (now_secs - then_secs).max(0);
    let days = delta / 86_400;
    let hours = (delta % 86_400) / 3_600;
    let minutes = (delta % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", delta)
    }
}

/// CSS badge class for a severity cell
pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "severity-badge severity-critical",
        Severity::Warn => "severity-badge severity-warn",
        Severity::Info => "severity-badge severity-info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13 UTC");
        assert_eq!(format_timestamp(0), "1970-01-01 00:00 UTC");
    }

    #[test]
    fn test_format_age_buckets() {
        assert_eq!(format_age(1_000, 1_000), "0s");
        assert_eq!(format_age(1_045, 1_000), "45s");
        assert_eq!(format_age(1_000 + 300, 1_000), "5m");
        assert_eq!(format_age(1_000 + 7_500, 1_000), "2h 05m");
        assert_eq!(format_age(1_000 + 86_400 * 3 + 3_600 * 4, 1_000), "3d 4h");
    }

    #[test]
    fn test_format_age_never_negative() {
        assert_eq!(format_age(1_000, 2_000), "0s");
    }
}
