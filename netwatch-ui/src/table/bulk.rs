//! Bulk action outcome tracking.
//!
//! The toolbar fires one remote call per selected id, awaiting each call and
//! recording its result here; the user sees a single aggregate notification,
//! never per-row granularity. The async loop itself lives in the page glue.

use netwatch_common::Severity;

/// The bulk operations the toolbar offers
#[derive(Debug, Clone, PartialEq)]
pub enum BulkVerb {
    Acknowledge,
    Clear,
    Suppress,
    SetSeverity(Severity),
}

impl BulkVerb {
    /// Past-tense label for the aggregate notification
    pub fn done_label(&self) -> String {
        match self {
            Self::Acknowledge => "Acknowledged".to_string(),
            Self::Clear => "Cleared".to_string(),
            Self::Suppress => "Suppressed".to_string(),
            Self::SetSeverity(sev) => format!("Set severity {} on", sev.as_str()),
        }
    }

    /// Imperative label for buttons and failure messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acknowledge => "Acknowledge",
            Self::Clear => "Clear",
            Self::Suppress => "Suppress",
            Self::SetSeverity(_) => "Set severity",
        }
    }
}

/// Per-item results of one bulk run, aggregated into a single message
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    verb: BulkVerb,
    attempted: usize,
    failures: Vec<(String, String)>, // (alert id, error text)
}

impl BulkOutcome {
    pub fn new(verb: BulkVerb) -> Self {
        Self { verb, attempted: 0, failures: Vec::new() }
    }

    pub fn record(&mut self, id: &str, result: Result<(), String>) {
        self.attempted += 1;
        if let Err(error) = result {
            self.failures.push((id.to_string(), error));
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// One aggregate notification line for the banner
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!(
                "{} {} alert{}",
                self.verb.done_label(),
                self.attempted,
                if self.attempted == 1 { "" } else { "s" }
            )
        } else {
            format!(
                "{} failed for {} of {} alerts: {}",
                self.verb.label(),
                self.failures.len(),
                self.attempted,
                self.failures[0].1
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_success_summary() {
        let mut outcome = BulkOutcome::new(BulkVerb::Acknowledge);
        outcome.record("a", Ok(()));
        outcome.record("b", Ok(()));
        assert!(outcome.is_success());
        assert_eq!(outcome.summary(), "Acknowledged 2 alerts");
    }

    #[test]
    fn test_single_row_summary_is_singular() {
        let mut outcome = BulkOutcome::new(BulkVerb::Suppress);
        outcome.record("a", Ok(()));
        assert_eq!(outcome.summary(), "Suppressed 1 alert");
    }

    #[test]
    fn test_partial_failure_is_not_silent_success() {
        // 3 rows, 1 rejected remote call: the aggregate must report failure
        let mut outcome = BulkOutcome::new(BulkVerb::Clear);
        outcome.record("a", Ok(()));
        outcome.record("b", Err("HTTP 502".to_string()));
        outcome.record("c", Ok(()));

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempted(), 3);
        assert_eq!(outcome.summary(), "Clear failed for 1 of 3 alerts: HTTP 502");
    }

    #[test]
    fn test_severity_verb_labels() {
        let verb = BulkVerb::SetSeverity(Severity::Warn);
        assert_eq!(verb.done_label(), "Set severity WARN on");
        assert_eq!(verb.label(), "Set severity");
    }
}
