//! Reconciliation reports

use super::{PlannedAction, ReconcileError, ReconcileOutcome};
use crate::resource::Identifier;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A resource whose pass ended in a provider error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileFailure {
    pub identifier: Identifier,
    pub error: String,
}

impl ReconcileFailure {
    pub fn from_error(error: &ReconcileError) -> Self {
        Self {
            identifier: error.identifier().clone(),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub total: usize,
    pub in_sync: usize,
    pub changed: usize,
    pub forced: usize,
    pub failed: usize,
}

/// Outcome of reconciling a set of resources
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
    pub outcomes: Vec<ReconcileOutcome>,
    pub failures: Vec<ReconcileFailure>,
}

impl ReconcileReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            dry_run,
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn summary(&self) -> ReconcileSummary {
        let mut summary = ReconcileSummary {
            total: self.outcomes.len() + self.failures.len(),
            failed: self.failures.len(),
            ..ReconcileSummary::default()
        };

        for outcome in &self.outcomes {
            if outcome.in_sync {
                summary.in_sync += 1;
            }
            if outcome.action.is_change() {
                summary.changed += 1;
            }
            if outcome.action == PlannedAction::ForceCreate {
                summary.forced += 1;
            }
        }

        summary
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.outcomes.iter().any(|o| o.action.is_change())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human readable report, one line per resource
    pub fn format_text(&self) -> String {
        let mut output = String::new();
        let verb = if self.dry_run { "would" } else { "will" };

        for outcome in &self.outcomes {
            let line = match outcome.action {
                PlannedAction::None => format!(
                    "  = {} is {} (in sync)",
                    outcome.identifier, outcome.observed
                ),
                PlannedAction::Create => format!(
                    "  + {} {} register ({} -> {})",
                    outcome.identifier, verb, outcome.observed, outcome.desired
                ),
                PlannedAction::ForceCreate => format!(
                    "  ! {} {} re-register (force)",
                    outcome.identifier, verb
                ),
                PlannedAction::Destroy => format!(
                    "  - {} {} unregister ({} -> {})",
                    outcome.identifier, verb, outcome.observed, outcome.desired
                ),
            };
            output.push_str(&line);
            output.push('\n');
        }

        for failure in &self.failures {
            output.push_str(&format!("  x {} failed: {}\n", failure.identifier, failure.error));
        }

        let summary = self.summary();
        output.push_str(&format!(
            "\n{} resources: {} in sync, {} to change ({} forced), {} failed",
            summary.total, summary.in_sync, summary.changed, summary.forced, summary.failed
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensure::EnsureState;

    fn outcome(host: &str, observed: EnsureState, action: PlannedAction) -> ReconcileOutcome {
        ReconcileOutcome {
            identifier: host.parse().unwrap(),
            desired: EnsureState::Present,
            observed,
            in_sync: observed == EnsureState::Present,
            action,
            applied: false,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut report = ReconcileReport::new(true);
        report
            .outcomes
            .push(outcome("a.example.com", EnsureState::Present, PlannedAction::None));
        report
            .outcomes
            .push(outcome("b.example.com", EnsureState::Absent, PlannedAction::Create));
        report.outcomes.push(outcome(
            "c.example.com",
            EnsureState::Present,
            PlannedAction::ForceCreate,
        ));

        let summary = report.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.in_sync, 2);
        assert_eq!(summary.changed, 2);
        assert_eq!(summary.forced, 1);
        assert!(report.has_changes());
        assert!(report.is_success());
    }

    #[test]
    fn test_text_and_json_rendering() {
        let mut report = ReconcileReport::new(true);
        report
            .outcomes
            .push(outcome("b.example.com", EnsureState::Absent, PlannedAction::Create));

        let text = report.format_text();
        assert!(text.contains("+ b.example.com would register (absent -> present)"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"action\": \"create\""));
        assert!(json.contains("\"dry_run\": true"));
    }
}
