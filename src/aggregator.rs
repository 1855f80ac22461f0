//! Thread-safe aggregation of trial verdicts for one suite run.

use crate::error::ConfigError;
use crate::value::TrialInputs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One failed trial: which case, with which generated inputs, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub description: String,
    pub inputs: TrialInputs,
    pub reason: String,
}

/// A case whose configuration faulted at run time, aborting its trials while
/// the rest of the suite continued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFault {
    pub description: String,
    pub error: String,
}

/// Counters and logs for one suite run.
///
/// Owned exclusively by [`ResultAggregator`] while trials run; external
/// reporters read cloned snapshots. Failure entries keep arrival order, which
/// under concurrent trials is best-effort and need not match trial index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<FailureRecord>,
    pub faulted_cases: Vec<CaseFault>,
    pub skipped_cases: Vec<String>,
}

impl SuiteResult {
    /// Trials that ran to a verdict.
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// True when nothing failed and no case faulted.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.faulted_cases.is_empty()
    }
}

/// Synchronized collector updated by every trial.
///
/// `record_pass` and `record_fail` are atomic with respect to each other, so
/// concurrent trials of one case can never corrupt counts or drop entries.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    state: Mutex<SuiteResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&self) {
        self.state.lock().passed += 1;
    }

    pub fn record_fail(
        &self,
        description: impl Into<String>,
        inputs: TrialInputs,
        reason: impl Into<String>,
    ) {
        let mut state = self.state.lock();
        state.failed += 1;
        state.failures.push(FailureRecord {
            description: description.into(),
            inputs,
            reason: reason.into(),
        });
    }

    /// Record a configuration fault that aborted a case's trials.
    pub fn record_case_fault(&self, description: impl Into<String>, error: &ConfigError) {
        self.state.lock().faulted_cases.push(CaseFault {
            description: description.into(),
            error: error.to_string(),
        });
    }

    /// Record a disabled case for traceability.
    pub fn record_skipped(&self, description: impl Into<String>) {
        self.state
            .lock()
            .skipped_cases
            .push(description.into());
    }

    /// Clone the current state for external consumption.
    pub fn snapshot(&self) -> SuiteResult {
        self.state.lock().clone()
    }

    /// Consume the aggregator and yield its final state.
    pub fn into_result(self) -> SuiteResult {
        self.state.into_inner()
    }

    /// Render the textual totals block: run count, pass/fail counts, failure
    /// log in append order, faulted and skipped cases.
    pub fn summarize(&self, suite_name: &str) -> String {
        let state = self.state.lock();
        let mut out = String::new();
        let rule = "-".repeat(40);
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Suite summary: {}\n", suite_name));
        out.push_str(&format!("Trials run: {}\n", state.total()));
        out.push_str(&format!("Passed: {}\n", state.passed));
        out.push_str(&format!("Failed: {}\n", state.failed));
        if !state.failures.is_empty() {
            out.push_str("Failed trials:\n");
            for failure in &state.failures {
                out.push_str(&format!(
                    "  - {} | inputs {} | {}\n",
                    failure.description, failure.inputs, failure.reason
                ));
            }
        }
        if !state.faulted_cases.is_empty() {
            out.push_str("Faulted cases:\n");
            for fault in &state.faulted_cases {
                out.push_str(&format!("  - {} | {}\n", fault.description, fault.error));
            }
        }
        if !state.skipped_cases.is_empty() {
            out.push_str("Skipped (disabled) cases:\n");
            for description in &state.skipped_cases {
                out.push_str(&format!("  - {}\n", description));
            }
        }
        out.push_str(&rule);
        out
    }
}
