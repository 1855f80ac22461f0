//! Run reporting: per-trial PASS/FAIL lines and the final totals block.
//!
//! The `Reporter` trait decouples human-readable output from the aggregator's
//! structured state. Implementations can print, collect for assertions, or
//! forward elsewhere.

use crate::aggregator::SuiteResult;
use crate::executor::Verdict;
use crate::value::TrialInputs;
use colored::Colorize;

/// Events emitted while a suite executes.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// A case is about to run its trials.
    CaseStarted {
        description: String,
        trials: usize,
        parallel: bool,
    },
    /// A disabled case was recorded and skipped.
    CaseSkipped { description: String },
    /// A case's configuration faulted; its trials were aborted.
    CaseFaulted { description: String, error: String },
    /// One trial reached a verdict.
    TrialFinished {
        description: String,
        inputs: TrialInputs,
        verdict: Verdict,
    },
    /// The whole suite completed.
    SuiteFinished {
        suite: String,
        summary: String,
        result: SuiteResult,
    },
}

/// Receiver for run events.
///
/// Trials emit from worker threads under parallel execution, so
/// implementations must be `Send + Sync`.
///
/// # Example
///
/// ```ignore
/// struct PrintReporter;
///
/// impl Reporter for PrintReporter {
///     fn emit(&self, event: &RunEvent) {
///         println!("{:?}", event);
///     }
/// }
/// ```
pub trait Reporter: Send + Sync {
    /// Called for every run event.
    fn emit(&self, event: &RunEvent);

    /// Called once after the suite finishes.
    ///
    /// The default implementation does nothing.
    fn flush(&self) {}
}

/// Discards all events. The default when embedding the harness.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn emit(&self, _event: &RunEvent) {}
}

/// Prints colored PASS/FAIL lines and the totals block to stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn emit(&self, event: &RunEvent) {
        match event {
            RunEvent::CaseStarted {
                description,
                trials,
                parallel,
            } => {
                let mode = if *parallel && *trials > 1 {
                    ", parallel"
                } else {
                    ""
                };
                let noun = if *trials == 1 { "trial" } else { "trials" };
                println!("=== {} ({} {}{})", description, trials, noun, mode);
            }
            RunEvent::CaseSkipped { description } => {
                println!("{} {} (disabled)", "SKIP".yellow(), description);
            }
            RunEvent::CaseFaulted { description, error } => {
                println!("{} {} | {}", "FAULT".red().bold(), description, error);
            }
            RunEvent::TrialFinished {
                description,
                inputs,
                verdict,
            } => match verdict {
                Verdict::Pass => {
                    println!("{} {} | inputs {}", "PASS".green(), description, inputs);
                }
                Verdict::Fail { reason } => {
                    println!(
                        "{} {} | inputs {} | {}",
                        "FAIL".red(),
                        description,
                        inputs,
                        reason
                    );
                }
            },
            RunEvent::SuiteFinished { summary, .. } => {
                println!("{}", summary);
            }
        }
    }
}

/// Collects event tags for assertions in unit tests.
#[cfg(test)]
pub(crate) struct CollectingReporter {
    pub(crate) events: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl CollectingReporter {
    pub(crate) fn new() -> Self {
        Self {
            events: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl Reporter for CollectingReporter {
    fn emit(&self, event: &RunEvent) {
        let tag = match event {
            RunEvent::CaseStarted { description, .. } => format!("started:{}", description),
            RunEvent::CaseSkipped { description } => format!("skipped:{}", description),
            RunEvent::CaseFaulted { description, .. } => format!("faulted:{}", description),
            RunEvent::TrialFinished { verdict, .. } => match verdict {
                Verdict::Pass => "trial:pass".to_string(),
                Verdict::Fail { .. } => "trial:fail".to_string(),
            },
            RunEvent::SuiteFinished { suite, .. } => format!("finished:{}", suite),
        };
        self.events.lock().push(tag);
    }
}
