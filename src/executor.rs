//! Single-trial execution: generate arguments, invoke the target, judge.

use crate::case::TestCase;
use crate::error::ConfigError;
use crate::fault::Fault;
use crate::generator;
use crate::registry::TargetFn;
use crate::value::{TrialInputs, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Ephemeral result of one trial: the generated arguments and either the
/// returned value or the captured fault. Judged immediately, then discarded.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub inputs: TrialInputs,
    pub result: Result<Value, Fault>,
}

/// Judged verdict for one trial.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail { reason: String },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Run exactly one trial of `case` against a resolved target.
///
/// Only configuration faults escape; anything the target raises, including
/// panics, is captured into the outcome.
pub fn run_trial(case: &TestCase, target: &TargetFn) -> Result<TrialOutcome, ConfigError> {
    let inputs = generate_inputs(case)?;
    let result = invoke(target, &inputs);
    Ok(TrialOutcome { inputs, result })
}

/// Build the named-argument mapping: one generated value per declared spec,
/// in declaration order.
fn generate_inputs(case: &TestCase) -> Result<TrialInputs, ConfigError> {
    let mut inputs = TrialInputs::new();
    for spec in &case.inputs {
        inputs.push(spec.name.clone(), generator::generate(spec)?);
    }
    Ok(inputs)
}

/// Invoke the target, folding an unwinding panic into a `panic`-kind fault.
fn invoke(target: &TargetFn, inputs: &TrialInputs) -> Result<Value, Fault> {
    match catch_unwind(AssertUnwindSafe(|| target(inputs))) {
        Ok(result) => result,
        Err(payload) => Err(Fault::from_panic_payload(payload)),
    }
}

/// Fault-centric judging.
///
/// With a declared expectation the trial passes iff a fault was raised, its
/// kind matches by tag, and (when declared) its message contains the expected
/// substring. Without one, the trial passes iff invocation did not fault; the
/// returned value is never compared to anything.
pub fn judge(case: &TestCase, outcome: &TrialOutcome) -> Verdict {
    match (&case.expected_fault, &outcome.result) {
        (Some(expected), Err(fault)) => {
            if fault.kind != expected.kind {
                return Verdict::Fail {
                    reason: format!(
                        "expected fault kind '{}', got '{}': {}",
                        expected.kind, fault.kind, fault.message
                    ),
                };
            }
            if let Some(substring) = &expected.message_substring {
                if !fault.message.contains(substring.as_str()) {
                    return Verdict::Fail {
                        reason: format!(
                            "expected fault message containing '{}', got '{}'",
                            substring, fault.message
                        ),
                    };
                }
            }
            Verdict::Pass
        }
        (Some(expected), Ok(_)) => Verdict::Fail {
            reason: format!(
                "expected fault of kind '{}', but none was raised",
                expected.kind
            ),
        },
        (None, Err(fault)) => Verdict::Fail {
            reason: format!("unexpected fault of kind '{}': {}", fault.kind, fault.message),
        },
        (None, Ok(_)) => Verdict::Pass,
    }
}
