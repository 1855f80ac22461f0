//! Data contracts: named bundles of rules, and a suite for checking records
//! against them.
//!
//! A contract's `validate` is the callable the fuzz side sees as "record in,
//! violation strings out"; zero strings means valid.

use crate::aggregator::{ResultAggregator, SuiteResult};
use crate::report::{NullReporter, Reporter, RunEvent};
use crate::rules::{Record, Rule};
use crate::value::TrialInputs;
use std::sync::Arc;
use tracing::info;

/// A named set of rules evaluated against a record.
///
/// # Example
///
/// ```ignore
/// struct UserContract {
///     rules: Vec<Box<dyn Rule>>,
/// }
///
/// impl DataContract for UserContract {
///     fn name(&self) -> &str {
///         "user"
///     }
///
///     fn rules(&self) -> &[Box<dyn Rule>] {
///         &self.rules
///     }
/// }
/// ```
pub trait DataContract: Send + Sync {
    fn name(&self) -> &str;

    fn rules(&self) -> &[Box<dyn Rule>];

    /// Collect the error message of every failing rule, in rule order.
    fn validate(&self, record: &Record) -> Vec<String> {
        self.rules()
            .iter()
            .filter(|rule| !rule.is_valid(record))
            .map(|rule| rule.error_message(record))
            .collect()
    }
}

/// A contract assembled from a rule list, for hosts that do not want to
/// define a dedicated type.
pub struct RuleSetContract {
    name: String,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSetContract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

impl DataContract for RuleSetContract {
    fn name(&self) -> &str {
        &self.name
    }

    fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }
}

/// Shareable handle over a contract.
#[derive(Clone)]
pub struct Validator {
    contract: Arc<dyn DataContract>,
}

impl Validator {
    pub fn new(contract: impl DataContract + 'static) -> Self {
        Self {
            contract: Arc::new(contract),
        }
    }

    pub fn contract_name(&self) -> &str {
        self.contract.name()
    }

    pub fn validate(&self, record: &Record) -> Vec<String> {
        self.contract.validate(record)
    }

    pub fn is_valid(&self, record: &Record) -> bool {
        self.validate(record).is_empty()
    }
}

struct ContractCase {
    description: String,
    validator: Validator,
    record: Record,
    expected_errors: Vec<String>,
}

/// Ordered contract checks sharing one summary.
///
/// A case passes iff the produced error messages equal the expected ones,
/// compared order-insensitively; extra and missing errors both fail.
pub struct ContractSuite {
    name: String,
    cases: Vec<ContractCase>,
}

impl ContractSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Register a record expected to satisfy the contract.
    pub fn expect_valid(
        &mut self,
        description: impl Into<String>,
        validator: Validator,
        record: Record,
    ) -> &mut Self {
        self.expect_errors(description, validator, record, Vec::<String>::new())
    }

    /// Register a record expected to fail with exactly these errors.
    pub fn expect_errors<I, S>(
        &mut self,
        description: impl Into<String>,
        validator: Validator,
        record: Record,
        expected_errors: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cases.push(ContractCase {
            description: description.into(),
            validator,
            record,
            expected_errors: expected_errors.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn run(&self) -> SuiteResult {
        self.run_with_reporter(&NullReporter)
    }

    pub fn run_with_reporter(&self, reporter: &dyn Reporter) -> SuiteResult {
        let aggregator = ResultAggregator::new();
        info!(
            "running contract suite '{}': {} case(s)",
            self.name,
            self.cases.len()
        );

        for case in &self.cases {
            reporter.emit(&RunEvent::CaseStarted {
                description: case.description.clone(),
                trials: 1,
                parallel: false,
            });
            let actual = case.validator.validate(&case.record);
            let verdict = if same_errors(&actual, &case.expected_errors) {
                aggregator.record_pass();
                crate::executor::Verdict::Pass
            } else {
                let reason = format!(
                    "contract '{}': expected errors {:?}, got {:?}",
                    case.validator.contract_name(),
                    case.expected_errors,
                    actual
                );
                aggregator.record_fail(
                    case.description.clone(),
                    record_inputs(&case.record),
                    reason.clone(),
                );
                crate::executor::Verdict::Fail { reason }
            };
            reporter.emit(&RunEvent::TrialFinished {
                description: case.description.clone(),
                inputs: record_inputs(&case.record),
                verdict,
            });
        }

        let summary = aggregator.summarize(&self.name);
        let result = aggregator.into_result();
        reporter.emit(&RunEvent::SuiteFinished {
            suite: self.name.clone(),
            summary,
            result: result.clone(),
        });
        reporter.flush();
        result
    }
}

/// Order-insensitive, duplicate-preserving comparison.
fn same_errors(actual: &[String], expected: &[String]) -> bool {
    let mut actual = actual.to_vec();
    let mut expected = expected.to_vec();
    actual.sort();
    expected.sort();
    actual == expected
}

fn record_inputs(record: &Record) -> TrialInputs {
    let mut inputs = TrialInputs::new();
    for (name, value) in record {
        inputs.push(name.clone(), value.clone().into());
    }
    inputs
}
