//! Suite orchestration.
//!
//! A suite holds cases in registration order and runs them strictly one after
//! another; only trials within a single case fan out to worker threads. A
//! case-level configuration fault is recorded against that case and the run
//! moves on, so a suite always completes and always yields a summary.

use crate::aggregator::{ResultAggregator, SuiteResult};
use crate::case::TestCase;
use crate::config::RunConfig;
use crate::error::ConfigError;
use crate::registry::TargetRegistry;
use crate::report::{NullReporter, Reporter, RunEvent};
use crate::scheduler::FuzzScheduler;
use tracing::{info, warn};

/// An ordered collection of cases sharing one run configuration.
///
/// # Example
///
/// ```ignore
/// let mut registry = TargetRegistry::new();
/// registry.register("divide", |inputs| { /* ... */ });
///
/// let mut suite = Suite::new("arithmetic");
/// suite.add(divide_case)?;
/// let result = suite.run(&registry)?;
/// assert!(result.is_success());
/// ```
#[derive(Debug)]
pub struct Suite {
    name: String,
    config: RunConfig,
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: RunConfig::default(),
            cases: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Register a case, validating its declaration first.
    ///
    /// Validation is fail-fast: the first problem is returned and the case is
    /// not registered. Disabled cases register normally; they are recorded and
    /// skipped at run time.
    pub fn add(&mut self, case: TestCase) -> Result<&mut Self, ConfigError> {
        case.validate()?;
        self.cases.push(case);
        Ok(self)
    }

    /// Register a case from its JSON declaration.
    pub fn add_json(&mut self, declaration: &str) -> Result<&mut Self, ConfigError> {
        let case: TestCase = serde_json::from_str(declaration)
            .map_err(|e| ConfigError::Declaration(e.to_string()))?;
        self.add(case)
    }

    /// Run every registered case and return the aggregated result.
    ///
    /// The only error this returns is a worker pool construction failure;
    /// per-case configuration faults are folded into the result instead.
    pub fn run(&self, registry: &TargetRegistry) -> Result<SuiteResult, ConfigError> {
        self.run_with_reporter(registry, &NullReporter)
    }

    /// Run every registered case, emitting progress through `reporter`.
    pub fn run_with_reporter(
        &self,
        registry: &TargetRegistry,
        reporter: &dyn Reporter,
    ) -> Result<SuiteResult, ConfigError> {
        let scheduler = FuzzScheduler::new(self.config.clone())?;
        let aggregator = ResultAggregator::new();
        info!("running suite '{}': {} case(s)", self.name, self.cases.len());

        for case in &self.cases {
            if !case.enabled {
                info!("skipping disabled case '{}'", case.description);
                aggregator.record_skipped(case.description.clone());
                reporter.emit(&RunEvent::CaseSkipped {
                    description: case.description.clone(),
                });
                continue;
            }

            let target = match registry.get(&case.target) {
                Some(target) => target,
                None => {
                    let error = ConfigError::UnknownTarget {
                        name: case.target.clone(),
                    };
                    self.record_case_fault(case, error, &aggregator, reporter);
                    continue;
                }
            };

            if let Err(error) = scheduler.run_case(case, target, &aggregator, reporter) {
                self.record_case_fault(case, error, &aggregator, reporter);
            }
        }

        let summary = aggregator.summarize(&self.name);
        let result = aggregator.into_result();
        reporter.emit(&RunEvent::SuiteFinished {
            suite: self.name.clone(),
            summary,
            result: result.clone(),
        });
        reporter.flush();
        Ok(result)
    }

    fn record_case_fault(
        &self,
        case: &TestCase,
        error: ConfigError,
        aggregator: &ResultAggregator,
        reporter: &dyn Reporter,
    ) {
        warn!("case '{}' aborted: {}", case.description, error);
        aggregator.record_case_fault(case.description.clone(), &error);
        reporter.emit(&RunEvent::CaseFaulted {
            description: case.description.clone(),
            error: error.to_string(),
        });
    }
}
