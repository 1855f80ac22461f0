//! Per-case trial fan-out.
//!
//! A fuzz-active case runs `iterations` randomized trials, optionally on a
//! bounded worker pool; a fully static case runs exactly one trial. Cases are
//! never run concurrently with each other: `run_case` returns only after all
//! of the case's trials have been recorded.
//!
//! There is no timeout enforcement. A target that never returns keeps its
//! worker (or the calling thread) forever.

use crate::aggregator::ResultAggregator;
use crate::case::TestCase;
use crate::config::RunConfig;
use crate::error::ConfigError;
use crate::executor::{self, TrialOutcome, Verdict};
use crate::registry::TargetFn;
use crate::report::{Reporter, RunEvent};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Decides per case how many trials to run and how to fan them out.
pub struct FuzzScheduler {
    config: RunConfig,
    pool: Option<rayon::ThreadPool>,
}

impl FuzzScheduler {
    /// Build the scheduler, creating the worker pool when parallel execution
    /// is configured.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let pool = if config.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .build()
                .map_err(|e| ConfigError::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every trial of one case, recording each verdict.
    ///
    /// A configuration fault (unsupported strategy, inverted range) aborts
    /// the case and is returned; trial failures are recorded, never returned.
    pub fn run_case(
        &self,
        case: &TestCase,
        target: &TargetFn,
        aggregator: &ResultAggregator,
        reporter: &dyn Reporter,
    ) -> Result<(), ConfigError> {
        let trials = case.planned_trials();
        let parallel = self.pool.is_some() && trials > 1;
        debug!(
            "scheduling '{}': {} trial(s), fuzz_active={}, parallel={}",
            case.description,
            trials,
            case.is_fuzz_active(),
            parallel
        );
        reporter.emit(&RunEvent::CaseStarted {
            description: case.description.clone(),
            trials,
            parallel,
        });

        match &self.pool {
            Some(pool) if trials > 1 => {
                self.run_parallel(pool, case, target, aggregator, reporter, trials)
            }
            _ => self.run_sequential(case, target, aggregator, reporter, trials),
        }
    }

    fn run_sequential(
        &self,
        case: &TestCase,
        target: &TargetFn,
        aggregator: &ResultAggregator,
        reporter: &dyn Reporter,
        trials: usize,
    ) -> Result<(), ConfigError> {
        for _ in 0..trials {
            let outcome = executor::run_trial(case, target)?;
            record_verdict(case, outcome, aggregator, reporter);
        }
        Ok(())
    }

    fn run_parallel(
        &self,
        pool: &rayon::ThreadPool,
        case: &TestCase,
        target: &TargetFn,
        aggregator: &ResultAggregator,
        reporter: &dyn Reporter,
        trials: usize,
    ) -> Result<(), ConfigError> {
        let config_fault: Mutex<Option<ConfigError>> = Mutex::new(None);
        let aborted = AtomicBool::new(false);

        pool.scope(|s| {
            for _ in 0..trials {
                let config_fault = &config_fault;
                let aborted = &aborted;

                s.spawn(move |_| {
                    if aborted.load(Ordering::Relaxed) {
                        return;
                    }
                    match executor::run_trial(case, target) {
                        Ok(outcome) => record_verdict(case, outcome, aggregator, reporter),
                        Err(error) => {
                            // Configuration faults are deterministic per
                            // case; keep the first and stop scheduling.
                            aborted.store(true, Ordering::Relaxed);
                            let mut slot = config_fault.lock();
                            if slot.is_none() {
                                *slot = Some(error);
                            }
                        }
                    }
                });
            }
        });

        match config_fault.into_inner() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn record_verdict(
    case: &TestCase,
    outcome: TrialOutcome,
    aggregator: &ResultAggregator,
    reporter: &dyn Reporter,
) {
    let verdict = executor::judge(case, &outcome);
    match &verdict {
        Verdict::Pass => aggregator.record_pass(),
        Verdict::Fail { reason } => {
            aggregator.record_fail(case.description.clone(), outcome.inputs.clone(), reason.clone())
        }
    }
    reporter.emit(&RunEvent::TrialFinished {
        description: case.description.clone(),
        inputs: outcome.inputs,
        verdict,
    });
}
