//! Programmable fuzz harness and declarative data validation.
//!
//! This crate provides tools for:
//! - Declaring per-parameter value specifications (literal, regex-derived,
//!   range, or bare type) and generating concrete arguments from them
//! - Running many randomized trials per test case, sequentially or on a
//!   bounded worker pool, with fault-centric pass/fail judging
//! - Aggregating trial verdicts into an exact, thread-safe summary
//! - Validating JSON records against composable rule trees and contracts

mod aggregator;
mod case;
mod config;
mod contract;
mod error;
mod executor;
mod fault;
mod generator;
mod registry;
mod report;
mod scheduler;
mod spec;
mod suite;
mod value;

pub mod rules;

pub use aggregator::{CaseFault, FailureRecord, ResultAggregator, SuiteResult};
pub use case::{ExpectedFault, TestCase, DEFAULT_ITERATIONS};
pub use config::RunConfig;
pub use contract::{ContractSuite, DataContract, RuleSetContract, Validator};
pub use error::ConfigError;
pub use executor::{TrialOutcome, Verdict};
pub use fault::{Fault, FaultKind, UnknownFaultKind};
pub use generator::{generate, generate_with_rng};
pub use registry::{TargetFn, TargetRegistry};
pub use report::{ConsoleReporter, NullReporter, Reporter, RunEvent};
pub use scheduler::FuzzScheduler;
pub use spec::{ParamType, ValueRange, ValueSpec};
pub use suite::Suite;
pub use value::{TrialInputs, Value};
