//! Declared test cases and their JSON declaration format.

use crate::error::ConfigError;
use crate::fault::FaultKind;
use crate::spec::ValueSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Trial count used when a declaration does not set one.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Declared expectation that the target faults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedFault {
    pub kind: FaultKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_substring: Option<String>,
}

impl ExpectedFault {
    pub fn new(kind: FaultKind) -> Self {
        Self {
            kind,
            message_substring: None,
        }
    }

    /// Require the fault message to contain `substring`.
    pub fn with_message(mut self, substring: impl Into<String>) -> Self {
        self.message_substring = Some(substring.into());
        self
    }
}

/// One declared test case: a named target, per-parameter value specs, an
/// optional fault expectation, and an iteration budget.
///
/// Immutable once registered; trials read it, never mutate it.
///
/// # Example
///
/// ```ignore
/// let case = TestCase::new("divide", "division by zero is reported")
///     .with_input(ValueSpec::new("a", ParamType::Int).with_value(10))
///     .with_input(ValueSpec::new("b", ParamType::Int).with_value(0))
///     .with_expected_fault(
///         ExpectedFault::new(FaultKind::DivisionByZero).with_message("division by zero"),
///     );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CaseDecl", into = "CaseDecl")]
pub struct TestCase {
    pub description: String,
    /// Registry name of the function under test.
    pub target: String,
    pub inputs: Vec<ValueSpec>,
    pub expected_fault: Option<ExpectedFault>,
    pub iterations: usize,
    pub enabled: bool,
}

impl TestCase {
    pub fn new(target: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            target: target.into(),
            inputs: Vec::new(),
            expected_fault: None,
            iterations: DEFAULT_ITERATIONS,
            enabled: true,
        }
    }

    /// Append one parameter spec. Declaration order is the rendering order.
    pub fn with_input(mut self, spec: ValueSpec) -> Self {
        self.inputs.push(spec);
        self
    }

    pub fn with_expected_fault(mut self, expected: ExpectedFault) -> Self {
        self.expected_fault = Some(expected);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// A case fuzzes when any parameter can vary between trials: one of its
    /// specs lacks a literal, or declares a regex or range.
    pub fn is_fuzz_active(&self) -> bool {
        self.inputs.iter().any(|spec| !spec.is_static())
    }

    /// Trials the scheduler will run: `iterations` when fuzz-active, exactly
    /// one otherwise.
    pub fn planned_trials(&self) -> usize {
        if self.is_fuzz_active() {
            self.iterations
        } else {
            1
        }
    }

    /// Registration-time validation: per-parameter checks, unique names, and
    /// a positive iteration count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::InvalidIterations);
        }
        let mut seen = HashSet::new();
        for (position, spec) in self.inputs.iter().enumerate() {
            spec.validate(position)?;
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateParam {
                    name: spec.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Wire shape of a case declaration. The fault expectation is two flat keys,
/// and an empty `exception` string means "no expectation".
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CaseDecl {
    #[serde(default = "default_enabled")]
    enabled: bool,
    function_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input: Vec<ValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exception: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exception_message: Option<String>,
    #[serde(default = "default_iterations")]
    iterations: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

impl TryFrom<CaseDecl> for TestCase {
    type Error = ConfigError;

    fn try_from(decl: CaseDecl) -> Result<Self, Self::Error> {
        let expected_fault = match decl.exception.as_deref() {
            None | Some("") => None,
            Some(name) => {
                let kind: FaultKind = name.parse()?;
                Some(ExpectedFault {
                    kind,
                    message_substring: decl
                        .exception_message
                        .filter(|substring| !substring.is_empty()),
                })
            }
        };
        Ok(TestCase {
            description: decl.description,
            target: decl.function_name,
            inputs: decl.input,
            expected_fault,
            iterations: decl.iterations,
            enabled: decl.enabled,
        })
    }
}

impl From<TestCase> for CaseDecl {
    fn from(case: TestCase) -> Self {
        CaseDecl {
            enabled: case.enabled,
            function_name: case.target,
            description: case.description,
            input: case.inputs,
            exception: case
                .expected_fault
                .as_ref()
                .map(|f| f.kind.name().to_string()),
            exception_message: case.expected_fault.and_then(|f| f.message_substring),
            iterations: case.iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ParamType;

    #[test]
    fn test_declaration_parses_with_all_keys() {
        let json = r#"{
            "enabled": true,
            "function_name": "divide",
            "description": "division by zero is reported",
            "input": [
                {"name": "a", "type": "int", "value": 10},
                {"name": "b", "type": "int", "value": 0}
            ],
            "exception": "division_by_zero",
            "exception_message": "division by zero",
            "iterations": 1
        }"#;
        let case: TestCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.target, "divide");
        assert_eq!(case.inputs.len(), 2);
        assert_eq!(
            case.expected_fault,
            Some(
                ExpectedFault::new(FaultKind::DivisionByZero).with_message("division by zero")
            )
        );
        assert_eq!(case.iterations, 1);
        assert!(case.enabled);
    }

    #[test]
    fn test_declaration_defaults() {
        let json = r#"{"function_name": "convert"}"#;
        let case: TestCase = serde_json::from_str(json).unwrap();
        assert!(case.enabled);
        assert_eq!(case.iterations, DEFAULT_ITERATIONS);
        assert!(case.inputs.is_empty());
        assert!(case.expected_fault.is_none());
    }

    #[test]
    fn test_empty_exception_string_means_none() {
        let json = r#"{"function_name": "f", "exception": "", "exception_message": "ignored"}"#;
        let case: TestCase = serde_json::from_str(json).unwrap();
        assert!(case.expected_fault.is_none());
    }

    #[test]
    fn test_unknown_exception_kind_is_rejected() {
        let json = r#"{"function_name": "f", "exception": "ZeroDivisionError"}"#;
        let err = serde_json::from_str::<TestCase>(json).unwrap_err();
        assert!(err.to_string().contains("unknown fault kind"));
    }

    #[test]
    fn test_declaration_round_trip() {
        let case = TestCase::new("divide", "round trip")
            .with_input(ValueSpec::new("a", ParamType::Int).with_value(10))
            .with_expected_fault(ExpectedFault::new(FaultKind::Panic))
            .with_iterations(7)
            .with_enabled(false);
        let json = serde_json::to_string(&case).unwrap();
        assert!(json.contains("\"function_name\":\"divide\""));
        assert!(json.contains("\"exception\":\"panic\""));
        let back: TestCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);
    }

    #[test]
    fn test_fuzz_activation() {
        let case = TestCase::new("f", "static")
            .with_input(ValueSpec::new("a", ParamType::Int).with_value(1))
            .with_input(ValueSpec::new("s", ParamType::String).with_value("x"));
        assert!(!case.is_fuzz_active());
        assert_eq!(case.planned_trials(), 1);

        let case = TestCase::new("f", "bare param")
            .with_input(ValueSpec::new("a", ParamType::Int))
            .with_iterations(50);
        assert!(case.is_fuzz_active());
        assert_eq!(case.planned_trials(), 50);

        let case = TestCase::new("f", "literal plus range")
            .with_input(ValueSpec::new("a", ParamType::Int).with_value(1).with_range(0.0, 9.0));
        assert!(case.is_fuzz_active());

        let case = TestCase::new("f", "no inputs");
        assert!(!case.is_fuzz_active());
        assert_eq!(case.planned_trials(), 1);
    }

    #[test]
    fn test_validation_catches_duplicates_and_zero_iterations() {
        let case = TestCase::new("f", "dupes")
            .with_input(ValueSpec::new("a", ParamType::Int))
            .with_input(ValueSpec::new("a", ParamType::Float));
        assert_eq!(
            case.validate(),
            Err(ConfigError::DuplicateParam {
                name: "a".to_string()
            })
        );

        let case = TestCase::new("f", "zero iterations").with_iterations(0);
        assert_eq!(case.validate(), Err(ConfigError::InvalidIterations));
    }

    #[test]
    fn test_validation_propagates_spec_errors() {
        let case = TestCase::new("f", "inverted")
            .with_input(ValueSpec::new("n", ParamType::Int).with_range(9.0, 1.0));
        assert!(matches!(
            case.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));
    }
}
