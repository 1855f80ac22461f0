//! Per-parameter declarations: target type, literal, regex hint, numeric range.

use crate::error::ConfigError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target type of one function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Float,
    String,
    Bool,
    Json,
}

impl ParamType {
    /// Tag used in declarations.
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Bool => "bool",
            ParamType::Json => "json",
        }
    }

    /// Whether the bare type alone is a usable generation strategy.
    ///
    /// Only numeric types can be drawn without a literal, regex, or range.
    pub fn has_bare_default(&self) -> bool {
        matches!(self, ParamType::Int | ParamType::Float)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive numeric bounds. Bounds are JSON numbers, carried as `f64`;
/// integer draws cast them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `min > max`, which registration rejects.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Declarative description of how to produce one function argument.
///
/// All strategy fields may be populated together; generation applies a fixed
/// precedence (literal, then regex, then range, then bare type) and only the
/// highest-precedence populated one governs. See `generator::generate`.
///
/// # Example
///
/// ```ignore
/// let spec = ValueSpec::new("celsius", ParamType::Float).with_range(-100.0, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(
        default,
        rename = "regular_expression",
        skip_serializing_if = "Option::is_none"
    )]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
}

impl ValueSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            value: None,
            regex: None,
            range: None,
        }
    }

    /// Set a literal used verbatim on every trial.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set a regex hint that bounds numeric generation.
    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Set inclusive numeric bounds.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(ValueRange::new(min, max));
        self
    }

    /// Whether this parameter is guaranteed identical on every trial: a
    /// literal with no regex and no range. Any non-static parameter makes its
    /// case fuzz-active.
    pub fn is_static(&self) -> bool {
        self.value.is_some() && self.regex.is_none() && self.range.is_none()
    }

    /// Registration-time checks: non-empty name, a usable strategy, and
    /// non-inverted bounds. `position` is the parameter's index within the
    /// case, used when the name itself is missing.
    pub fn validate(&self, position: usize) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::MissingName { position });
        }
        if let Some(range) = &self.range {
            if range.is_inverted() {
                return Err(ConfigError::InvalidRange {
                    name: self.name.clone(),
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if self.value.is_none()
            && self.regex.is_none()
            && self.range.is_none()
            && !self.ty.has_bare_default()
        {
            return Err(ConfigError::NoStrategy {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_key_names() {
        let json = r#"{
            "name": "ten",
            "type": "float",
            "regular_expression": "^\\d{5}\\.\\d{2}$"
        }"#;
        let spec: ValueSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.name, "ten");
        assert_eq!(spec.ty, ParamType::Float);
        assert_eq!(spec.regex.as_deref(), Some("^\\d{5}\\.\\d{2}$"));
        assert!(spec.value.is_none());
    }

    #[test]
    fn test_range_declaration() {
        let json = r#"{"name": "celsius", "type": "float", "range": {"min": -100, "max": 100}}"#;
        let spec: ValueSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.range, Some(ValueRange::new(-100.0, 100.0)));
        assert!(spec.validate(0).is_ok());
    }

    #[test]
    fn test_missing_name_fails_validation() {
        let spec = ValueSpec::new("", ParamType::Int);
        assert_eq!(
            spec.validate(2),
            Err(ConfigError::MissingName { position: 2 })
        );
    }

    #[test]
    fn test_inverted_range_fails_validation() {
        let spec = ValueSpec::new("celsius", ParamType::Float).with_range(50.0, -50.0);
        assert!(matches!(
            spec.validate(0),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_string_without_strategy_fails_validation() {
        let spec = ValueSpec::new("label", ParamType::String);
        assert_eq!(
            spec.validate(0),
            Err(ConfigError::NoStrategy {
                name: "label".to_string()
            })
        );

        // A literal makes it valid; so does a regex (rejected later, at
        // generation, because string synthesis is out of scope).
        assert!(ValueSpec::new("label", ParamType::String)
            .with_value("x")
            .validate(0)
            .is_ok());
        assert!(ValueSpec::new("label", ParamType::String)
            .with_regex("^x+$")
            .validate(0)
            .is_ok());
    }

    #[test]
    fn test_bare_numeric_types_are_valid() {
        assert!(ValueSpec::new("n", ParamType::Int).validate(0).is_ok());
        assert!(ValueSpec::new("x", ParamType::Float).validate(0).is_ok());
    }

    #[test]
    fn test_static_detection() {
        assert!(ValueSpec::new("a", ParamType::Int).with_value(10).is_static());
        assert!(!ValueSpec::new("a", ParamType::Int).is_static());
        assert!(!ValueSpec::new("a", ParamType::Int)
            .with_value(10)
            .with_range(0.0, 5.0)
            .is_static());
        assert!(!ValueSpec::new("a", ParamType::Int)
            .with_value(10)
            .with_regex("^\\d{3}$")
            .is_static());
    }
}
