//! Numeric field rules.

use super::{Record, Rule};
use serde_json::Value;

fn number_field(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_f64)
}

/// The field must be a number within the inclusive bounds.
///
/// Either bound may be omitted; integers and floats are both accepted.
pub struct NumberRangeRule {
    field: String,
    min_value: Option<f64>,
    max_value: Option<f64>,
}

impl NumberRangeRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            min_value: None,
            max_value: None,
        }
    }

    pub fn with_min(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn with_max(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }
}

impl Rule for NumberRangeRule {
    fn is_valid(&self, record: &Record) -> bool {
        let Some(value) = number_field(record, &self.field) else {
            return false;
        };
        if let Some(min) = self.min_value {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max_value {
            if value > max {
                return false;
            }
        }
        true
    }

    fn error_message(&self, record: &Record) -> String {
        if number_field(record, &self.field).is_none() {
            return format!("Field '{}' must be a number", self.field);
        }
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => format!(
                "Field '{}' must be between {} and {}",
                self.field, min, max
            ),
            (Some(min), None) => format!("Field '{}' must be at least {}", self.field, min),
            (None, Some(max)) => format!("Field '{}' must be at most {}", self.field, max),
            (None, None) => format!("Field '{}' must be a number", self.field),
        }
    }
}
