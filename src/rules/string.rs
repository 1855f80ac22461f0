//! String field rules.

use super::{Record, Rule};
use regex::Regex;
use serde_json::Value;

fn string_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// The field must be a string whose character count lies within the bounds.
pub struct StringLengthRule {
    field: String,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl StringLengthRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            min_length: None,
            max_length: None,
        }
    }

    pub fn with_min(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl Rule for StringLengthRule {
    fn is_valid(&self, record: &Record) -> bool {
        let Some(value) = string_field(record, &self.field) else {
            return false;
        };
        let length = value.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                return false;
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return false;
            }
        }
        true
    }

    fn error_message(&self, record: &Record) -> String {
        if string_field(record, &self.field).is_none() {
            return format!("Field '{}' must be a string", self.field);
        }
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) => format!(
                "Field '{}' must be between {} and {} characters long",
                self.field, min, max
            ),
            (Some(min), None) => format!(
                "Field '{}' must be at least {} characters long",
                self.field, min
            ),
            (None, Some(max)) => format!(
                "Field '{}' must be at most {} characters long",
                self.field, max
            ),
            (None, None) => format!("Field '{}' must be a string", self.field),
        }
    }
}

/// The field must be a string fully matching the pattern.
pub struct StringRegexRule {
    field: String,
    pattern: String,
    regex: Regex,
}

impl StringRegexRule {
    /// The pattern is anchored at both ends, so it must cover the whole value.
    pub fn new(field: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            field: field.into(),
            pattern: pattern.to_string(),
            regex,
        })
    }
}

impl Rule for StringRegexRule {
    fn is_valid(&self, record: &Record) -> bool {
        string_field(record, &self.field)
            .map(|value| self.regex.is_match(value))
            .unwrap_or(false)
    }

    fn error_message(&self, record: &Record) -> String {
        if string_field(record, &self.field).is_none() {
            return format!("Field '{}' must be a string", self.field);
        }
        format!(
            "Field '{}' must match the regular expression: {}",
            self.field, self.pattern
        )
    }
}

/// The field must be one of a fixed set of strings.
pub struct StringChoicesRule {
    field: String,
    choices: Vec<String>,
}

impl StringChoicesRule {
    pub fn new<I, S>(field: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for StringChoicesRule {
    fn is_valid(&self, record: &Record) -> bool {
        string_field(record, &self.field)
            .map(|value| self.choices.iter().any(|choice| choice == value))
            .unwrap_or(false)
    }

    fn error_message(&self, record: &Record) -> String {
        if string_field(record, &self.field).is_none() {
            return format!("Field '{}' must be a string", self.field);
        }
        format!(
            "Field '{}' must be one of the following choices: {:?}",
            self.field, self.choices
        )
    }
}
