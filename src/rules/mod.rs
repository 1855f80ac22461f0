//! Declarative validation rules over JSON records.
//!
//! A rule is one predicate over a record (a JSON object), reporting a
//! human-readable violation when it does not hold. Rules compose into
//! boolean expression trees through [`RuleExt`].

mod datetime;
mod number;
mod string;

pub use datetime::{DateOrderRule, DateTimeFormatRule};
pub use number::NumberRangeRule;
pub use string::{StringChoicesRule, StringLengthRule, StringRegexRule};

use serde_json::Value;

/// A record under validation: one JSON object, fields read by name.
pub type Record = serde_json::Map<String, Value>;

/// One validation predicate.
///
/// `error_message` is consulted only after `is_valid` returned false; it
/// names the field and the violated constraint.
pub trait Rule: Send + Sync {
    fn is_valid(&self, record: &Record) -> bool;

    fn error_message(&self, record: &Record) -> String;
}

/// Combinator sugar over any sized rule.
///
/// # Example
///
/// ```ignore
/// let rule = RequiredRule::new("age").and(NumberRangeRule::new("age").with_min(0.0));
/// assert!(rule.is_valid(&record));
/// ```
pub trait RuleExt: Rule + Sized + 'static {
    fn and<R: Rule + 'static>(self, other: R) -> AndRule {
        AndRule::new(self, other)
    }

    fn or<R: Rule + 'static>(self, other: R) -> OrRule {
        OrRule::new(self, other)
    }

    fn negate(self) -> NotRule {
        NotRule::new(self)
    }
}

impl<T: Rule + Sized + 'static> RuleExt for T {}

/// Both sides must hold. Reports the first failing side.
pub struct AndRule {
    left: Box<dyn Rule>,
    right: Box<dyn Rule>,
}

impl AndRule {
    pub fn new(left: impl Rule + 'static, right: impl Rule + 'static) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Rule for AndRule {
    fn is_valid(&self, record: &Record) -> bool {
        self.left.is_valid(record) && self.right.is_valid(record)
    }

    fn error_message(&self, record: &Record) -> String {
        if !self.left.is_valid(record) {
            self.left.error_message(record)
        } else {
            self.right.error_message(record)
        }
    }
}

/// Either side may hold. Reports both sides when neither does.
pub struct OrRule {
    left: Box<dyn Rule>,
    right: Box<dyn Rule>,
}

impl OrRule {
    pub fn new(left: impl Rule + 'static, right: impl Rule + 'static) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Rule for OrRule {
    fn is_valid(&self, record: &Record) -> bool {
        self.left.is_valid(record) || self.right.is_valid(record)
    }

    fn error_message(&self, record: &Record) -> String {
        format!(
            "Both rules failed: {} OR {}",
            self.left.error_message(record),
            self.right.error_message(record)
        )
    }
}

/// Inverts a rule.
pub struct NotRule {
    inner: Box<dyn Rule>,
}

impl NotRule {
    pub fn new(inner: impl Rule + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Rule for NotRule {
    fn is_valid(&self, record: &Record) -> bool {
        !self.inner.is_valid(record)
    }

    fn error_message(&self, _record: &Record) -> String {
        "Rule should not have been valid".to_string()
    }
}

/// The field must be present and non-null.
pub struct RequiredRule {
    field: String,
}

impl RequiredRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Rule for RequiredRule {
    fn is_valid(&self, record: &Record) -> bool {
        matches!(record.get(&self.field), Some(value) if !value.is_null())
    }

    fn error_message(&self, _record: &Record) -> String {
        format!("Field '{}' is required", self.field)
    }
}

/// The field must hold a JSON integer.
pub struct IntegerRule {
    field: String,
}

impl IntegerRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Rule for IntegerRule {
    fn is_valid(&self, record: &Record) -> bool {
        matches!(record.get(&self.field), Some(value) if value.is_i64() || value.is_u64())
    }

    fn error_message(&self, _record: &Record) -> String {
        format!("Field '{}' must be an integer", self.field)
    }
}

/// The field must hold a JSON number with a fractional representation.
pub struct FloatRule {
    field: String,
}

impl FloatRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Rule for FloatRule {
    fn is_valid(&self, record: &Record) -> bool {
        matches!(record.get(&self.field), Some(value) if value.is_f64())
    }

    fn error_message(&self, _record: &Record) -> String {
        format!("Field '{}' must be a float", self.field)
    }
}

/// The field must hold a JSON boolean.
pub struct BooleanRule {
    field: String,
}

impl BooleanRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Rule for BooleanRule {
    fn is_valid(&self, record: &Record) -> bool {
        matches!(record.get(&self.field), Some(value) if value.is_boolean())
    }

    fn error_message(&self, _record: &Record) -> String {
        format!("Field '{}' must be a boolean", self.field)
    }
}

/// The field must hold a string that parses as JSON.
pub struct JsonTextRule {
    field: String,
}

impl JsonTextRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Rule for JsonTextRule {
    fn is_valid(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .and_then(Value::as_str)
            .map(|text| serde_json::from_str::<Value>(text).is_ok())
            .unwrap_or(false)
    }

    fn error_message(&self, _record: &Record) -> String {
        format!("Field '{}' must contain valid JSON", self.field)
    }
}

#[cfg(test)]
pub(crate) fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_rule() {
        let rule = RequiredRule::new("age");
        assert!(rule.is_valid(&record(json!({"age": 30}))));
        assert!(!rule.is_valid(&record(json!({"name": "John"}))));
        assert!(!rule.is_valid(&record(json!({"age": null}))));
        assert_eq!(
            rule.error_message(&record(json!({}))),
            "Field 'age' is required"
        );
    }

    #[test]
    fn test_type_rules_distinguish_json_number_forms() {
        let data = record(json!({"count": 3, "ratio": 0.5, "flag": true}));
        assert!(IntegerRule::new("count").is_valid(&data));
        assert!(!IntegerRule::new("ratio").is_valid(&data));
        assert!(FloatRule::new("ratio").is_valid(&data));
        assert!(!FloatRule::new("count").is_valid(&data));
        assert!(BooleanRule::new("flag").is_valid(&data));
        assert!(!BooleanRule::new("count").is_valid(&data));
    }

    #[test]
    fn test_json_text_rule() {
        let rule = JsonTextRule::new("payload");
        assert!(rule.is_valid(&record(json!({"payload": "{\"a\": 1}"}))));
        assert!(rule.is_valid(&record(json!({"payload": "[1, 2]"}))));
        assert!(!rule.is_valid(&record(json!({"payload": "not json {"}))));
        assert!(!rule.is_valid(&record(json!({"payload": 7}))));
    }

    #[test]
    fn test_and_reports_first_failing_side() {
        let rule = RequiredRule::new("age").and(IntegerRule::new("age"));
        let missing = record(json!({}));
        assert!(!rule.is_valid(&missing));
        assert_eq!(rule.error_message(&missing), "Field 'age' is required");

        let wrong_type = record(json!({"age": "thirty"}));
        assert!(!rule.is_valid(&wrong_type));
        assert_eq!(
            rule.error_message(&wrong_type),
            "Field 'age' must be an integer"
        );
    }

    #[test]
    fn test_or_passes_when_either_side_passes() {
        let rule = IntegerRule::new("id").or(StringLengthRule::new("id").with_min(1));
        assert!(rule.is_valid(&record(json!({"id": 42}))));
        assert!(rule.is_valid(&record(json!({"id": "abc"}))));

        let neither = record(json!({"id": true}));
        assert!(!rule.is_valid(&neither));
        let message = rule.error_message(&neither);
        assert!(message.starts_with("Both rules failed:"));
        assert!(message.contains("must be an integer"));
    }

    #[test]
    fn test_negate() {
        let rule = RequiredRule::new("deleted_at").negate();
        assert!(rule.is_valid(&record(json!({}))));
        assert!(!rule.is_valid(&record(json!({"deleted_at": "2024-01-01"}))));
    }
}
