//! Date and time field rules.

use super::{Record, Rule};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Parse a record field as a timestamp.
///
/// Accepts RFC 3339, ISO 8601 without offset (either `T` or space
/// separated), and bare dates, which resolve to midnight.
fn datetime_field(record: &Record, field: &str) -> Option<NaiveDateTime> {
    let text = record.get(field).and_then(Value::as_str)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

/// The field must be a string parseable with the given strftime format.
pub struct DateTimeFormatRule {
    field: String,
    format: String,
}

impl DateTimeFormatRule {
    pub fn new(field: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            format: format.into(),
        }
    }

    fn parses(&self, text: &str) -> bool {
        NaiveDateTime::parse_from_str(text, &self.format).is_ok()
            || NaiveDate::parse_from_str(text, &self.format).is_ok()
    }
}

impl Rule for DateTimeFormatRule {
    fn is_valid(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .and_then(Value::as_str)
            .map(|text| self.parses(text))
            .unwrap_or(false)
    }

    fn error_message(&self, record: &Record) -> String {
        if record.get(&self.field).and_then(Value::as_str).is_none() {
            return format!("Field '{}' must be a datetime string", self.field);
        }
        format!(
            "Field '{}' must be in the format: {}",
            self.field, self.format
        )
    }
}

/// One timestamp field must be strictly after another.
pub struct DateOrderRule {
    earlier_field: String,
    later_field: String,
}

impl DateOrderRule {
    pub fn new(earlier_field: impl Into<String>, later_field: impl Into<String>) -> Self {
        Self {
            earlier_field: earlier_field.into(),
            later_field: later_field.into(),
        }
    }
}

impl Rule for DateOrderRule {
    fn is_valid(&self, record: &Record) -> bool {
        match (
            datetime_field(record, &self.earlier_field),
            datetime_field(record, &self.later_field),
        ) {
            (Some(earlier), Some(later)) => later > earlier,
            _ => false,
        }
    }

    fn error_message(&self, record: &Record) -> String {
        let earlier = datetime_field(record, &self.earlier_field);
        let later = datetime_field(record, &self.later_field);
        if earlier.is_none() || later.is_none() {
            return format!(
                "Fields '{}' and '{}' must be datetime strings",
                self.earlier_field, self.later_field
            );
        }
        format!(
            "Field '{}' must be after '{}'",
            self.later_field, self.earlier_field
        )
    }
}
