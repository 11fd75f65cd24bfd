//! Stored cell values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::column::ValueKind;

pub(crate) const DATE_ISO: &str = "%Y-%m-%d";
pub(crate) const DATETIME_ISO: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub(crate) const DATETIME_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// A domain value stored in a row.
///
/// Enum columns store their option value as `Text`. Composite values keep
/// their raw JSON items; only their count is ever displayed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<serde_json::Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Build a value from JSON, coercing strings by column kind.
    ///
    /// Strings that don't parse for a date or number column are kept as text
    /// so loading never loses data.
    pub fn from_json(json: &serde_json::Value, kind: ValueKind) -> Value {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            Json::String(s) => match kind {
                ValueKind::Date => parse_iso_date(s).map(Value::Date).unwrap_or_else(|| Value::Text(s.clone())),
                ValueKind::DateTime => parse_iso_datetime(s).map(Value::DateTime).unwrap_or_else(|| Value::Text(s.clone())),
                ValueKind::Number => s.trim().parse::<f64>().ok()
                    .filter(|n| n.is_finite())
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::Text(s.clone())),
                _ => Value::Text(s.clone()),
            },
            Json::Array(items) => Value::List(items.clone()),
            Json::Object(_) => Value::Text(json.to_string()),
        }
    }

    /// Plain JSON form: dates as ISO strings, lists as arrays.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Text(s) => Json::String(s.clone()),
            Value::Number(n) => serde_json::Number::from_f64(*n).map(Json::Number).unwrap_or(Json::Null),
            Value::Bool(b) => Json::Bool(*b),
            Value::Date(d) => Json::String(d.format(DATE_ISO).to_string()),
            Value::DateTime(dt) => Json::String(dt.format(DATETIME_ISO).to_string()),
            Value::List(items) => Json::Array(items.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

/// Parse `YYYY-MM-DD`, an ISO datetime or an RFC 3339 timestamp down to a date.
pub(crate) fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_ISO)
        .ok()
        .or_else(|| parse_iso_datetime(s).map(|dt| dt.date()))
}

/// Parse an ISO datetime (with or without seconds) or an RFC 3339 timestamp (as UTC).
pub(crate) fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_ISO)
        .or_else(|_| NaiveDateTime::parse_from_str(s, DATETIME_MINUTES))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}
