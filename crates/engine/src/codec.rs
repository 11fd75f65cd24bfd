//! Value codec: stored value <-> input representation <-> display text.
//!
//! Display text is also the clipboard text, so everything `to_display`
//! produces for a column must be accepted back by `to_stored`.
//!
//! Parsing never fails loudly. Text that can't be converted to the column's
//! kind yields the previous stored value, so a bad edit or paste is simply
//! discarded.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::column::{ColumnDescriptor, ValueKind};
use crate::value::{parse_iso_date, parse_iso_datetime, Value, DATETIME_ISO, DATETIME_MINUTES, DATE_ISO};

/// Value shaped for the cell's input control.
#[derive(Debug, Clone, PartialEq)]
pub enum EditValue {
    /// Text-like inputs (text, number, date, select, textarea)
    Text(String),
    /// Checkbox input
    Checked(bool),
}

impl EditValue {
    pub fn text(s: impl Into<String>) -> Self {
        EditValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EditValue::Text(s) => Some(s),
            EditValue::Checked(_) => None,
        }
    }

    /// Append typed input. A checkbox toggles on space and ignores other keys.
    pub fn push_char(&mut self, c: char) {
        match self {
            EditValue::Text(s) => s.push(c),
            EditValue::Checked(b) if c == ' ' => *b = !*b,
            EditValue::Checked(_) => {}
        }
    }

    pub fn pop_char(&mut self) {
        if let EditValue::Text(s) = self {
            s.pop();
        }
    }
}

impl Default for EditValue {
    fn default() -> Self {
        EditValue::Text(String::new())
    }
}

/// Locale conventions for display text.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLocale {
    pub yes: String,
    pub no: String,
    /// Digit grouping separator (None = no grouping)
    pub thousands_separator: Option<char>,
    pub decimal_separator: char,
    /// chrono format string for dates
    pub date_format: String,
    /// Noun used in the `<n> items` summary of composite values
    pub items_noun: String,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self {
            yes: "Yes".to_string(),
            no: "No".to_string(),
            thousands_separator: Some(','),
            decimal_separator: '.',
            date_format: "%-m/%-d/%Y".to_string(),
            items_noun: "items".to_string(),
        }
    }
}

/// Maximum fraction digits shown for numbers.
const DISPLAY_FRACTION_DIGITS: i32 = 3;

#[derive(Debug, Clone, Default)]
pub struct ValueCodec {
    locale: DisplayLocale,
}

impl ValueCodec {
    pub fn new(locale: DisplayLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &DisplayLocale {
        &self.locale
    }

    /// Display and clipboard text for a stored value.
    pub fn to_display(&self, value: &Value, column: &ColumnDescriptor) -> String {
        if let Some(formatter) = column.formatter() {
            return formatter(value);
        }

        match value {
            Value::Null => String::new(),
            Value::List(items) => format!("{} {}", items.len(), self.locale.items_noun),
            Value::Bool(b) => if *b { self.locale.yes.clone() } else { self.locale.no.clone() },
            Value::Date(d) => self.format_date(*d),
            Value::DateTime(dt) => self.format_date(dt.date()),
            Value::Number(n) => self.format_number(*n),
            Value::Text(s) => match column.kind() {
                ValueKind::Enum => column
                    .options()
                    .iter()
                    .find(|o| &o.value == s)
                    .map(|o| o.label.clone())
                    .unwrap_or_else(|| s.clone()),
                _ => s.clone(),
            },
        }
    }

    /// Shape a stored value for the column's input control.
    ///
    /// Absent or unconvertible values give the input's empty default.
    pub fn to_editable(&self, value: &Value, column: &ColumnDescriptor) -> EditValue {
        match column.kind() {
            ValueKind::Boolean => EditValue::Checked(match value {
                Value::Bool(b) => *b,
                Value::Number(n) => *n != 0.0,
                Value::Text(s) => self.parse_bool(s).unwrap_or(false),
                _ => false,
            }),
            ValueKind::Date => EditValue::Text(match value {
                Value::Date(d) => d.format(DATE_ISO).to_string(),
                Value::DateTime(dt) => dt.date().format(DATE_ISO).to_string(),
                Value::Text(s) => self.parse_date(s).map(|d| d.format(DATE_ISO).to_string()).unwrap_or_default(),
                _ => String::new(),
            }),
            ValueKind::DateTime => EditValue::Text(match value {
                Value::DateTime(dt) => datetime_input(*dt),
                Value::Date(d) => d.and_hms_opt(0, 0, 0).map(datetime_input).unwrap_or_default(),
                Value::Text(s) => parse_iso_datetime(s).map(datetime_input).unwrap_or_default(),
                _ => String::new(),
            }),
            ValueKind::Number => EditValue::Text(match value {
                Value::Number(n) => n.to_string(),
                Value::Text(s) => s.clone(),
                _ => String::new(),
            }),
            ValueKind::Enum => EditValue::Text(match value {
                Value::Text(s) => column
                    .options()
                    .iter()
                    .find(|o| &o.value == s)
                    .map_or_else(|| s.clone(), |o| o.label.clone()),
                Value::Null | Value::List(_) => String::new(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Date(d) => d.format(DATE_ISO).to_string(),
                Value::DateTime(dt) => datetime_input(*dt),
            }),
            ValueKind::Text | ValueKind::Composite => EditValue::Text(match value {
                Value::Null | Value::List(_) => String::new(),
                Value::Text(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Date(d) => d.format(DATE_ISO).to_string(),
                Value::DateTime(dt) => datetime_input(*dt),
            }),
        }
    }

    /// Convert edited input back to a stored value.
    ///
    /// Falls back to `previous` whenever the input doesn't parse.
    pub fn to_stored(&self, edited: &EditValue, column: &ColumnDescriptor, previous: &Value) -> Value {
        let text = match edited {
            EditValue::Checked(b) if column.kind() == ValueKind::Boolean && column.parser().is_none() => {
                return Value::Bool(*b);
            }
            EditValue::Checked(b) => b.to_string(),
            EditValue::Text(s) => s.clone(),
        };

        if let Some(parser) = column.parser() {
            return parser(&text, previous);
        }

        let fallback = || previous.clone();
        match column.kind() {
            ValueKind::Text => {
                if text.is_empty() && previous.is_null() {
                    Value::Null
                } else {
                    Value::Text(text)
                }
            }
            ValueKind::Number => self.parse_number(&text).map(Value::Number).unwrap_or_else(fallback),
            ValueKind::Boolean => self.parse_bool(&text).map(Value::Bool).unwrap_or_else(fallback),
            ValueKind::Date => {
                if text.trim().is_empty() {
                    Value::Null
                } else {
                    self.parse_date(&text).map(Value::Date).unwrap_or_else(fallback)
                }
            }
            ValueKind::DateTime => {
                if text.trim().is_empty() {
                    Value::Null
                } else {
                    self.parse_datetime(&text).map(Value::DateTime).unwrap_or_else(fallback)
                }
            }
            ValueKind::Enum => {
                if text.trim().is_empty() {
                    Value::Null
                } else {
                    column
                        .option_for(&text)
                        .map(|o| Value::Text(o.value.clone()))
                        .unwrap_or_else(fallback)
                }
            }
            ValueKind::Composite => fallback(),
        }
    }

    /// Grouped number with up to three fraction digits (e.g. `4,368,989`, `1,234.5`).
    pub fn format_number(&self, n: f64) -> String {
        if !n.is_finite() {
            return n.to_string();
        }

        let scale = 10f64.powi(DISPLAY_FRACTION_DIGITS);
        let scaled = n * scale;
        // Near f64::MAX the scaled value overflows; such numbers have no fraction anyway
        let rounded = if scaled.is_finite() { scaled.round() / scale } else { n };
        let negative = rounded < 0.0;
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        if negative {
            out.push('-');
        }
        let len = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                if let Some(sep) = self.locale.thousands_separator {
                    out.push(sep);
                }
            }
            out.push(c);
        }
        if let Some(frac) = frac_part {
            out.push(self.locale.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    /// Parse a number, accepting grouping separators.
    pub fn parse_number(&self, text: &str) -> Option<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut cleaned = String::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            if Some(c) == self.locale.thousands_separator || c == ',' && self.locale.decimal_separator != ',' {
                continue;
            }
            cleaned.push(if c == self.locale.decimal_separator { '.' } else { c });
        }

        cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    /// Parse yes/no style text. Empty text is not a boolean.
    pub fn parse_bool(&self, text: &str) -> Option<bool> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if matches!(lower.as_str(), "yes" | "y" | "true" | "1" | "on") || lower == self.locale.yes.to_lowercase() {
            Some(true)
        } else if matches!(lower.as_str(), "no" | "n" | "false" | "0" | "off") || lower == self.locale.no.to_lowercase() {
            Some(false)
        } else {
            None
        }
    }

    /// Parse ISO dates, RFC 3339 timestamps and the locale display format.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        parse_iso_date(text).or_else(|| self.parse_display_date(text))
    }

    pub fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        parse_iso_datetime(text)
            .or_else(|| self.parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
    }

    fn parse_display_date(&self, text: &str) -> Option<NaiveDate> {
        let format = &self.locale.date_format;
        NaiveDate::parse_from_str(text, format)
            .or_else(|_| NaiveDate::parse_from_str(text, &format.replace("%-", "%")))
            .ok()
    }

    fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        // An invalid user format string makes chrono report an error rather than panic here
        if write!(out, "{}", date.format(&self.locale.date_format)).is_err() {
            log::warn!("invalid date format {:?}, using ISO", self.locale.date_format);
            return date.format(DATE_ISO).to_string();
        }
        out
    }
}

/// `YYYY-MM-DDTHH:MM`, with seconds only when they carry information.
fn datetime_input(dt: NaiveDateTime) -> String {
    if dt.second() == 0 && dt.nanosecond() == 0 {
        dt.format(DATETIME_MINUTES).to_string()
    } else {
        dt.format(DATETIME_ISO).to_string()
    }
}
