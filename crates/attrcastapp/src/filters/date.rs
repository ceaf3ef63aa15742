//! The `date` and `time` filters.

use super::{ensure_no_nested, Filter};
use crate::context::AttributeContext;
use crate::error::{FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Admits dates; strings are parsed with `format` (default `%Y-%m-%d`).
#[derive(Debug)]
pub struct DateFilter {
    name: String,
    options: FilterOptions,
}

impl DateFilter {
    pub const KIND: &'static str = "date";

    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn from_spec(spec: FilterSpec) -> Result<Self> {
        ensure_no_nested(&spec)?;
        Ok(Self::new(spec.name, spec.options))
    }

    fn format(&self) -> &str {
        self.options.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }
}

impl Filter for DateFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn cast(&self, value: Value, _context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        match value {
            Value::Date(_) => Ok(value),
            Value::Time(t) => Ok(Value::Date(t.date_naive())),
            Value::String(ref s) if s.trim().is_empty() => self.reject(Value::Null, "Date"),
            Value::String(ref s) => match NaiveDate::parse_from_str(s.trim(), self.format()) {
                Ok(d) => Ok(Value::Date(d)),
                Err(_) => self.reject(value, "Date"),
            },
            other => self.reject(other, "Date"),
        }
    }
}

/// Admits UTC times.
///
/// Strings are parsed as RFC 3339, or with `format` when one is given (a
/// format without an offset is read as UTC). Integers are Unix seconds.
#[derive(Debug)]
pub struct TimeFilter {
    name: String,
    options: FilterOptions,
}

impl TimeFilter {
    pub const KIND: &'static str = "time";

    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn from_spec(spec: FilterSpec) -> Result<Self> {
        ensure_no_nested(&spec)?;
        Ok(Self::new(spec.name, spec.options))
    }

    fn parse(&self, s: &str) -> Option<DateTime<Utc>> {
        match self.options.format.as_deref() {
            None => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Some(format) => DateTime::parse_from_str(s, format)
                .map(|t| t.with_timezone(&Utc))
                .or_else(|_| NaiveDateTime::parse_from_str(s, format).map(|t| t.and_utc()))
                .ok(),
        }
    }
}

impl Filter for TimeFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn cast(&self, value: Value, _context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        match value {
            Value::Time(_) => Ok(value),
            Value::Integer(secs) => match DateTime::from_timestamp(secs, 0) {
                Some(t) => Ok(Value::Time(t)),
                None => self.reject(value, "Time"),
            },
            Value::String(ref s) if s.trim().is_empty() => self.reject(Value::Null, "Time"),
            Value::String(ref s) => match self.parse(s.trim()) {
                Some(t) => Ok(Value::Time(t)),
                None => self.reject(value, "Time"),
            },
            other => self.reject(other, "Time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(options: FilterOptions, value: Value) -> std::result::Result<Value, FilterError> {
        DateFilter::new("due_on", options).clean(value, &AttributeContext::new())
    }

    fn time(options: FilterOptions, value: Value) -> std::result::Result<Value, FilterError> {
        TimeFilter::new("starts_at", options).clean(value, &AttributeContext::new())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_passes() {
        let d = Value::Date(ymd(2024, 2, 29));
        assert_eq!(date(FilterOptions::new(), d.clone()), Ok(d));
    }

    #[test]
    fn test_date_from_iso_string() {
        assert_eq!(
            date(FilterOptions::new(), Value::string("2024-02-29")),
            Ok(Value::Date(ymd(2024, 2, 29)))
        );
    }

    #[test]
    fn test_date_with_format() {
        assert_eq!(
            date(FilterOptions::new().format("%d/%m/%Y"), Value::string("01/03/2024")),
            Ok(Value::Date(ymd(2024, 3, 1)))
        );
        assert!(date(FilterOptions::new().format("%d/%m/%Y"), Value::string("2024-03-01")).is_err());
    }

    #[test]
    fn test_date_rejects_impossible_date() {
        let err = date(FilterOptions::new(), Value::string("2023-02-29")).unwrap_err();
        assert_eq!(err.to_string(), "due_on: expected Date, got String \"2023-02-29\"");
    }

    #[test]
    fn test_date_from_time() {
        let t = Utc.with_ymd_and_hms(2024, 5, 6, 23, 0, 0).unwrap();
        assert_eq!(
            date(FilterOptions::new(), Value::Time(t)),
            Ok(Value::Date(ymd(2024, 5, 6)))
        );
    }

    #[test]
    fn test_time_from_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(
            time(FilterOptions::new(), Value::string("2024-01-15T14:00:00+02:00")),
            Ok(Value::Time(expected))
        );
    }

    #[test]
    fn test_time_with_naive_format() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(
            time(
                FilterOptions::new().format("%Y-%m-%d %H:%M"),
                Value::string("2024-01-15 09:30")
            ),
            Ok(Value::Time(expected))
        );
    }

    #[test]
    fn test_time_from_unix_seconds() {
        let expected = Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap();
        assert_eq!(
            time(FilterOptions::new(), Value::Integer(1_000_000_000)),
            Ok(Value::Time(expected))
        );
    }

    #[test]
    fn test_time_rejects_garbage() {
        assert!(matches!(
            time(FilterOptions::new(), Value::string("tomorrow")),
            Err(FilterError::TypeMismatch { .. })
        ));
        assert!(matches!(
            time(FilterOptions::new(), Value::string("")),
            Err(FilterError::MissingValue { .. })
        ));
    }
}
