//! The `boolean` filter.

use super::{ensure_no_nested, Filter};
use crate::context::AttributeContext;
use crate::error::{FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::value::Value;

const TRUTHY: &[&str] = &["1", "true", "on"];
const FALSY: &[&str] = &["0", "false", "off"];

/// Admits booleans and the usual form encodings of them.
///
/// `"1"`, `"true"`, `"on"` and `"0"`, `"false"`, `"off"` are recognized in
/// any case; a blank string counts as no value.
#[derive(Debug)]
pub struct BooleanFilter {
    name: String,
    options: FilterOptions,
}

impl BooleanFilter {
    pub const KIND: &'static str = "boolean";

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
}

fn parse_flag(s: &str) -> Option<bool> {
    let s = s.trim().to_ascii_lowercase();
    if TRUTHY.contains(&s.as_str()) {
        Some(true)
    } else if FALSY.contains(&s.as_str()) {
        Some(false)
    } else {
        None
    }
}

impl Filter for BooleanFilter {
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
            Value::Bool(_) => Ok(value),
            Value::String(ref s) if s.trim().is_empty() => self.reject(Value::Null, "Boolean"),
            Value::String(ref s) => match parse_flag(s) {
                Some(b) => Ok(Value::Bool(b)),
                None => self.reject(value, "Boolean"),
            },
            other => self.reject(other, "Boolean"),
        }
    }
}
