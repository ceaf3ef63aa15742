//! The `integer` and `float` filters.
//!
//! Both treat a blank string as no value, so an empty form field falls
//! through to the default.

use super::{ensure_no_nested, Filter};
use crate::context::AttributeContext;
use crate::error::{AttrcastError, FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::value::Value;

const DEFAULT_BASE: u32 = 10;

/// Admits integers. Strings are parsed in radix `base` (default 10), and
/// floats without a fractional part are converted.
#[derive(Debug)]
pub struct IntegerFilter {
    name: String,
    options: FilterOptions,
}

impl IntegerFilter {
    pub const KIND: &'static str = "integer";

    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn from_spec(spec: FilterSpec) -> Result<Self> {
        ensure_no_nested(&spec)?;
        if let Some(base) = spec.options.base {
            if !(2..=36).contains(&base) {
                return Err(AttrcastError::declaration(
                    &spec.name,
                    format!("base must be between 2 and 36, got {}", base),
                ));
            }
        }
        Ok(Self::new(spec.name, spec.options))
    }

    fn base(&self) -> u32 {
        self.options.base.unwrap_or(DEFAULT_BASE)
    }
}

impl Filter for IntegerFilter {
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
            Value::Integer(_) => Ok(value),
            Value::Float(x)
                if x.is_finite()
                    && x.fract() == 0.0
                    && x >= i64::MIN as f64
                    && x < i64::MAX as f64 =>
            {
                Ok(Value::Integer(x as i64))
            }
            Value::String(ref s) if s.trim().is_empty() => self.reject(Value::Null, "Integer"),
            Value::String(ref s) => {
                let digits = s.trim().replace('_', "");
                match i64::from_str_radix(&digits, self.base()) {
                    Ok(n) => Ok(Value::Integer(n)),
                    Err(_) => self.reject(value, "Integer"),
                }
            }
            other => self.reject(other, "Integer"),
        }
    }
}

/// Admits floats. Integers are widened and strings parsed; non-finite
/// results are refused.
#[derive(Debug)]
pub struct FloatFilter {
    name: String,
    options: FilterOptions,
}

impl FloatFilter {
    pub const KIND: &'static str = "float";

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

impl Filter for FloatFilter {
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
            Value::Float(x) if x.is_finite() => Ok(value),
            Value::Integer(n) => Ok(Value::Float(n as f64)),
            Value::String(ref s) if s.trim().is_empty() => self.reject(Value::Null, "Float"),
            Value::String(ref s) => {
                let parsed = s.trim().replace('_', "").parse::<f64>();
                match parsed {
                    Ok(x) if x.is_finite() => Ok(Value::Float(x)),
                    _ => self.reject(value, "Float"),
                }
            }
            other => self.reject(other, "Float"),
        }
    }
}
