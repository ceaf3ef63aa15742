//! The `string` and `symbol` filters.

use super::{ensure_no_nested, Filter};
use crate::context::AttributeContext;
use crate::error::{FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::value::Value;

/// Admits strings; symbols are converted. Surrounding whitespace is stripped
/// unless `strip: false`.
#[derive(Debug)]
pub struct StringFilter {
    name: String,
    options: FilterOptions,
}

impl StringFilter {
    pub const KIND: &'static str = "string";

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

    fn finish(&self, s: String) -> Value {
        if self.options.strips() && s.trim().len() != s.len() {
            Value::String(s.trim().to_string())
        } else {
            Value::String(s)
        }
    }
}

impl Filter for StringFilter {
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
            Value::String(s) | Value::Symbol(s) => Ok(self.finish(s)),
            other => self.reject(other, "String"),
        }
    }
}

/// Admits symbols; strings are converted.
#[derive(Debug)]
pub struct SymbolFilter {
    name: String,
    options: FilterOptions,
}

impl SymbolFilter {
    pub const KIND: &'static str = "symbol";

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

impl Filter for SymbolFilter {
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
            Value::Symbol(_) => Ok(value),
            Value::String(s) => Ok(Value::Symbol(s)),
            other => self.reject(other, "Symbol"),
        }
    }
}
