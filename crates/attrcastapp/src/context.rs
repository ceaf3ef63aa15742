//! Per-pass attribute context.
//!
//! One [`AttributeContext`] lives for one validation pass over a set of
//! inputs. Filters borrow it during `cast` (lazy defaults read the typed
//! values of earlier siblings through it); the owner records the outcome of
//! every attribute into it.

use crate::error::FilterError;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// An error recorded against one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeError {
    pub attribute: String,
    pub error: FilterError,
}

#[derive(Debug, Default)]
pub struct AttributeContext {
    values: BTreeMap<String, Value>,
    errors: Vec<AttributeError>,
}

impl AttributeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, attribute: impl Into<String>, error: FilterError) {
        self.errors.push(AttributeError {
            attribute: attribute.into(),
            error,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Recorded errors, in the order they were added.
    pub fn errors(&self) -> &[AttributeError] {
        &self.errors
    }

    pub fn set_value(&mut self, attribute: impl Into<String>, value: Value) {
        self.values.insert(attribute.into(), value);
    }

    /// Typed value of an attribute processed earlier in this pass.
    pub fn value(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Finish the pass: the typed values if every attribute succeeded,
    /// otherwise every recorded error and none of the values.
    pub fn into_result(self) -> Result<BTreeMap<String, Value>, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.values)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// The errors of a failed validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<AttributeError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &AttributeError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors recorded for one attribute.
    pub fn for_attribute<'a>(&'a self, attribute: &'a str) -> impl Iterator<Item = &'a FilterError> {
        self.0
            .iter()
            .filter(move |e| e.attribute == attribute)
            .map(|e| &e.error)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", e.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
