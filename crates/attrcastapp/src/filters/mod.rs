//! # Filters
//!
//! A filter owns one declared attribute: it admits raw values of its semantic
//! type, coerces the ones it knows how to convert, and rejects the rest with
//! an attribute-scoped [`FilterError`].
//!
//! ## The Contract
//!
//! Every filter implements [`Filter::cast`]. The provided methods layer the
//! shared semantics on top:
//!
//! - [`Filter::clean`] casts and then substitutes the default for `Null`.
//! - [`Filter::reject`] is the common fallback once a filter's own coercion
//!   gave up: `Null` is accepted when a default exists (the default is
//!   applied by `clean`), reported as missing otherwise; anything else is a
//!   type mismatch.
//!
//! ## Defaults
//!
//! | `default` option | Absent / `Null` input |
//! |------------------|-----------------------|
//! | not given | `MissingValue` |
//! | `null` | `Null` |
//! | a value | the value, after it passes `cast` itself |
//! | lazy | computed from the context, then as above |
//!
//! A default that does not pass its own filter fails with `InvalidDefault`.
//!
//! ## Kinds
//!
//! | Kind | Filter |
//! |------|--------|
//! | `object` | [`ObjectFilter`] |
//! | `string` | [`StringFilter`] |
//! | `symbol` | [`SymbolFilter`] |
//! | `boolean` | [`BooleanFilter`] |
//! | `integer` | [`IntegerFilter`] |
//! | `float` | [`FloatFilter`] |
//! | `array` | [`ArrayFilter`] |
//! | `hash` | [`HashFilter`] |
//! | `date` | [`DateFilter`] |
//! | `time` | [`TimeFilter`] |

use crate::context::AttributeContext;
use crate::error::{AttrcastError, FilterError, Result};
use crate::options::{DefaultValue, FilterOptions, FilterSpec};
use crate::value::Value;
use std::fmt;

mod array;
mod boolean;
mod date;
mod hash;
mod numeric;
mod object;
mod string;

pub use array::ArrayFilter;
pub use boolean::BooleanFilter;
pub use date::{DateFilter, TimeFilter};
pub use hash::HashFilter;
pub use numeric::{FloatFilter, IntegerFilter};
pub use object::ObjectFilter;
pub use string::{StringFilter, SymbolFilter};

/// Validates and coerces values for one attribute.
pub trait Filter: fmt::Debug + Send + Sync {
    /// The attribute name.
    fn name(&self) -> &str;

    /// The kind this filter is registered under.
    fn kind(&self) -> &'static str;

    fn options(&self) -> &FilterOptions;

    /// Admit or convert `value`.
    ///
    /// Must not touch `value` unless it is returned converted, and must give
    /// the same answer for the same input.
    fn cast(&self, value: Value, context: &AttributeContext) -> std::result::Result<Value, FilterError>;

    fn has_default(&self) -> bool {
        self.options().default.is_some()
    }

    /// Whether a literal default must wait for the first cast to be checked.
    /// True for anything that resolves types by name, at any depth.
    fn defers_default_check(&self) -> bool {
        false
    }

    /// Cast, then fall back to the default when the result is `Null`.
    fn clean(&self, value: Value, context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        let value = self.cast(value, context)?;
        if value.is_null() {
            self.default_value(context)
        } else {
            Ok(value)
        }
    }

    /// The default, cast through this filter.
    fn default_value(&self, context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        let Some(default) = &self.options().default else {
            return Err(FilterError::MissingValue {
                attribute: self.name().to_string(),
            });
        };

        let raw = default.evaluate(context);
        if raw.is_null() {
            return Ok(Value::Null);
        }

        let shown = raw.describe();
        self.cast(raw, context).map_err(|err| {
            tracing::debug!(attribute = self.name(), error = %err, "default rejected");
            FilterError::InvalidDefault {
                attribute: self.name().to_string(),
                value: shown,
            }
        })
    }

    /// Shared fallback for values the filter could not admit.
    fn reject(&self, value: Value, expected: &str) -> std::result::Result<Value, FilterError> {
        if value.is_null() {
            if self.has_default() {
                return Ok(Value::Null);
            }
            return Err(FilterError::MissingValue {
                attribute: self.name().to_string(),
            });
        }

        Err(FilterError::TypeMismatch {
            attribute: self.name().to_string(),
            expected: expected.to_string(),
            actual: value.describe(),
        })
    }
}

/// Reject nested declarations on kinds that take none.
pub(crate) fn ensure_no_nested(spec: &FilterSpec) -> Result<()> {
    if spec.nested.is_empty() {
        Ok(())
    } else {
        Err(AttrcastError::declaration(
            &spec.name,
            format!("'{}' filters do not take nested filters", spec.kind),
        ))
    }
}

/// Reject defaults that can never be valid, at declaration time.
///
/// Only literal defaults are checked: lazy ones depend on the pass, and
/// filters that resolve types by name would need types that may not be
/// defined yet.
pub(crate) fn ensure_valid_default(filter: &dyn Filter) -> Result<()> {
    if let Some(DefaultValue::Value(v)) = &filter.options().default {
        if !v.is_null() && !filter.defers_default_check() {
            filter.default_value(&AttributeContext::new())?;
        }
    }
    Ok(())
}
