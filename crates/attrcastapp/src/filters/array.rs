//! The `array` filter.

use super::Filter;
use crate::context::AttributeContext;
use crate::error::{AttrcastError, FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::registry::Registry;
use crate::value::Value;

/// Admits arrays. With a nested filter, every element is cleaned through it
/// and the first failing element fails the attribute.
#[derive(Debug)]
pub struct ArrayFilter {
    name: String,
    options: FilterOptions,
    element: Option<Box<dyn Filter>>,
}

impl ArrayFilter {
    pub const KIND: &'static str = "array";

    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
            element: None,
        }
    }

    pub fn with_element(mut self, element: Box<dyn Filter>) -> Self {
        self.element = Some(element);
        self
    }

    pub fn from_spec(spec: FilterSpec, registry: &Registry) -> Result<Self> {
        let FilterSpec {
            name,
            options,
            mut nested,
            ..
        } = spec;

        if nested.len() > 1 {
            return Err(AttrcastError::declaration(
                name,
                "array filters take at most one nested filter",
            ));
        }

        let mut filter = Self::new(name, options);
        if let Some(element) = nested.pop() {
            filter.element = Some(registry.build(element)?);
        }
        Ok(filter)
    }
}

impl Filter for ArrayFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn options(&self) -> &FilterOptions {
        &self.options
    }

    fn defers_default_check(&self) -> bool {
        self.element.as_ref().is_some_and(|e| e.defers_default_check())
    }

    fn cast(&self, value: Value, context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        let items = match value {
            Value::Array(items) => items,
            other => return self.reject(other, "Array"),
        };

        let Some(element) = &self.element else {
            return Ok(Value::Array(items));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                element
                    .clean(item, context)
                    .map_err(|source| FilterError::InvalidNested {
                        attribute: self.name.clone(),
                        key: i.to_string(),
                        source: Box::new(source),
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}
