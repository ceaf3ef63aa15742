//! The `hash` filter.

use super::Filter;
use crate::context::AttributeContext;
use crate::error::{AttrcastError, FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::registry::Registry;
use crate::value::Value;
use std::collections::{BTreeMap, HashSet};

/// Admits hashes.
///
/// Each nested filter owns the key of the same name: the key's value (or
/// `Null` if it is absent) is cleaned through it, so nested defaults apply.
/// Keys without a nested filter are dropped, unless `strip: false`.
#[derive(Debug)]
pub struct HashFilter {
    name: String,
    options: FilterOptions,
    keys: Vec<Box<dyn Filter>>,
}

impl HashFilter {
    pub const KIND: &'static str = "hash";

    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self {
            name: name.into(),
            options,
            keys: Vec::new(),
        }
    }

    pub fn with_key(mut self, filter: Box<dyn Filter>) -> Self {
        self.keys.push(filter);
        self
    }

    pub fn from_spec(spec: FilterSpec, registry: &Registry) -> Result<Self> {
        let mut seen = HashSet::new();
        for nested in &spec.nested {
            if !seen.insert(nested.name.as_str()) {
                return Err(AttrcastError::declaration(
                    &spec.name,
                    format!("key '{}' is declared twice", nested.name),
                ));
            }
        }

        let keys = spec
            .nested
            .into_iter()
            .map(|nested| registry.build(nested))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: spec.name,
            options: spec.options,
            keys,
        })
    }
}

impl Filter for HashFilter {
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
        self.keys.iter().any(|k| k.defers_default_check())
    }

    fn cast(&self, value: Value, context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        let mut raw = match value {
            Value::Hash(map) => map,
            other => return self.reject(other, "Hash"),
        };

        let mut typed = BTreeMap::new();
        for key in &self.keys {
            let item = raw.remove(key.name()).unwrap_or(Value::Null);
            let cleaned = key
                .clean(item, context)
                .map_err(|source| FilterError::InvalidNested {
                    attribute: self.name.clone(),
                    key: key.name().to_string(),
                    source: Box::new(source),
                })?;
            typed.insert(key.name().to_string(), cleaned);
        }

        if !self.options.strips() {
            typed.extend(raw);
        }
        Ok(Value::Hash(typed))
    }
}
