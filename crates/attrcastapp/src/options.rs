//! Filter declarations and their options.
//!
//! A [`FilterSpec`] is what an attribute declaration turns into: a name, a
//! filter kind, the options, and (for `array` and `hash`) nested
//! declarations. Specs are built once per declaration and never change
//! afterwards.

use crate::context::AttributeContext;
use crate::types::ObjectType;
use crate::value::Value;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// The `class` option: either a type handle or a name to resolve.
#[derive(Debug, Clone)]
pub enum ClassOption {
    Name(String),
    Type(Arc<dyn ObjectType>),
}

impl ClassOption {
    pub fn name(&self) -> &str {
        match self {
            ClassOption::Name(name) => name,
            ClassOption::Type(ty) => ty.name(),
        }
    }
}

impl From<&str> for ClassOption {
    fn from(name: &str) -> Self {
        ClassOption::Name(name.to_string())
    }
}

impl From<String> for ClassOption {
    fn from(name: String) -> Self {
        ClassOption::Name(name)
    }
}

impl From<Arc<dyn ObjectType>> for ClassOption {
    fn from(ty: Arc<dyn ObjectType>) -> Self {
        ClassOption::Type(ty)
    }
}

impl<'de> Deserialize<'de> for ClassOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ClassOption::Name)
    }
}

type LazyDefault = Arc<dyn Fn(&AttributeContext) -> Value + Send + Sync>;

/// The `default` option.
///
/// `DefaultValue::Value(Value::Null)` makes an attribute optional.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    /// Computed when needed, with access to the values already cast in the
    /// current pass.
    Lazy(LazyDefault),
}

impl DefaultValue {
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn(&AttributeContext) -> Value + Send + Sync + 'static,
    {
        DefaultValue::Lazy(Arc::new(f))
    }

    pub fn evaluate(&self, context: &AttributeContext) -> Value {
        match self {
            DefaultValue::Value(v) => v.clone(),
            DefaultValue::Lazy(f) => f(context),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            DefaultValue::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DefaultValue::Value)
    }
}

/// Options recognized on an attribute declaration.
///
/// Which options a filter looks at depends on its kind; the others are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOptions {
    /// Explicit target type for `object` filters. Defaults to the
    /// attribute name, camelized.
    pub class: Option<ClassOption>,

    /// Default value; absent means the attribute is required.
    // `default` has to be spelled out: a JSON `null` must become
    // `Some(Null)`, not `None`.
    #[serde(deserialize_with = "deserialize_default")]
    pub default: Option<DefaultValue>,

    /// Free-text description.
    pub desc: Option<String>,

    /// Strip whitespace (`string`) or undeclared keys (`hash`). Defaults to true.
    pub strip: Option<bool>,

    /// Radix for parsing integers from strings. Defaults to 10.
    pub base: Option<u32>,

    /// strftime-style format for `date` and `time` parsing.
    pub format: Option<String>,
}

fn deserialize_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DefaultValue>, D::Error> {
    DefaultValue::deserialize(deserializer).map(Some)
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: impl Into<ClassOption>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Value(value));
        self
    }

    pub fn default_lazy<F>(mut self, f: F) -> Self
    where
        F: Fn(&AttributeContext) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::lazy(f));
        self
    }

    /// Shorthand for a `null` default.
    pub fn optional(self) -> Self {
        self.default_value(Value::Null)
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn strip(mut self, strip: bool) -> Self {
        self.strip = Some(strip);
        self
    }

    pub fn base(mut self, base: u32) -> Self {
        self.base = Some(base);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn strips(&self) -> bool {
        self.strip.unwrap_or(true)
    }
}

/// A single attribute declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub options: FilterOptions,
    #[serde(default)]
    pub nested: Vec<FilterSpec>,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            options: FilterOptions::default(),
            nested: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: FilterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_nested(mut self, nested: FilterSpec) -> Self {
        self.nested.push(nested);
        self
    }
}
