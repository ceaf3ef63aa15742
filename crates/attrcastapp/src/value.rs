//! Dynamic values.
//!
//! This module defines the runtime representation of both raw inputs (as they
//! come out of a parsed request) and the typed values produced by filters.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// JSON key that turns an object into an [`Instance`] of the named class.
pub const INSTANCE_TAG: &str = "$type";

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(String),
    Array(Vec<Value>),
    Hash(BTreeMap<String, Value>),
    Date(NaiveDate),
    Time(DateTime<Utc>),
    /// An object of a named type. Shared, so a value that passes through a
    /// filter untouched keeps its identity.
    Instance(Arc<Instance>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Value::Symbol(s.into())
    }

    pub fn instance(instance: Instance) -> Self {
        Value::Instance(Arc::new(instance))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Null`, or a string made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Name of the value's type as shown in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "nil",
            Value::Bool(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Date(_) => "Date",
            Value::Time(_) => "Time",
            Value::Instance(i) => i.class(),
        }
    }

    /// Type name followed by the value itself, e.g. `Integer 3`.
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "nil".to_string(),
            _ => format!("{} {}", self.type_name(), self),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Arc<Instance>> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Hash(h) => Some(h),
            _ => None,
        }
    }

    /// True only for an instance whose class is exactly `class`.
    pub fn is_instance_of(&self, class: &str) -> bool {
        self.as_instance().is_some_and(|i| i.class() == class)
    }

    /// True for an instance of `class` or of any type descending from it.
    pub fn is_a(&self, class: &str) -> bool {
        self.as_instance().is_some_and(|i| i.is_a(class))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, ":{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Hash(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?} => {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Instance(i) => write!(f, "#<{}>", i.class()),
        }
    }
}

/// An object of a named type.
///
/// `ancestors` lists the names of the types this object's class descends
/// from, which is what [`Instance::is_a`] checks against.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: String,
    ancestors: Vec<String>,
    fields: BTreeMap<String, Value>,
}

impl Instance {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ancestors: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_ancestor(mut self, ancestor: impl Into<String>) -> Self {
        self.ancestors.push(ancestor.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn is_a(&self, class: &str) -> bool {
        self.class == class || self.ancestors.iter().any(|a| a == class)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                // u64 beyond i64::MAX and real floats both land here
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(mut map) => match map.remove(INSTANCE_TAG) {
                Some(serde_json::Value::String(class)) => {
                    let mut instance = Instance::new(class);
                    for (k, v) in map {
                        instance.fields.insert(k, Value::from(v));
                    }
                    Value::instance(instance)
                }
                other => {
                    let mut hash: BTreeMap<String, Value> = map
                        .into_iter()
                        .map(|(k, v)| (k, Value::from(v)))
                        .collect();
                    // A non-string tag is just data.
                    if let Some(tag) = other {
                        hash.insert(INSTANCE_TAG.to_string(), Value::from(tag));
                    }
                    Value::Hash(hash)
                }
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Hash(map) => map.serialize(serializer),
            Value::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Value::Time(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Instance(instance) => {
                let mut map = serializer.serialize_map(Some(instance.fields.len() + 1))?;
                map.serialize_entry(INSTANCE_TAG, instance.class())?;
                for (k, v) in &instance.fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
