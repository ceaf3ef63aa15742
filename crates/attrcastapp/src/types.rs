//! # Type Namespace
//!
//! The `object` filter checks values against *types*, looked up by name in a
//! namespace that the embedding application owns. Types may be defined at any
//! point in the life of the process, including after the filters that refer
//! to them were declared.
//!
//! ## Membership
//!
//! A type decides which values belong to it through [`ObjectType::matches`].
//! The default is the usual `is_a` check (the instance's class, or one of its
//! ancestors, carries the type's name). Types can widen that:
//!
//! | Type | Accepts |
//! |------|---------|
//! | [`NamedType`] | instances that `is_a` the type |
//! | [`AnyOfType`] | instances that `is_a` the type or any listed member |
//! | [`PredicateType`] | whatever the supplied closure accepts |

use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A type that values can be checked against.
pub trait ObjectType: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Membership predicate.
    fn matches(&self, value: &Value) -> bool {
        value.is_a(self.name())
    }
}

/// A plain named type with `is_a` membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    name: String,
}

impl NamedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ObjectType for NamedType {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A type that also accepts instances of a set of related types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyOfType {
    name: String,
    members: Vec<String>,
}

impl AnyOfType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

impl ObjectType for AnyOfType {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_a(&self.name) || self.members.iter().any(|m| value.is_a(m))
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A type whose membership is an arbitrary predicate.
#[derive(Clone)]
pub struct PredicateType {
    name: String,
    predicate: Predicate,
}

impl PredicateType {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ObjectType for PredicateType {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

/// Name → type lookup, the seam the type resolver queries.
pub trait TypeLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ObjectType>>;
}

/// A mutable, thread-safe set of named types.
#[derive(Default)]
pub struct TypeNamespace {
    types: RwLock<HashMap<String, Arc<dyn ObjectType>>>,
}

impl TypeNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a type under its own name.
    ///
    /// Returns the type previously registered under that name, if any.
    pub fn define<T: ObjectType + 'static>(&self, ty: T) -> Option<Arc<dyn ObjectType>> {
        self.define_arc(Arc::new(ty))
    }

    pub fn define_arc(&self, ty: Arc<dyn ObjectType>) -> Option<Arc<dyn ObjectType>> {
        let name = ty.name().to_string();
        tracing::debug!(type_name = %name, "defining type");
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, ty)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn ObjectType>> {
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// All defined type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl TypeLookup for TypeNamespace {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ObjectType>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl fmt::Debug for TypeNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeNamespace")
            .field("types", &self.names())
            .finish()
    }
}

static GLOBAL_TYPES: Lazy<Arc<TypeNamespace>> = Lazy::new(|| Arc::new(TypeNamespace::new()));

/// The process-wide namespace used by filters that were not given one.
pub fn global_types() -> Arc<TypeNamespace> {
    Arc::clone(&GLOBAL_TYPES)
}
