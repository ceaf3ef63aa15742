//! Filter kinds and their constructors.
//!
//! A [`Registry`] maps a kind name (`"object"`, `"integer"`, ...) to the
//! constructor that turns a [`FilterSpec`] into a boxed [`Filter`]. Building
//! a filter recurses into nested declarations through the same registry, so
//! a kind registered by the embedding application can appear inside an
//! `array` or `hash` as well.
//!
//! The process-wide registry is seeded with the built-in kinds and reached
//! through the free functions at the bottom of this module. It sits behind
//! an `RwLock`: registering late is safe, though kinds are meant to be
//! registered while the application starts up.

use crate::error::{AttrcastError, RegistryError, Result};
use crate::filters::{
    ensure_valid_default, ArrayFilter, BooleanFilter, DateFilter, Filter, FloatFilter,
    HashFilter, IntegerFilter, ObjectFilter, StringFilter, SymbolFilter, TimeFilter,
};
use crate::options::FilterSpec;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Turns a declaration into a filter. Nested declarations are built through
/// the registry passed in.
pub type FilterConstructor = fn(FilterSpec, &Registry) -> Result<Box<dyn Filter>>;

#[derive(Clone, Default)]
pub struct Registry {
    constructors: HashMap<String, FilterConstructor>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("kinds", &self.kinds()).finish()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (kind, constructor) in BUILTINS {
            registry.constructors.insert(kind.to_string(), *constructor);
        }
        registry
    }

    /// Register `constructor` under `kind`. A kind can be registered once.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        constructor: FilterConstructor,
    ) -> std::result::Result<(), RegistryError> {
        let kind = kind.into();
        if self.constructors.contains_key(&kind) {
            return Err(RegistryError::DuplicateFilterKind(kind));
        }
        tracing::debug!(kind = %kind, "registering filter kind");
        self.constructors.insert(kind, constructor);
        Ok(())
    }

    pub fn lookup(&self, kind: &str) -> std::result::Result<FilterConstructor, RegistryError> {
        self.constructors
            .get(kind)
            .copied()
            .ok_or_else(|| RegistryError::UnknownFilterKind(kind.to_string()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Build the filter `spec` declares.
    ///
    /// Literal defaults are checked here, so a default that can never pass
    /// its own filter fails at declaration time.
    pub fn build(&self, spec: FilterSpec) -> Result<Box<dyn Filter>> {
        let constructor = self.lookup(&spec.kind)?;
        let filter = constructor(spec, self)?;
        ensure_valid_default(filter.as_ref())?;
        Ok(filter)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.constructors.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

const BUILTINS: &[(&str, FilterConstructor)] = &[
    (ObjectFilter::KIND, build_object),
    (StringFilter::KIND, build_string),
    (SymbolFilter::KIND, build_symbol),
    (BooleanFilter::KIND, build_boolean),
    (IntegerFilter::KIND, build_integer),
    (FloatFilter::KIND, build_float),
    (ArrayFilter::KIND, build_array),
    (HashFilter::KIND, build_hash),
    (DateFilter::KIND, build_date),
    (TimeFilter::KIND, build_time),
];

fn build_object(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(ObjectFilter::from_spec(spec)?))
}

fn build_string(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(StringFilter::from_spec(spec)?))
}

fn build_symbol(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(SymbolFilter::from_spec(spec)?))
}

fn build_boolean(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(BooleanFilter::from_spec(spec)?))
}

fn build_integer(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(IntegerFilter::from_spec(spec)?))
}

fn build_float(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(FloatFilter::from_spec(spec)?))
}

fn build_array(spec: FilterSpec, registry: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(ArrayFilter::from_spec(spec, registry)?))
}

fn build_hash(spec: FilterSpec, registry: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(HashFilter::from_spec(spec, registry)?))
}

fn build_date(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(DateFilter::from_spec(spec)?))
}

fn build_time(spec: FilterSpec, _: &Registry) -> Result<Box<dyn Filter>> {
    Ok(Box::new(TimeFilter::from_spec(spec)?))
}

static GLOBAL_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::with_builtins()));

/// Register a filter kind in the process-wide registry.
pub fn register(kind: impl Into<String>, constructor: FilterConstructor) -> Result<()> {
    GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(kind, constructor)
        .map_err(AttrcastError::from)
}

/// Look up a kind in the process-wide registry.
pub fn lookup(kind: &str) -> Result<FilterConstructor> {
    Ok(GLOBAL_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup(kind)?)
}

/// Build a filter through the process-wide registry.
pub fn build_filter(spec: FilterSpec) -> Result<Box<dyn Filter>> {
    // Cloned out so a constructor may itself register kinds without deadlocking.
    let registry = GLOBAL_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    registry.build(spec)
}

pub fn registered_kinds() -> Vec<String> {
    GLOBAL_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .kinds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AttributeContext;
    use crate::error::FilterError;
    use crate::options::FilterOptions;
    use crate::value::{Instance, Value};

    #[test]
    fn test_builtins_registered() {
        assert_eq!(
            Registry::with_builtins().kinds(),
            vec![
                "array", "boolean", "date", "float", "hash", "integer", "object", "string",
                "symbol", "time"
            ]
        );
    }

    #[test]
    fn test_unknown_kind() {
        let registry = Registry::with_builtins();
        let err = registry.lookup("money").unwrap_err();
        assert_eq!(err, RegistryError::UnknownFilterKind("money".into()));

        let err = registry.build(FilterSpec::new("price", "money")).unwrap_err();
        assert!(matches!(
            err,
            AttrcastError::Registry(RegistryError::UnknownFilterKind(ref k)) if k == "money"
        ));
    }

    #[test]
    fn test_duplicate_kind() {
        let mut registry = Registry::with_builtins();
        let err = registry
            .register("object", build_object)
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateFilterKind("object".into()));
    }

    #[test]
    fn test_custom_kind_usable_when_nested() {
        let mut registry = Registry::with_builtins();
        registry.register("percent", build_integer).unwrap();

        let spec = FilterSpec::new("scores", "array").with_nested(FilterSpec::new("score", "percent"));
        let filter = registry.build(spec).unwrap();
        let cast = filter
            .clean(
                Value::Array(vec![Value::string("40")]),
                &AttributeContext::new(),
            )
            .unwrap();
        assert_eq!(cast, Value::Array(vec![Value::Integer(40)]));
    }

    #[test]
    fn test_build_checks_literal_default() {
        let spec = FilterSpec::new("count", "integer")
            .with_options(FilterOptions::new().default_value(Value::string("lots")));
        assert!(matches!(
            Registry::with_builtins().build(spec),
            Err(AttrcastError::Filter(FilterError::InvalidDefault { .. }))
        ));
    }

    #[test]
    fn test_build_rejects_nested_on_scalar() {
        let spec = FilterSpec::new("name", "string").with_nested(FilterSpec::new("x", "string"));
        assert!(matches!(
            Registry::with_builtins().build(spec),
            Err(AttrcastError::Declaration { .. })
        ));
    }

    #[test]
    fn test_object_default_not_checked_at_build() {
        let spec = FilterSpec::new("account", "object")
            .with_options(FilterOptions::new().default_value(Value::Integer(1)));
        assert!(Registry::with_builtins().build(spec).is_ok());
    }

    #[test]
    fn test_nested_object_default_not_checked_at_build() {
        let default = Value::Array(vec![Value::instance(Instance::new("LedgerAccount"))]);
        let spec = FilterSpec::new("accounts", "array")
            .with_options(FilterOptions::new().default_value(default))
            .with_nested(FilterSpec::new("ledger_account", "object"));
        let filter = Registry::with_builtins().build(spec).unwrap();
        assert!(filter.defers_default_check());

        let spec = FilterSpec::new("settings", "hash")
            .with_options(FilterOptions::new().default_value(Value::Hash(Default::default())))
            .with_nested(FilterSpec::new("size", "integer"))
            .with_nested(FilterSpec::new("ledger_account", "object"));
        assert!(Registry::with_builtins().build(spec).is_ok());
    }

    #[test]
    fn test_nested_scalar_default_still_checked_at_build() {
        let spec = FilterSpec::new("counts", "array")
            .with_options(FilterOptions::new().default_value(Value::Array(vec![Value::string("lots")])))
            .with_nested(FilterSpec::new("count", "integer"));
        assert!(matches!(
            Registry::with_builtins().build(spec),
            Err(AttrcastError::Filter(FilterError::InvalidDefault { .. }))
        ));
    }

    #[test]
    fn test_global_registry() {
        assert!(lookup("object").is_ok());
        assert!(registered_kinds().contains(&"hash".to_string()));

        register("global_only_kind", build_string).unwrap();
        assert!(matches!(
            register("global_only_kind", build_string),
            Err(AttrcastError::Registry(RegistryError::DuplicateFilterKind(_)))
        ));

        let filter = build_filter(FilterSpec::new("title", "global_only_kind")).unwrap();
        assert_eq!(filter.kind(), "string");
    }
}
