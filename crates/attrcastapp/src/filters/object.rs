//! The `object` filter.
//!
//! Admits values that belong to a named type, resolved through the type
//! namespace. The target type is resolved lazily on first use and cached.
//! A value that does not match gets exactly one more chance: the cache is
//! dropped, the type is resolved again, and the value is tested once more.
//! This lets a type that was defined after the filter was declared (or
//! redefined since) take effect, without ever looping.

use super::{ensure_no_nested, Filter};
use crate::context::AttributeContext;
use crate::error::{FilterError, Result};
use crate::options::{FilterOptions, FilterSpec};
use crate::resolver::resolve;
use crate::types::{global_types, ObjectType, TypeLookup};
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Cached target type.
#[derive(Debug, Clone, Default)]
enum TypeBinding {
    #[default]
    Unresolved,
    Resolved(Arc<dyn ObjectType>),
}

pub struct ObjectFilter {
    name: String,
    options: FilterOptions,
    namespace: Arc<dyn TypeLookup>,
    // Locked only to read or swap the binding, never across a resolution,
    // so a filter can be shared between threads.
    binding: Mutex<TypeBinding>,
}

impl ObjectFilter {
    pub const KIND: &'static str = "object";

    /// A filter resolving against the process-wide namespace.
    pub fn new(name: impl Into<String>, options: FilterOptions) -> Self {
        Self::with_namespace(name, options, global_types())
    }

    pub fn with_namespace(
        name: impl Into<String>,
        options: FilterOptions,
        namespace: Arc<dyn TypeLookup>,
    ) -> Self {
        Self {
            name: name.into(),
            options,
            namespace,
            binding: Mutex::new(TypeBinding::Unresolved),
        }
    }

    pub fn from_spec(spec: FilterSpec) -> Result<Self> {
        ensure_no_nested(&spec)?;
        Ok(Self::new(spec.name, spec.options))
    }

    /// The cached target type, resolving it if nothing is cached yet.
    fn target(&self) -> std::result::Result<Arc<dyn ObjectType>, FilterError> {
        let cached = self
            .binding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match cached {
            TypeBinding::Resolved(ty) => Ok(ty),
            TypeBinding::Unresolved => self.rebind(),
        }
    }

    /// Resolve the target type afresh and cache it.
    fn rebind(&self) -> std::result::Result<Arc<dyn ObjectType>, FilterError> {
        let ty = resolve(&self.options, &self.name, self.namespace.as_ref())?;
        *self.binding.lock().unwrap_or_else(PoisonError::into_inner) =
            TypeBinding::Resolved(Arc::clone(&ty));
        Ok(ty)
    }

    fn cast_with(&self, value: Value, reresolve: bool) -> std::result::Result<Value, FilterError> {
        let target = self.target()?;

        if conforms(target.as_ref(), &value) {
            tracing::trace!(attribute = %self.name, class = target.name(), "value matches");
            return Ok(value);
        }

        if !reresolve {
            return self.reject(value, target.name());
        }

        tracing::debug!(
            attribute = %self.name,
            class = target.name(),
            "value does not match, resolving type again"
        );
        self.rebind()?;
        self.cast_with(value, false)
    }
}

/// Membership first, then plain `is_a`, so a custom predicate can only
/// widen what a type accepts.
fn conforms(ty: &dyn ObjectType, value: &Value) -> bool {
    ty.matches(value) || value.is_a(ty.name())
}

impl Filter for ObjectFilter {
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
        true
    }

    fn cast(&self, value: Value, _context: &AttributeContext) -> std::result::Result<Value, FilterError> {
        self.cast_with(value, true)
    }
}

impl fmt::Debug for ObjectFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectFilter")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
