use crate::types::{ObjectType, TypeLookup, TypeNamespace};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A namespace that counts how often it is asked for a type.
#[derive(Debug, Default)]
pub struct CountingLookup {
    namespace: TypeNamespace,
    lookups: AtomicUsize,
}

impl CountingLookup {
    pub fn with_types<I, T>(types: I) -> Arc<Self>
    where
        I: IntoIterator<Item = T>,
        T: ObjectType + 'static,
    {
        let lookup = Self::default();
        for ty in types {
            lookup.namespace.define(ty);
        }
        Arc::new(lookup)
    }

    pub fn define<T: ObjectType + 'static>(&self, ty: T) {
        self.namespace.define(ty);
    }

    pub fn remove(&self, name: &str) {
        self.namespace.remove(name);
    }

    /// Number of lookups so far, successful or not.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TypeLookup for CountingLookup {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ObjectType>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.namespace.lookup(name)
    }
}
