//! Per-type memoization of record property lists.
//!
//! The first time a record type is serialized or mapped, its
//! [`Record::properties`] registration is run and the result stored under the
//! type's `TypeId`. Entries are never evicted. Lookups share a read lock.
//! A missing entry is built without holding any lock and then inserted only
//! if the slot is still empty, so concurrent first use of a type stores
//! exactly one entry.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::property::{Property, Record};

/// The ordered properties of one record type.
pub struct TypeEntry<T> {
    type_name: &'static str,
    properties: Vec<Property<T>>,
}

impl<T: Record> TypeEntry<T> {
    fn build() -> Self {
        Self {
            type_name: type_name::<T>(),
            properties: T::properties(),
        }
    }
}

impl<T> TypeEntry<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> &[Property<T>] {
        &self.properties
    }

    pub fn find(&self, name: &str) -> Option<&Property<T>> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

type ErasedEntry = Arc<dyn Any + Send + Sync>;

/// A `TypeId`-keyed store of [`TypeEntry`] values.
#[derive(Default)]
pub struct PropertyCache {
    entries: RwLock<HashMap<TypeId, ErasedEntry>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the free functions of this crate.
    pub fn global() -> &'static PropertyCache {
        static GLOBAL: OnceLock<PropertyCache> = OnceLock::new();
        GLOBAL.get_or_init(PropertyCache::new)
    }

    /// Returns the entry for `T`, building it on first use.
    pub fn entry<T: Record>(&self) -> Arc<TypeEntry<T>> {
        let id = TypeId::of::<T>();
        if let Some(entry) = self.read().get(&id).cloned() {
            if let Ok(entry) = entry.downcast::<TypeEntry<T>>() {
                return entry;
            }
        }

        // Registration runs unlocked so it may consult the cache for other
        // types. Racing first uses may each build; only the first is stored.
        let built = TypeEntry::<T>::build();
        let (record, properties) = (built.type_name, built.properties.len());
        let built: ErasedEntry = Arc::new(built);
        let erased = self
            .write()
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(record, properties, "cached record properties");
                built
            })
            .clone();

        // Entries are keyed by their own TypeId, so this downcast always succeeds.
        erased
            .downcast::<TypeEntry<T>>()
            .unwrap_or_else(|_| Arc::new(TypeEntry::build()))
    }

    pub fn contains<T: Record>(&self) -> bool {
        self.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of record types cached so far.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while building an entry leaves the map unchanged, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, ErasedEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, ErasedEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PropertyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyCache")
            .field("types", &self.len())
            .finish()
    }
}
