//! Reference-cycle detection for record serialization.

use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::mem::size_of;

use crate::error::{JsonError, Result};

/// Identities of the records currently being written by one serializer.
///
/// An identity is the record's type plus its address, so a struct and its
/// first field (which share an address) never collide. A record leaves the
/// set once it has been written, which lets shared but acyclic references
/// (the same `Rc` reached twice) serialize normally.
#[derive(Debug, Default)]
pub struct CycleGuard {
    active: HashSet<(TypeId, usize)>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `record` as in progress, failing if it already is.
    pub fn enter<T: 'static>(&mut self, record: &T) -> Result<()> {
        // Zero-sized values share dangling addresses and cannot hold references.
        if size_of::<T>() == 0 {
            return Ok(());
        }
        if !self.active.insert(identity(record)) {
            return Err(JsonError::CircularReference {
                type_name: type_name::<T>(),
            });
        }
        Ok(())
    }

    pub fn exit<T: 'static>(&mut self, record: &T) {
        self.active.remove(&identity(record));
    }

    /// Number of records currently in progress.
    pub fn depth(&self) -> usize {
        self.active.len()
    }
}

fn identity<T: 'static>(record: &T) -> (TypeId, usize) {
    (TypeId::of::<T>(), record as *const T as usize)
}
