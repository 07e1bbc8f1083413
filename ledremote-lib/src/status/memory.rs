//! In-memory status store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::Slot;
use super::StatusStore;
use crate::error::StoreError;

/// A status store held entirely in memory.
///
/// Used by tests and by embedders that do not want files on disk. Data is
/// lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: DashMap<Slot, String>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Returns the number of slots that hold a value.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot has been written.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn read(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(&slot).map(|entry| entry.value().clone()))
    }

    async fn write(&self, slot: Slot, contents: String) -> Result<(), StoreError> {
        self.slots.insert(slot, contents);
        Ok(())
    }
}
