//! Status store error types

use crate::status::Slot;

/// Errors that can occur while reading or writing a status slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error on the slot's backing file.
    #[error("I/O error on status slot '{slot}': {source}")]
    Io {
        /// The slot being accessed.
        slot: Slot,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates a new I/O error for a slot.
    pub fn io(slot: Slot, source: std::io::Error) -> Self {
        Self::Io { slot, source }
    }

    /// Returns the slot the failed operation targeted.
    pub fn slot(&self) -> Slot {
        match self {
            Self::Io { slot, .. } => *slot,
        }
    }
}
