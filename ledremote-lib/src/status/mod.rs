//! Status slots persisted for the LED controller.
//!
//! Provides a `StatusStore` trait and implementations for reading and writing
//! the flat status files the light driver polls. Each slot is a whole value:
//! writes replace it, there is no append and no locking.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use std::fmt;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

use crate::color::Rgb;
use crate::error::StoreError;

/// Directory the file store uses unless configured otherwise.
pub const DEFAULT_STATUS_DIR: &str = "status";

/// A named status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Ambient color set by a person.
    Ambient,
    /// Ambient color set by an automated agent.
    AmbientAi,
    /// JSON array of per-package notification colors.
    Notifications,
    /// Opaque preferences blob.
    Preferences,
    /// Color the driver considers canonical. Read-only here.
    Canonical,
    /// Mechanical keyboard state. Read-only here.
    Mech,
}

impl Slot {
    /// All slots, in file order.
    pub const ALL: [Slot; 6] = [
        Slot::Ambient,
        Slot::AmbientAi,
        Slot::Notifications,
        Slot::Preferences,
        Slot::Canonical,
        Slot::Mech,
    ];

    /// Name of the slot's file inside the status directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Slot::Ambient => "ambient",
            Slot::AmbientAi => "ambient_ai",
            Slot::Notifications => "notifications",
            Slot::Preferences => "prefs",
            Slot::Canonical => "canonical",
            Slot::Mech => "mech",
        }
    }

    /// The ambient slot for a request origin.
    pub fn ambient(ai: bool) -> Self {
        if ai { Slot::AmbientAi } else { Slot::Ambient }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Trait for status stores.
///
/// Implementations keep one text value per `Slot`. `read` returns `None`
/// for a slot that was never written.
///
/// # Example
///
/// ```ignore
/// use ledremote_lib::status::{MemoryStore, Slot, StatusStore};
///
/// let store = MemoryStore::new();
/// store.write(Slot::Preferences, "{}".to_string()).await?;
/// assert_eq!(store.read(Slot::Preferences).await?.as_deref(), Some("{}"));
/// ```
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Reads the current contents of a slot.
    async fn read(&self, slot: Slot) -> Result<Option<String>, StoreError>;

    /// Replaces the contents of a slot.
    async fn write(&self, slot: Slot, contents: String) -> Result<(), StoreError>;
}

// =============================================================================
// Ambient records
// =============================================================================

/// An ambient color as persisted in the `ambient` / `ambient_ai` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbientRecord {
    pub color: Rgb,
    /// When the color was written. `None` if the timestamp line is missing
    /// or unreadable.
    pub updated_at: Option<DateTime<Utc>>,
}

impl AmbientRecord {
    /// Creates a record stamped with the current time.
    pub fn now(color: Rgb) -> Self {
        Self {
            color,
            updated_at: Some(Utc::now()),
        }
    }

    /// Serializes as `"r g b\n<unix seconds>"`.
    pub fn encode(&self) -> String {
        match self.updated_at {
            Some(at) => format!("{}\n{}", self.color, at.timestamp()),
            None => self.color.to_string(),
        }
    }

    /// Parses the persisted form. Returns `None` if the first line is not a
    /// color triple.
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines();
        let color = Rgb::parse(lines.next()?.trim()).ok()?;
        let updated_at = lines
            .next()
            .and_then(|line| line.trim().parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Some(Self { color, updated_at })
    }
}

/// Writes `color` to the ambient slot selected by `ai`, stamped with the
/// current time.
pub async fn write_ambient(
    store: &dyn StatusStore,
    ai: bool,
    color: Rgb,
) -> Result<AmbientRecord, StoreError> {
    let record = AmbientRecord::now(color);
    store.write(Slot::ambient(ai), record.encode()).await?;
    Ok(record)
}

/// Reads the ambient slot selected by `ai`.
///
/// An unparsable slot is logged and reported as empty.
pub async fn read_ambient(
    store: &dyn StatusStore,
    ai: bool,
) -> Result<Option<AmbientRecord>, StoreError> {
    let slot = Slot::ambient(ai);
    let Some(text) = store.read(slot).await? else {
        return Ok(None);
    };

    let record = AmbientRecord::parse(&text);
    if record.is_none() {
        log::warn!("Ignoring unreadable {} slot: {:?}", slot, text);
    }
    Ok(record)
}
