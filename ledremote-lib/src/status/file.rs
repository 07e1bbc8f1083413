//! File-backed status store.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;

use super::Slot;
use super::StatusStore;
use crate::error::StoreError;

/// A status store keeping one plain file per slot in a directory.
///
/// The directory is created on the first write. Writes overwrite the file
/// in place, so a crash mid-write can leave a truncated slot behind.
///
/// # Example
///
/// ```ignore
/// use ledremote_lib::status::FileStore;
///
/// let store = FileStore::new("status");
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. Nothing is touched on disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the status directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of a slot's file.
    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }
}

#[async_trait]
impl StatusStore for FileStore {
    async fn read(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path(slot)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(slot, e)),
        }
    }

    async fn write(&self, slot: Slot, contents: String) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(slot, e))?;
        tokio::fs::write(self.path(slot), contents)
            .await
            .map_err(|e| StoreError::io(slot, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ledremote-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_slot_reads_none() {
        let store = FileStore::new(temp_dir());
        assert_eq!(store.read(Slot::Ambient).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = temp_dir().join("nested");
        let store = FileStore::new(&dir);

        store
            .write(Slot::Preferences, "night=1".to_string())
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.join("prefs")).unwrap(),
            "night=1"
        );
        assert_eq!(
            store.read(Slot::Preferences).await.unwrap().as_deref(),
            Some("night=1")
        );

        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = temp_dir();
        let store = FileStore::new(&dir);

        store.write(Slot::Mech, "a long first value".to_string()).await.unwrap();
        store.write(Slot::Mech, "b".to_string()).await.unwrap();
        assert_eq!(store.read(Slot::Mech).await.unwrap().as_deref(), Some("b"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_unreadable_slot_is_error() {
        let dir = temp_dir();
        std::fs::create_dir_all(dir.join("canonical")).unwrap();
        let store = FileStore::new(&dir);

        let err = store.read(Slot::Canonical).await.unwrap_err();
        assert_eq!(err.slot(), Slot::Canonical);

        let _ = std::fs::remove_dir_all(dir);
    }
}
