//! Per-package notification colors.
//!
//! The registry keeps a JSON array of `{"package": ..., "rgb": ...}` objects
//! in the notifications slot. The package name is the identity of an entry.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::color::resolve_color_name;
use crate::error::StoreError;
use crate::status::Slot;
use crate::status::StatusStore;

/// A color mapping for one app package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub package: String,
    /// Color as `r g b` text. Omitted from the JSON when not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb: Option<String>,
}

impl Notification {
    pub fn new(package: impl Into<String>, rgb: Option<String>) -> Self {
        Self {
            package: package.into(),
            rgb,
        }
    }
}

/// CRUD operations over the notification list of a `StatusStore`.
///
/// A missing or corrupt list is logged and treated as empty, so an add after
/// corruption starts a fresh list. Inside a valid array each entry is decoded
/// on its own and only unusable entries are skipped.
pub struct NotificationRegistry<'a> {
    store: &'a dyn StatusStore,
}

impl<'a> NotificationRegistry<'a> {
    pub fn new(store: &'a dyn StatusStore) -> Self {
        Self { store }
    }

    /// Returns the stored entries. Read failures are logged and yield an
    /// empty list.
    pub async fn list(&self) -> Vec<Notification> {
        let text = match self.store.read(Slot::Notifications).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Reading notifications failed, using empty list: {}", e);
                None
            }
        };
        text.map(|text| decode(&text)).unwrap_or_default()
    }

    /// Sets the color of `package`, adding an entry if it has none.
    ///
    /// Color names are resolved to their `r g b` text.
    pub async fn add(&self, package: &str, rgb: Option<&str>) -> Result<(), StoreError> {
        let rgb = rgb.map(resolve_color_name);
        let mut entries = self.list().await;

        let mut found = false;
        for entry in entries.iter_mut().filter(|entry| entry.package == package) {
            entry.rgb = rgb.clone();
            found = true;
        }
        if !found {
            entries.push(Notification::new(package, rgb));
        }

        self.save(&entries).await
    }

    /// Drops every entry for `package`. The list is written back even when
    /// nothing matched.
    pub async fn remove(&self, package: &str) -> Result<(), StoreError> {
        let mut entries = self.list().await;
        entries.retain(|entry| entry.package != package);
        log::info!("Saving {} notification(s) after removing {}", entries.len(), package);
        self.save(&entries).await
    }

    /// Empties the list without reading it.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.save(&[]).await
    }

    async fn save(&self, entries: &[Notification]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string());
        self.store.write(Slot::Notifications, json).await
    }
}

fn decode(text: &str) -> Vec<Notification> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let values = match serde_json::from_str::<Vec<Value>>(text) {
        Ok(values) => values,
        Err(e) => {
            log::error!("Discarding corrupt notifications list ({}): {:?}", e, text);
            return Vec::new();
        }
    };
    values.into_iter().filter_map(decode_entry).collect()
}

/// Decodes one list element on its own, so a malformed entry does not take
/// the rest of the list with it.
///
/// An entry needs a string `package`. An `rgb` array of numbers is turned into
/// `r g b` text; any other non-string `rgb` is dropped.
fn decode_entry(value: Value) -> Option<Notification> {
    let Some(package) = value.get("package").and_then(Value::as_str) else {
        log::warn!("Skipping notification without a package: {}", value);
        return None;
    };

    let rgb = match value.get("rgb") {
        None | Some(Value::Null) => None,
        Some(Value::String(rgb)) => Some(rgb.clone()),
        Some(Value::Array(parts)) if parts.iter().all(Value::is_number) => Some(
            parts
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Some(other) => {
            log::warn!("Dropping unreadable rgb {} of notification {}", other, package);
            None
        }
    };
    Some(Notification::new(package, rgb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::MemoryStore;

    async fn stored_json(store: &MemoryStore) -> String {
        store.read(Slot::Notifications).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_add_appends() {
        let store = MemoryStore::new();
        let registry = NotificationRegistry::new(&store);

        registry.add("app1", Some("1 2 3")).await.unwrap();
        registry.add("app2", Some("4 5 6")).await.unwrap();

        assert_eq!(
            stored_json(&store).await,
            r#"[{"package":"app1","rgb":"1 2 3"},{"package":"app2","rgb":"4 5 6"}]"#
        );
    }

    #[tokio::test]
    async fn test_add_existing_overwrites_in_place() {
        let store = MemoryStore::new();
        let registry = NotificationRegistry::new(&store);

        registry.add("app1", Some("1 2 3")).await.unwrap();
        registry.add("app2", Some("9 9 9")).await.unwrap();
        registry.add("app1", Some("4 5 6")).await.unwrap();

        let entries = registry.list().await;
        assert_eq!(
            entries,
            vec![
                Notification::new("app1", Some("4 5 6".to_string())),
                Notification::new("app2", Some("9 9 9".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_resolves_names_and_omits_missing_rgb() {
        let store = MemoryStore::new();
        let registry = NotificationRegistry::new(&store);

        registry.add("mail", Some("pink")).await.unwrap();
        registry.add("chat", None).await.unwrap();

        assert_eq!(
            stored_json(&store).await,
            r#"[{"package":"mail","rgb":"255 0 10"},{"package":"chat"}]"#
        );
    }

    #[tokio::test]
    async fn test_remove_missing_is_idempotent() {
        let store = MemoryStore::new();
        let registry = NotificationRegistry::new(&store);

        registry.remove("missing").await.unwrap();
        assert_eq!(stored_json(&store).await, "[]");
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_drops_all_matches() {
        let store = MemoryStore::new();
        store
            .write(
                Slot::Notifications,
                r#"[{"package":"a","rgb":"1 1 1"},{"package":"b"},{"package":"a","rgb":"2 2 2"}]"#
                    .to_string(),
            )
            .await
            .unwrap();

        NotificationRegistry::new(&store).remove("a").await.unwrap();
        assert_eq!(stored_json(&store).await, r#"[{"package":"b"}]"#);
    }

    #[tokio::test]
    async fn test_clear_ignores_corrupt_state() {
        let store = MemoryStore::new();
        store
            .write(Slot::Notifications, "{not json".to_string())
            .await
            .unwrap();

        NotificationRegistry::new(&store).clear().await.unwrap();
        assert_eq!(stored_json(&store).await, "[]");
    }

    #[tokio::test]
    async fn test_corrupt_list_is_treated_as_empty() {
        let store = MemoryStore::new();
        store
            .write(Slot::Notifications, r#"{"package":"x"}"#.to_string())
            .await
            .unwrap();
        let registry = NotificationRegistry::new(&store);

        assert!(registry.list().await.is_empty());

        registry.add("app1", Some("1 2 3")).await.unwrap();
        assert_eq!(
            stored_json(&store).await,
            r#"[{"package":"app1","rgb":"1 2 3"}]"#
        );
    }

    #[tokio::test]
    async fn test_malformed_entry_keeps_the_rest() {
        let store = MemoryStore::new();
        store
            .write(
                Slot::Notifications,
                r#"[{"package":"a","rgb":"1 1 1"},{"package":"b","rgb":[1,2,3]},{"rgb":"9 9 9"},{"package":"d","rgb":{}},7]"#
                    .to_string(),
            )
            .await
            .unwrap();
        let registry = NotificationRegistry::new(&store);

        registry.add("c", Some("2 2 2")).await.unwrap();

        assert_eq!(
            stored_json(&store).await,
            r#"[{"package":"a","rgb":"1 1 1"},{"package":"b","rgb":"1 2 3"},{"package":"d"},{"package":"c","rgb":"2 2 2"}]"#
        );
    }
}
