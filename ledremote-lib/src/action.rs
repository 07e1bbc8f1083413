//! Request parameters and the actions they map to.

use std::collections::HashMap;

use crate::color::Brightness;

/// Loosely-typed request parameters, from a query string or a form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` text. For repeated keys
    /// the last value wins.
    pub fn parse(input: &[u8]) -> Self {
        let values = url::form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { values }
    }

    /// Sets a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value of `key` when it is present and not empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What a request asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Upsert the color of a package's notification.
    AddNotification {
        package: String,
        rgb: Option<String>,
    },
    /// Drop a package's notification.
    RemoveNotification { package: String },
    /// Empty the notification list.
    ClearNotifications,
    /// Set the ambient color.
    SetColor {
        /// Write to the automated-agent slot instead of the human one.
        ai: bool,
        /// Color name or `r g b` text. `None` reuses the stored ambient color.
        color: Option<String>,
        brightness: Brightness,
    },
    /// Overwrite the preferences blob.
    SetPreferences(String),
    /// Nothing recognized; show the control page.
    ServeGui,
}

/// Keys that make a request a color change.
const COLOR_KEYS: [&str; 5] = ["rgb", "brightness", "r", "g", "b"];

/// Maps request parameters to an action. The first matching rule wins:
/// notification add, remove, clear, then color, then preferences.
pub fn interpret(params: &Params) -> Action {
    if let Some(package) = params.non_empty("add_notification") {
        return Action::AddNotification {
            package: package.to_string(),
            rgb: params.get("rgb").map(str::to_string),
        };
    }

    if let Some(package) = params.non_empty("remove_notification") {
        return Action::RemoveNotification {
            package: package.to_string(),
        };
    }

    if params.contains("clear_notifications") {
        return Action::ClearNotifications;
    }

    if COLOR_KEYS.iter().any(|key| params.contains(key)) {
        let color = match params.get("rgb") {
            Some(rgb) => rgb.to_string(),
            None => format!(
                "{} {} {}",
                params.get("r").unwrap_or("0"),
                params.get("g").unwrap_or("0"),
                params.get("b").unwrap_or("0"),
            ),
        };
        return Action::SetColor {
            ai: params.contains("ai"),
            color: Some(color),
            brightness: Brightness::parse(params.get("brightness")),
        };
    }

    if let Some(preferences) = params.non_empty("set_preferences") {
        return Action::SetPreferences(preferences.to_string());
    }

    Action::ServeGui
}
