//! Executes request actions against a status store.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::action::interpret;
use crate::action::Action;
use crate::action::Params;
use crate::color::Brightness;
use crate::color::Rgb;
use crate::error::StoreError;
use crate::notifications::NotificationRegistry;
use crate::status::read_ambient;
use crate::status::write_ambient;
use crate::status::AmbientRecord;
use crate::status::Slot;
use crate::status::StatusStore;

/// What the front door should answer after an action ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request was handled; reply `ok`.
    Ok,
    /// The request was not understood; reply with the control page.
    ServeGui,
}

/// Applies actions to the status store.
///
/// Failures are logged and never returned: a request that cannot be carried
/// out still answers `ok`. This is cheap to clone.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    store: Arc<dyn StatusStore>,
    notifications: Mutex<()>,
}

impl Controller {
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                store,
                notifications: Mutex::new(()),
            }),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &dyn StatusStore {
        self.inner.store.as_ref()
    }

    /// Interprets and executes request parameters.
    pub async fn handle(&self, params: &Params) -> Outcome {
        let action = interpret(params);
        if action == Action::ServeGui {
            log::warn!("Unrecognised params: {:?}", params);
        }
        self.execute(action).await
    }

    /// Executes an action, logging any failure.
    pub async fn execute(&self, action: Action) -> Outcome {
        let result = match action {
            Action::AddNotification { package, rgb } => {
                let _guard = self.inner.notifications.lock().await;
                self.registry().add(&package, rgb.as_deref()).await
            }
            Action::RemoveNotification { package } => {
                let _guard = self.inner.notifications.lock().await;
                self.registry().remove(&package).await
            }
            Action::ClearNotifications => {
                let _guard = self.inner.notifications.lock().await;
                self.registry().clear().await
            }
            Action::SetColor {
                ai,
                color,
                brightness,
            } => self.set_color(ai, color.as_deref(), brightness).await.map(|_| ()),
            Action::SetPreferences(preferences) => self.set_preferences(preferences).await,
            Action::ServeGui => return Outcome::ServeGui,
        };

        if let Err(e) = result {
            log::error!("{}", e);
        }
        Outcome::Ok
    }

    /// Resolves `color`, scales it by `brightness` and writes it to the
    /// ambient slot for `ai`.
    ///
    /// Returns the written record, or `None` when the color could not be
    /// resolved. `None` as `color` reuses the stored human ambient color.
    pub async fn set_color(
        &self,
        ai: bool,
        color: Option<&str>,
        brightness: Brightness,
    ) -> Result<Option<AmbientRecord>, StoreError> {
        log::info!("color: {:?} brightness: {:?}", color, brightness);

        let rgb = match color {
            Some(color) => match Rgb::resolve(color) {
                Ok(rgb) => rgb,
                Err(e) => {
                    log::error!("Error setting color: {}", e);
                    return Ok(None);
                }
            },
            None => match read_ambient(self.store(), false).await? {
                Some(record) => record.color,
                None => {
                    log::error!("Could not read color from {} slot", Slot::Ambient);
                    return Ok(None);
                }
            },
        };

        let rgb = brightness.apply(rgb);
        let record = write_ambient(self.store(), ai, rgb).await?;
        log::info!("Setting {} color to \"{}\"", Slot::ambient(ai), rgb);
        Ok(Some(record))
    }

    /// Writes the preferences blob verbatim.
    pub async fn set_preferences(&self, preferences: String) -> Result<(), StoreError> {
        log::info!("Wrote preferences: {}", preferences);
        self.store().write(Slot::Preferences, preferences).await
    }

    fn registry(&self) -> NotificationRegistry<'_> {
        NotificationRegistry::new(self.store())
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller").finish_non_exhaustive()
    }
}
