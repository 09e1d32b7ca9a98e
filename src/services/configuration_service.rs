//! Display mode configuration shared by responsive views.
//!
//! Views that render differently on desktop and mobile read the current
//! [`Configuration`] and subscribe to changes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Layout family the application is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Full desktop layout.
    #[default]
    Desktop,
    /// Compact mobile layout.
    Mobile,
}

/// Current view configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Active display mode.
    pub display_mode: DisplayMode,
}

/// A partial update merged into the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigurationUpdate {
    /// New display mode, if changing.
    pub display_mode: Option<DisplayMode>,
}

impl ConfigurationUpdate {
    /// An update that switches the display mode.
    pub fn display_mode(mode: DisplayMode) -> Self {
        Self {
            display_mode: Some(mode),
        }
    }
}

/// Holds the current configuration and notifies subscribers of changes.
///
/// Cloning is cheap and clones share the same configuration.
#[derive(Debug, Clone)]
pub struct ConfigurationService {
    sender: Arc<watch::Sender<Configuration>>,
}

impl Default for ConfigurationService {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl ConfigurationService {
    /// Creates a service starting from `initial`.
    pub fn new(initial: Configuration) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns the current configuration.
    pub fn configuration(&self) -> Configuration {
        *self.sender.borrow()
    }

    /// Merges `update` into the current configuration and notifies
    /// subscribers.
    pub fn update(&self, update: ConfigurationUpdate) {
        self.sender.send_modify(|current| {
            if let Some(mode) = update.display_mode {
                current.display_mode = mode;
            }
        });
        tracing::debug!(configuration = ?self.configuration(), "configuration updated");
    }

    /// Subscribes to configuration changes. The receiver sees the current
    /// value immediately.
    pub fn subscribe(&self) -> watch::Receiver<Configuration> {
        self.sender.subscribe()
    }

    /// Whether content for `mode` should currently be shown.
    pub fn is_visible(&self, mode: DisplayMode) -> bool {
        self.configuration().display_mode == mode
    }
}
