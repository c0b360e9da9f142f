//! Application configuration.
//!
//! Class names can come from a TOML manifest; the mount node is a live
//! handle and is only set in code.
//!
//! ```toml
//! root_view_class = "app-root"
//! safe_area_class = "overlay"
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::host::NodeId;

/// Default class of the fixed overlay area.
pub const DEFAULT_SAFE_AREA_CLASS: &str = "safe-area";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid app config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for [`AppController`](super::AppController).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where `run` appends the app's containers. `None` means the host body.
    #[serde(skip)]
    pub app_mount: Option<NodeId>,
    /// Class applied to the page content root.
    pub root_view_class: String,
    /// Class applied to the fixed overlay area.
    pub safe_area_class: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_mount: None,
            root_view_class: String::new(),
            safe_area_class: DEFAULT_SAFE_AREA_CLASS.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse class names from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Mount the app under `mount` instead of the host body.
    pub fn with_mount(mut self, mount: NodeId) -> Self {
        self.app_mount = Some(mount);
        self
    }

    /// Set the page content root class.
    pub fn with_root_view_class(mut self, class_name: impl Into<String>) -> Self {
        self.root_view_class = class_name.into();
        self
    }
}
