//! Configuration for a context root
//!
//! Loaded from TOML. Every table is optional; missing values fall back to the
//! built-in defaults.
//!
//! ```toml
//! initialSection = "problem-1"
//!
//! [preferences]
//! theme = "dark"
//! fontSize = "large"
//!
//! [environment]
//! width = 390
//! height = 844
//! dark = true
//! ```

use crate::device::StaticEnvironment;
use crate::error::ContextError;
use crate::types::{Preferences, DEFAULT_ACTIVE_SECTION};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ContextConfig {
    /// Preferences installed at startup and restored on reset
    pub preferences: Preferences,
    /// Section reported as active before anything scrolls into view
    pub initial_section: String,
    /// Environment snapshot for hosts without live signals
    pub environment: StaticEnvironment,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            preferences: Preferences::default(),
            initial_section: DEFAULT_ACTIVE_SECTION.to_string(),
            environment: StaticEnvironment::default(),
        }
    }
}

impl ContextConfig {
    pub fn from_toml(text: &str) -> Result<Self, ContextError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ContextError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded context config");
        Ok(config)
    }
}
