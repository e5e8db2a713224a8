use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a navigation surface should animate page transitions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavTransition {
    pub slide_px: f32,
    pub fade: bool,
    pub duration_ms: u64,
}

impl Default for NavTransition {
    fn default() -> Self {
        Self {
            slide_px: 60.0,
            fade: true,
            duration_ms: 250,
        }
    }
}

impl NavTransition {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Defaults applied to navigation calls that don't say otherwise.
///
/// ```rust
/// use waymark_core::NavigationConfig;
///
/// let cfg = NavigationConfig::from_json(r#"{ "animate": false }"#).unwrap();
/// assert!(!cfg.animate);
/// assert!(cfg.with_navigation_page);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub animate: bool,
    pub with_navigation_page: bool,
    pub transition: NavTransition,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            animate: true,
            with_navigation_page: true,
            transition: NavTransition::default(),
        }
    }
}

impl NavigationConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Serialize)
    }
}
