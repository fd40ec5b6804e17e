#![forbid(unsafe_code)]

//! Mount options passed from JavaScript as a single JSON object.
//!
//! ```json
//! {
//!   "config": { "scroll_threshold": 50, "mobile_breakpoint": 768 },
//!   "selectors": { "navbar": "#site-nav" },
//!   "log_level": "debug"
//! }
//! ```
//!
//! Every key is optional.

use serde::Deserialize;
use sitenav_core::NavConfig;

use crate::error::WebError;

/// CSS selectors used to discover the navigation structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavSelectors {
    pub navbar: String,
    pub menu: String,
    /// The toggle is optional; a page without one never opens the menu.
    pub toggle: String,
    pub links: String,
    pub sections: String,
}

impl Default for NavSelectors {
    fn default() -> Self {
        Self {
            navbar: ".navbar".to_string(),
            menu: ".nav-menu".to_string(),
            toggle: ".nav-toggle".to_string(),
            links: ".nav-link".to_string(),
            sections: "section[id]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountOptions {
    pub config: NavConfig,
    pub selectors: NavSelectors,
    /// Installs console logging at this level when set.
    pub log_level: Option<String>,
}

impl MountOptions {
    /// Parse options; `None` or blank input yields the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, WebError> {
        let Some(json) = json.filter(|s| !s.trim().is_empty()) else {
            return Ok(Self::default());
        };
        let mut options: Self = serde_json::from_str(json)?;
        options.config = options.config.validated();
        Ok(options)
    }
}
