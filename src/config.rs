//! Loader configuration.
//!
//! [`ThemeConfig`] holds every name the loader writes into the outside world:
//! the CDN base, the storage key, the marker prefix and the event name. All
//! fields have defaults, so a configuration file only needs the fields it
//! changes.
//!
//! ```rust
//! use element_themes::ThemeConfig;
//!
//! let config = ThemeConfig::from_yaml("cdn_base: https://cdn.example.com/themes/").unwrap();
//! assert_eq!(
//!     config.stylesheet_url("velocity"),
//!     "https://cdn.example.com/themes/velocity.theme.css"
//! );
//! assert_eq!(config.storage_key, "element-theme");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ThemeId;
use crate::error::ConfigError;

/// CDN location of the published theme stylesheets.
pub const DEFAULT_CDN_BASE: &str = "https://cloudfront.885812045782.cloud.bayer.com/element-themes";

/// Storage key holding the last selected theme.
pub const DEFAULT_STORAGE_KEY: &str = "element-theme";

/// Prefix for both the stylesheet link id and the root marker class.
pub const DEFAULT_MARKER_PREFIX: &str = "theme-";

/// Name of the broadcast event announcing a theme change.
pub const THEME_CHANGED_EVENT: &str = "elementThemeChanged";

/// Settings shared by the loader, the switcher and the capability adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Base URL the `<theme>.theme.css` files are served from.
    pub cdn_base: String,
    /// Key the selected theme is persisted under.
    pub storage_key: String,
    /// Prefix of the link element id and the root marker class.
    pub marker_prefix: String,
    /// Event name used by adapters that broadcast outside the process.
    pub event_name: String,
    /// Theme used when nothing valid has been persisted.
    pub default_theme: ThemeId,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            event_name: THEME_CHANGED_EVENT.to_string(),
            default_theme: ThemeId::BAYER,
        }
    }
}

impl ThemeConfig {
    /// Creates a default configuration pointing at a different CDN base.
    pub fn with_cdn_base(cdn_base: impl Into<String>) -> Self {
        Self {
            cdn_base: cdn_base.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, choosing the format by extension.
    ///
    /// `.json` is parsed as JSON, `.yaml` and `.yml` as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&source),
            Some("yaml") | Some("yml") => Self::from_yaml(&source),
            _ => Err(ConfigError::Invalid(format!(
                "unsupported configuration format: {}",
                path.display()
            ))),
        }
    }

    /// Checks the fields the loader builds names from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cdn_base.trim_end_matches('/').is_empty() {
            return Err(ConfigError::Invalid("cdn_base must not be empty".into()));
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.marker_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "marker_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// URL of a theme's stylesheet.
    pub fn stylesheet_url(&self, theme: &str) -> String {
        format!("{}/{}.theme.css", self.cdn_base.trim_end_matches('/'), theme)
    }

    /// Id of the link element carrying a theme's stylesheet.
    pub fn link_id(&self, theme: &str) -> String {
        format!("{}{}", self.marker_prefix, theme)
    }

    /// Root element class marking a theme as active.
    pub fn marker(&self, theme: &str) -> String {
        format!("{}{}", self.marker_prefix, theme)
    }
}
