//! Error types for loading, switching and persisting themes.

use crate::catalog::ThemeId;
use crate::document::MarkerError;

/// Error returned by the loader and switcher.
///
/// This type is `Clone` so a settled load outcome can be shared by every
/// caller waiting on it and kept in [`ThemeState::Failed`](crate::ThemeState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// The theme's stylesheet failed to load (network, HTTP or CORS failure).
    ///
    /// The previously active theme stays visible.
    #[error("failed to load theme: {theme} ({reason})")]
    Load {
        /// The theme whose stylesheet failed.
        theme: String,
        /// What the document reported.
        reason: String,
    },

    /// The name is not in the theme catalog.
    #[error("unknown theme: \"{0}\"")]
    InvalidTheme(String),

    /// A later switch started before this one finished loading.
    #[error("switch to theme {theme} was superseded by a later switch")]
    Superseded {
        /// The theme this switch was going to activate.
        theme: ThemeId,
    },

    /// The theme preference could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The document could not carry the theme's marker.
    #[error(transparent)]
    Marker(#[from] MarkerError),
}

impl ThemeError {
    /// Returns the theme a load failure refers to.
    pub fn load_failure_theme(&self) -> Option<&str> {
        match self {
            ThemeError::Load { theme, .. } => Some(theme),
            _ => None,
        }
    }
}

/// Error returned by a [`KeyValueStore`](crate::KeyValueStore) write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing storage rejected the write.
    #[error("failed to persist \"{key}\": {reason}")]
    Write { key: String, reason: String },
}

/// Error returned when a theme configuration cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value the loader cannot work with.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
