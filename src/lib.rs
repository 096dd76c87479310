//! # Element Themes
//!
//! Runtime switching of CDN-hosted CSS color themes.
//!
//! Every theme in the catalog is one stylesheet, `<cdn>/<name>.theme.css`,
//! that defines the same set of color custom properties: four ramps
//! (`primary`, `secondary`, `danger`, `success`) at ten levels each. Switching
//! themes means loading that stylesheet once, marking the document with a
//! `theme-<name>` class, persisting the choice and announcing the change.
//!
//! ## Quick Start
//!
//! ```rust
//! use element_themes::document::{MemoryDocument, StaticFetcher};
//! use element_themes::{ColorLevel, ColorRamp, MemoryStore, ThemeConfig, ThemeEvents, ThemeLoader};
//! use futures::executor::block_on;
//!
//! let fetcher = StaticFetcher::new()
//!     .with_sheet("bayer.theme.css", ":root { --primary-400: #10384f }")
//!     .with_sheet("velocity.theme.css", ".theme-velocity { --primary-400: #0091df }");
//!
//! let events = ThemeEvents::new();
//! let changes = events.subscribe();
//! let loader = ThemeLoader::new(
//!     ThemeConfig::default(),
//!     MemoryDocument::new(fetcher),
//!     MemoryStore::new(),
//!     events,
//! );
//!
//! block_on(loader.switch_theme("velocity")).unwrap();
//!
//! assert_eq!(loader.current_theme().map(|t| t.as_str()), Some("velocity"));
//! assert_eq!(loader.color(ColorRamp::Primary, ColorLevel::L400), "var(--primary-400)");
//! assert_eq!(
//!     loader.computed_color(ColorRamp::Primary, ColorLevel::L400).as_deref(),
//!     Some("#0091df")
//! );
//! assert_eq!(changes.try_recv().unwrap().theme.as_str(), "velocity");
//! ```
//!
//! ## Capabilities
//!
//! The loader is generic over three capabilities so it runs the same way in a
//! browser, in a terminal and under test:
//!
//! | Capability | Headless | Browser (feature `web`) |
//! |------------|----------|-------------------------|
//! | [`Document`] | [`document::MemoryDocument`] | `web::BrowserDocument` |
//! | [`KeyValueStore`] | [`MemoryStore`], [`FileStore`] | `web::LocalStorageStore` |
//! | [`Notifier`] | [`ThemeEvents`] | `web::DomEventNotifier` |
//!
//! ## Modules
//!
//! - [`catalog`]: theme names, ramps and levels
//! - [`loader`]: loading, switching and reading
//! - [`document`], [`store`], [`events`]: capability traits and implementations
//! - [`exports`]: `@import` lines, the color table and per-theme handles
//! - [`preview`]: terminal swatches of the active ramps

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod exports;
pub mod loader;
pub mod preview;
pub mod store;
pub mod util;
#[cfg(feature = "web")]
pub mod web;

pub use catalog::{
    available_themes, is_valid_theme, ColorLevel, ColorRamp, ThemeId, UnknownToken, THEMES,
};
pub use config::{
    ThemeConfig, DEFAULT_CDN_BASE, DEFAULT_MARKER_PREFIX, DEFAULT_STORAGE_KEY,
    THEME_CHANGED_EVENT,
};
pub use document::{Document, MarkerError, StylesheetAttacher, StylesheetError, StylesheetLink};
pub use error::{ConfigError, StoreError, ThemeError};
pub use events::{Notifier, ThemeChanged, ThemeEvents};
pub use exports::{theme_imports, ColorTable, ThemeHandle};
pub use loader::{computed_value, property_name, variable_reference, ThemeLoader, ThemeState};
pub use store::{FileStore, KeyValueStore, MemoryStore};
