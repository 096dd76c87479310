//! The theme loader: loading, switching and reading themes.
//!
//! [`ThemeLoader`] owns the active theme state and drives three injected
//! capabilities:
//!
//! - a [`Document`](crate::Document) for stylesheets, markers and computed styles
//! - a [`KeyValueStore`](crate::KeyValueStore) for the persisted preference
//! - a [`Notifier`](crate::Notifier) for change announcements
//!
//! Its operations are split by concern:
//!
//! | Concern  | Operations |
//! |----------|------------|
//! | Loader   | [`ensure_stylesheet_loaded`](ThemeLoader::ensure_stylesheet_loaded), [`preload`](ThemeLoader::preload) |
//! | Switcher | [`switch_theme`](ThemeLoader::switch_theme), [`initialize`](ThemeLoader::initialize) |
//! | Reader   | [`color`](ThemeLoader::color), [`computed_color`](ThemeLoader::computed_color) |
//!
//! The loader is single-threaded. Its operations take `&self` and return
//! futures that may be driven by any executor; overlapping calls are allowed
//! and coordinated internally.

#[allow(clippy::module_inception)]
mod loader;
mod reader;
mod state;
mod switcher;

pub use loader::ThemeLoader;
pub use reader::{computed_value, property_name, variable_reference};
pub use state::ThemeState;
