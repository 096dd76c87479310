//! Static catalog of themes and color tokens.
//!
//! This module provides:
//!
//! - [`ThemeId`]: A theme identifier that is known to be in the catalog
//! - [`ColorRamp`]: The semantic color roles every theme defines
//! - [`ColorLevel`]: The intensity tokens within a ramp, light to dark
//!
//! Nothing here can be mutated at runtime. Themes are only ever selected.

mod color;
mod themes;

pub use color::{ColorLevel, ColorRamp, UnknownToken};
pub use themes::{available_themes, is_valid_theme, ThemeId, THEMES};
