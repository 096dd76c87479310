//! Helpers for wiring themes into stylesheets and UI code.
//!
//! - [`theme_imports`]: `@import` lines for every catalog theme
//! - [`ColorTable`]: the full ramp/level grid of variable references, in the
//!   shape utility-class frameworks expect for a color palette
//! - [`ThemeHandle`]: operations bound to one theme

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::catalog::{ColorLevel, ColorRamp, ThemeId};
use crate::config::ThemeConfig;
use crate::document::Document;
use crate::error::ThemeError;
use crate::events::Notifier;
use crate::loader::{variable_reference, ThemeLoader};
use crate::store::KeyValueStore;

/// One `@import url('...');` line per catalog theme, newline separated.
pub fn theme_imports(config: &ThemeConfig) -> String {
    ThemeId::all()
        .map(|theme| format!("@import url('{}');", config.stylesheet_url(theme.as_str())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every ramp and level mapped to its variable reference.
///
/// Serializes as a nested map in catalog order:
///
/// ```rust
/// use element_themes::ColorTable;
///
/// let json = serde_json::to_value(ColorTable::new()).unwrap();
/// assert_eq!(json["primary"]["400"], "var(--primary-400)");
/// assert_eq!(json["success"]["50"], "var(--success-50)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    ramps: Vec<(ColorRamp, Vec<(ColorLevel, String)>)>,
}

impl ColorTable {
    pub fn new() -> Self {
        let ramps = ColorRamp::ALL
            .into_iter()
            .map(|ramp| {
                let levels = ColorLevel::ALL
                    .into_iter()
                    .map(|level| (level, variable_reference(ramp, level)))
                    .collect();
                (ramp, levels)
            })
            .collect();
        Self { ramps }
    }

    /// Looks up one entry.
    pub fn get(&self, ramp: ColorRamp, level: ColorLevel) -> Option<&str> {
        self.ramps
            .iter()
            .find(|(r, _)| *r == ramp)?
            .1
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, reference)| reference.as_str())
    }

    /// Iterates `(ramp, level, reference)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorRamp, ColorLevel, &str)> {
        self.ramps.iter().flat_map(|(ramp, levels)| {
            levels
                .iter()
                .map(move |(level, reference)| (*ramp, *level, reference.as_str()))
        })
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

struct LevelMap<'a>(&'a [(ColorLevel, String)]);

impl Serialize for LevelMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (level, reference) in self.0 {
            map.serialize_entry(level.as_str(), reference)?;
        }
        map.end()
    }
}

impl Serialize for ColorTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ramps.len()))?;
        for (ramp, levels) in &self.ramps {
            map.serialize_entry(ramp.as_str(), &LevelMap(levels))?;
        }
        map.end()
    }
}

/// Loader operations bound to a single theme.
///
/// Obtained from [`ThemeLoader::handle`].
pub struct ThemeHandle<'a, D, S, N> {
    loader: &'a ThemeLoader<D, S, N>,
    theme: ThemeId,
}

impl<'a, D, S, N> ThemeHandle<'a, D, S, N>
where
    D: Document,
    S: KeyValueStore,
    N: Notifier,
{
    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    /// Loads the theme's stylesheet without activating it.
    pub async fn load(&self) -> Result<(), ThemeError> {
        self.loader
            .ensure_stylesheet_loaded(self.theme.as_str())
            .await
    }

    /// Makes this theme the active one.
    pub async fn switch(&self) -> Result<(), ThemeError> {
        self.loader.switch_to(self.theme).await
    }

    pub fn color(&self, ramp: ColorRamp, level: ColorLevel) -> String {
        self.loader.color(ramp, level)
    }

    /// The computed value, read from whatever theme is active.
    pub fn computed_color(&self, ramp: ColorRamp, level: ColorLevel) -> Option<String> {
        self.loader.computed_color(ramp, level)
    }
}

impl<D, S, N> ThemeLoader<D, S, N>
where
    D: Document,
    S: KeyValueStore,
    N: Notifier,
{
    /// Returns a handle bound to `theme`.
    pub fn handle(&self, theme: ThemeId) -> ThemeHandle<'_, D, S, N> {
        ThemeHandle {
            loader: self,
            theme,
        }
    }
}
