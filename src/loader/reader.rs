//! Color lookups against the active theme.

use super::loader::ThemeLoader;
use crate::catalog::{ColorLevel, ColorRamp};
use crate::document::Document;
use crate::events::Notifier;
use crate::store::KeyValueStore;

/// Custom property name for a ramp and level, e.g. `--primary-400`.
pub fn property_name(ramp: ColorRamp, level: ColorLevel) -> String {
    format!("--{}-{}", ramp.as_str(), level.as_str())
}

/// CSS reference to a ramp and level, e.g. `var(--primary-400)`.
///
/// This is symbolic, so it works whether or not any theme is loaded; the
/// browser resolves it against whichever theme is active at render time.
///
/// ```rust
/// use element_themes::{variable_reference, ColorLevel, ColorRamp};
///
/// assert_eq!(
///     variable_reference(ColorRamp::Secondary, ColorLevel::L700),
///     "var(--secondary-700)"
/// );
/// ```
pub fn variable_reference(ramp: ColorRamp, level: ColorLevel) -> String {
    format!("var({})", property_name(ramp, level))
}

/// Current value of a ramp and level on `document`'s root element.
///
/// Returns `None` without a document, or when the property is unset or
/// blank. Values are not cached; call again after every theme change.
pub fn computed_value<D>(document: Option<&D>, ramp: ColorRamp, level: ColorLevel) -> Option<String>
where
    D: Document + ?Sized,
{
    let value = document?.computed_property(&property_name(ramp, level))?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl<D, S, N> ThemeLoader<D, S, N>
where
    D: Document,
    S: KeyValueStore,
    N: Notifier,
{
    /// See [`variable_reference`].
    pub fn color(&self, ramp: ColorRamp, level: ColorLevel) -> String {
        variable_reference(ramp, level)
    }

    /// See [`computed_value`].
    pub fn computed_color(&self, ramp: ColorRamp, level: ColorLevel) -> Option<String> {
        computed_value(Some(&self.document), ramp, level)
    }
}
