//! Theme identifiers published on the CDN.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ThemeError;

/// Every theme the CDN publishes, in catalog order.
///
/// Each entry maps to one stylesheet named `<theme>.theme.css`.
pub const THEMES: &[&str] = &[
    // Core brand
    "bayer",
    "bayer2_5",
    // Seeds and traits
    "asgrow",
    "dekalb",
    "deltapine",
    "fontanelle",
    "goldcountry",
    "hubnerseed",
    "intacta",
    "jungseedgenetics",
    "kruger",
    "latijereta",
    "lewishybrids",
    "monsoy",
    "rea",
    "specialtyhybrids",
    "stewart",
    "stoneseed",
    "westbred",
    // Digital platforms
    "velocity",
    "climatefieldview",
    "climatefieldviewcrate",
    "climateportal",
    "channel",
    "bayerplusrewards",
    "hortiview",
    "vegstate",
    "forground",
    // Pharmaceuticals
    "aspirincardio",
    "diane35",
    "eylea",
    "jivi",
    "kerendia",
    "kovaltry",
    "kyleena",
    "mirena",
    "nexavar",
    "nuqeba",
    "qlaira",
    "stivarga",
    "verquvo",
    "visanne",
    "vitrakvi",
    "xarelto",
    "xofigo",
    "yasmin",
    "yaz",
    // Data and technology
    "dataenablement",
    "devtools",
    "dad",
    // Healthcare professional
    "hcp",
];

static THEME_INDEX: Lazy<HashSet<&'static str>> = Lazy::new(|| THEMES.iter().copied().collect());

/// Returns the catalog of theme names.
pub fn available_themes() -> &'static [&'static str] {
    THEMES
}

/// Returns true if `name` is a catalog theme.
pub fn is_valid_theme(name: &str) -> bool {
    THEME_INDEX.contains(name)
}

/// A theme identifier drawn from [`THEMES`].
///
/// A `ThemeId` can only be obtained by looking a name up in the catalog, so
/// holding one is proof of membership.
///
/// # Example
///
/// ```rust
/// use element_themes::ThemeId;
///
/// let theme = ThemeId::parse("velocity").unwrap();
/// assert_eq!(theme.as_str(), "velocity");
/// assert!(ThemeId::parse("not-a-theme").is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeId(&'static str);

impl ThemeId {
    /// The core brand theme, used as the default.
    pub const BAYER: ThemeId = ThemeId("bayer");

    /// Looks `name` up in the catalog.
    pub fn parse(name: &str) -> Option<Self> {
        THEME_INDEX.get(name).copied().map(ThemeId)
    }

    /// Returns the identifier as it appears in URLs and storage.
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Iterates over all catalog themes in catalog order.
    pub fn all() -> impl Iterator<Item = ThemeId> {
        THEMES.iter().copied().map(ThemeId)
    }
}

impl fmt::Debug for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThemeId({})", self.0)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for ThemeId {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::parse(s).ok_or_else(|| ThemeError::InvalidTheme(s.to_string()))
    }
}

impl AsRef<str> for ThemeId {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl Serialize for ThemeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ThemeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        ThemeId::parse(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown theme \"{}\"", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_no_duplicates() {
        assert_eq!(THEME_INDEX.len(), THEMES.len());
    }

    #[test]
    fn test_bayer_constant_is_in_catalog() {
        assert_eq!(ThemeId::parse("bayer"), Some(ThemeId::BAYER));
    }

    #[test]
    fn test_is_valid_theme() {
        assert!(is_valid_theme("bayer"));
        assert!(is_valid_theme("hcp"));
        assert!(!is_valid_theme("Bayer"));
        assert!(!is_valid_theme(""));
        assert!(!is_valid_theme("bayer "));
    }

    #[test]
    fn test_parse_returns_static_name() {
        let theme = ThemeId::parse(&String::from("asgrow")).unwrap();
        assert_eq!(theme.as_str(), "asgrow");
        assert_eq!(theme.to_string(), "asgrow");
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "legacy-theme".parse::<ThemeId>().unwrap_err();
        assert_eq!(err, ThemeError::InvalidTheme("legacy-theme".to_string()));
    }

    #[test]
    fn test_all_follows_catalog_order() {
        let names: Vec<_> = ThemeId::all().map(|t| t.as_str()).collect();
        assert_eq!(names, THEMES);
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let theme = ThemeId::parse("velocity").unwrap();
        assert_eq!(serde_json::to_string(&theme).unwrap(), "\"velocity\"");

        let back: ThemeId = serde_json::from_str("\"velocity\"").unwrap();
        assert_eq!(back, theme);

        let err = serde_json::from_str::<ThemeId>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("unknown theme"));
    }
}
