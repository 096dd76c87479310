//! Color ramps and intensity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a ramp or level token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} \"{token}\"")]
pub struct UnknownToken {
    /// Which kind of token was being parsed ("color ramp" or "color level").
    pub kind: &'static str,
    /// The rejected input.
    pub token: String,
}

/// A semantic color role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRamp {
    Primary,
    Secondary,
    Danger,
    Success,
}

impl ColorRamp {
    /// All ramps in catalog order.
    pub const ALL: [ColorRamp; 4] = [
        ColorRamp::Primary,
        ColorRamp::Secondary,
        ColorRamp::Danger,
        ColorRamp::Success,
    ];

    /// The token used in custom property names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorRamp::Primary => "primary",
            ColorRamp::Secondary => "secondary",
            ColorRamp::Danger => "danger",
            ColorRamp::Success => "success",
        }
    }
}

impl fmt::Display for ColorRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorRamp {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRamp::ALL
            .into_iter()
            .find(|ramp| ramp.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "color ramp",
                token: s.to_string(),
            })
    }
}

/// An intensity token within a ramp.
///
/// Variants are declared light to dark, so the derived ordering matches the
/// color system's convention. Nothing enforces that a theme's values actually
/// get darker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorLevel {
    #[serde(rename = "50")]
    L50,
    #[serde(rename = "100")]
    L100,
    #[serde(rename = "200")]
    L200,
    #[serde(rename = "300")]
    L300,
    #[serde(rename = "400")]
    L400,
    #[serde(rename = "500")]
    L500,
    #[serde(rename = "600")]
    L600,
    #[serde(rename = "700")]
    L700,
    #[serde(rename = "800")]
    L800,
    #[serde(rename = "900")]
    L900,
}

impl ColorLevel {
    /// All levels, lightest first.
    pub const ALL: [ColorLevel; 10] = [
        ColorLevel::L50,
        ColorLevel::L100,
        ColorLevel::L200,
        ColorLevel::L300,
        ColorLevel::L400,
        ColorLevel::L500,
        ColorLevel::L600,
        ColorLevel::L700,
        ColorLevel::L800,
        ColorLevel::L900,
    ];

    /// The conventional base intensity.
    pub const DEFAULT: ColorLevel = ColorLevel::L400;

    /// The token used in custom property names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorLevel::L50 => "50",
            ColorLevel::L100 => "100",
            ColorLevel::L200 => "200",
            ColorLevel::L300 => "300",
            ColorLevel::L400 => "400",
            ColorLevel::L500 => "500",
            ColorLevel::L600 => "600",
            ColorLevel::L700 => "700",
            ColorLevel::L800 => "800",
            ColorLevel::L900 => "900",
        }
    }
}

impl Default for ColorLevel {
    fn default() -> Self {
        ColorLevel::DEFAULT
    }
}

impl fmt::Display for ColorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorLevel {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "color level",
                token: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_tokens() {
        let names: Vec<_> = ColorRamp::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, ["primary", "secondary", "danger", "success"]);
    }

    #[test]
    fn test_level_tokens_light_to_dark() {
        let names: Vec<_> = ColorLevel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(
            names,
            ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"]
        );
        assert!(ColorLevel::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_level_is_400() {
        assert_eq!(ColorLevel::default(), ColorLevel::L400);
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("danger".parse::<ColorRamp>(), Ok(ColorRamp::Danger));
        assert_eq!("700".parse::<ColorLevel>(), Ok(ColorLevel::L700));

        let err = "950".parse::<ColorLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown color level \"950\"");

        let err = "Primary".parse::<ColorRamp>().unwrap_err();
        assert_eq!(err.kind, "color ramp");
    }

    #[test]
    fn test_serde_tokens() {
        assert_eq!(
            serde_json::to_string(&ColorRamp::Secondary).unwrap(),
            "\"secondary\""
        );
        assert_eq!(serde_json::to_string(&ColorLevel::L50).unwrap(), "\"50\"");
        let level: ColorLevel = serde_json::from_str("\"900\"").unwrap();
        assert_eq!(level, ColorLevel::L900);
    }
}
