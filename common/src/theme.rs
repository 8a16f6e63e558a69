use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectable UI themes. Stored and sent as the lowercase identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Default,
    Warm,
    Dark,
    Glass,
    Bold,
}

impl ThemeId {
    pub fn all() -> &'static [ThemeId] {
        &[
            ThemeId::Default,
            ThemeId::Warm,
            ThemeId::Dark,
            ThemeId::Glass,
            ThemeId::Bold,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Default => "default",
            ThemeId::Warm => "warm",
            ThemeId::Dark => "dark",
            ThemeId::Glass => "glass",
            ThemeId::Bold => "bold",
        }
    }

    /// Catalog entry for this theme.
    pub fn info(&self) -> &'static ThemeInfo {
        // THEMES is declared in `all()` order.
        &THEMES[*self as usize]
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five theme identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme '{}'", self.0)
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for ThemeId {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeId::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Picker entry: display name, one-line description and three swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeInfo {
    pub id: ThemeId,
    pub name: &'static str,
    pub description: &'static str,
    /// Accent, surface and text colors as `#rrggbb`.
    pub swatches: [&'static str; 3],
}

pub const THEMES: [ThemeInfo; 5] = [
    ThemeInfo {
        id: ThemeId::Default,
        name: "Fresh Green",
        description: "Original clean green",
        swatches: ["#16a34a", "#f3f4f6", "#111827"],
    },
    ThemeInfo {
        id: ThemeId::Warm,
        name: "Warm Organic",
        description: "Cream & sage tones",
        swatches: ["#5c7a3e", "#faf7f2", "#2d2416"],
    },
    ThemeInfo {
        id: ThemeId::Dark,
        name: "Dark Pantry",
        description: "Premium dark mode",
        swatches: ["#4ade80", "#141414", "#f5f5f5"],
    },
    ThemeInfo {
        id: ThemeId::Glass,
        name: "Airy Glass",
        description: "Frosted glass on gradient",
        swatches: ["#2e7d32", "#e8f5e9", "#1a1a2e"],
    },
    ThemeInfo {
        id: ThemeId::Bold,
        name: "Bold Type",
        description: "Confident blue palette",
        swatches: ["#0052cc", "#f8f9fa", "#091e42"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_ids() {
        assert_eq!(THEMES.len(), ThemeId::all().len());
        for (info, id) in THEMES.iter().zip(ThemeId::all()) {
            assert_eq!(info.id, *id);
            assert_eq!(id.info().id, *id);
        }
    }

    #[test]
    fn test_swatches_are_hex_colors() {
        for info in &THEMES {
            for s in info.swatches {
                assert_eq!(s.len(), 7, "{s}");
                assert!(s.starts_with('#'));
                assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit()), "{s}");
            }
        }
    }

    #[test]
    fn test_parse_round_trips_identifier() {
        for id in ThemeId::all() {
            assert_eq!(id.to_string().parse::<ThemeId>(), Ok(*id));
        }
        assert_eq!(
            "Dark".parse::<ThemeId>(),
            Err(UnknownTheme("Dark".to_string()))
        );
        assert!("".parse::<ThemeId>().is_err());
    }

    #[test]
    fn test_default_and_serde() {
        assert_eq!(ThemeId::default(), ThemeId::Default);
        assert_eq!(serde_json::to_string(&ThemeId::Glass).unwrap(), "\"glass\"");
    }
}
