//! Display theme preference and the type-driven dynamic palette.

use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
    RedBlue,
    Emerald,
    Dynamic,
}

impl ThemePreference {
    /// Order followed by [`ThemePreference::next`].
    pub const CYCLE: [ThemePreference; 5] = [
        ThemePreference::Dark,
        ThemePreference::Light,
        ThemePreference::RedBlue,
        ThemePreference::Emerald,
        ThemePreference::Dynamic,
    ];

    pub fn next(self) -> Self {
        let index = Self::CYCLE.iter().position(|t| *t == self).unwrap_or(0);
        Self::CYCLE[(index + 1) % Self::CYCLE.len()]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
            ThemePreference::RedBlue => "Red & Blue",
            ThemePreference::Emerald => "Emerald",
            ThemePreference::Dynamic => "Dynamic",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Hex colors associated with one elemental type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub light: &'static str,
}

impl TypeColors {
    const fn new(primary: &'static str, secondary: &'static str, light: &'static str) -> Self {
        Self {
            primary,
            secondary,
            light,
        }
    }
}

impl PokemonType {
    pub fn colors(&self) -> TypeColors {
        match self {
            PokemonType::Normal => TypeColors::new("#A8A878", "#6D6D4E", "#C6C6A7"),
            PokemonType::Fire => TypeColors::new("#F08030", "#9C531F", "#F5AC78"),
            PokemonType::Water => TypeColors::new("#6890F0", "#445E9C", "#9DB7F5"),
            PokemonType::Electric => TypeColors::new("#F8D030", "#A1871F", "#FAE078"),
            PokemonType::Grass => TypeColors::new("#78C850", "#4E8234", "#A7DB8D"),
            PokemonType::Ice => TypeColors::new("#98D8D8", "#638D8D", "#BCE6E6"),
            PokemonType::Fighting => TypeColors::new("#C03028", "#7D1F1A", "#D67873"),
            PokemonType::Poison => TypeColors::new("#A040A0", "#682A68", "#C183C1"),
            PokemonType::Ground => TypeColors::new("#E0C068", "#927D44", "#EBD69D"),
            PokemonType::Flying => TypeColors::new("#A890F0", "#6D5E9C", "#C6B7F5"),
            PokemonType::Psychic => TypeColors::new("#F85888", "#A13959", "#FA92B2"),
            PokemonType::Bug => TypeColors::new("#A8B820", "#6D7815", "#C6D16E"),
            PokemonType::Rock => TypeColors::new("#B8A038", "#786824", "#D1C17D"),
            PokemonType::Ghost => TypeColors::new("#705898", "#493963", "#A292BC"),
            PokemonType::Dragon => TypeColors::new("#7038F8", "#4924A1", "#A27DFA"),
            PokemonType::Dark => TypeColors::new("#705848", "#49392F", "#A29288"),
            PokemonType::Steel => TypeColors::new("#B8B8D0", "#787887", "#D1D1E0"),
            PokemonType::Fairy => TypeColors::new("#EE99AC", "#9B6470", "#F4BDC9"),
        }
    }
}

/// Accent colors of the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accent {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub border: &'static str,
}

/// The persisted preference plus the session-only dynamic settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub preference: ThemePreference,
    pub dynamic_type: PokemonType,
    pub dark_base: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemePreference::default())
    }
}

impl Theme {
    pub fn new(preference: ThemePreference) -> Self {
        Self {
            preference,
            dynamic_type: PokemonType::Normal,
            dark_base: true,
        }
    }

    pub fn cycle(&mut self) -> ThemePreference {
        self.preference = self.preference.next();
        self.preference
    }

    pub fn toggle_dark_base(&mut self) {
        self.dark_base = !self.dark_base;
    }

    pub fn accent(&self) -> Accent {
        let (primary, secondary, border) = match self.preference {
            ThemePreference::Light => ("#e53e3e", "#38b2ac", "#cbd5e0"),
            ThemePreference::Dark => ("#ff6b6b", "#4ecdc4", "#2d2d4a"),
            ThemePreference::RedBlue => ("#ff2222", "#2266ff", "#4a2a6a"),
            ThemePreference::Emerald => ("#00ff7f", "#00cc66", "#0a5a35"),
            ThemePreference::Dynamic => {
                let colors = self.dynamic_type.colors();
                let border = if self.dark_base {
                    colors.secondary
                } else {
                    colors.light
                };
                (colors.primary, colors.secondary, border)
            }
        };
        Accent {
            primary,
            secondary,
            border,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_around() {
        let mut theme = Theme::default();
        let seen: Vec<_> = (0..5).map(|_| theme.cycle()).collect();
        assert_eq!(
            seen,
            vec![
                ThemePreference::Light,
                ThemePreference::RedBlue,
                ThemePreference::Emerald,
                ThemePreference::Dynamic,
                ThemePreference::Dark,
            ]
        );
    }

    #[test]
    fn test_preference_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ThemePreference::RedBlue).unwrap(),
            r#""red-blue""#
        );
        let parsed: ThemePreference = serde_json::from_str(r#""emerald""#).unwrap();
        assert_eq!(parsed, ThemePreference::Emerald);
    }

    #[test]
    fn test_dynamic_accent_follows_type() {
        let mut theme = Theme::new(ThemePreference::Dynamic);
        theme.dynamic_type = PokemonType::Fire;
        assert_eq!(
            theme.accent(),
            Accent {
                primary: "#F08030",
                secondary: "#9C531F",
                border: "#9C531F",
            }
        );

        theme.toggle_dark_base();
        assert_eq!(theme.accent().border, "#F5AC78");
    }

    #[test]
    fn test_fixed_theme_ignores_dynamic_type() {
        let mut theme = Theme::new(ThemePreference::Emerald);
        theme.dynamic_type = PokemonType::Ghost;
        assert_eq!(theme.accent().primary, "#00ff7f");
    }
}
