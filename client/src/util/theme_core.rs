//! Pure theme resolution.
//!
//! No DOM or storage access beyond the color-scheme query passed in by the
//! caller, so these functions are safe during SSR and in tests.

#[cfg(test)]
#[path = "theme_core_test.rs"]
mod theme_core_test;

use serde::{Deserialize, Serialize};

use crate::host::ColorScheme;

/// Resolved theme actually applied to the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }
}

/// What the user asked for. `System` follows the OS scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Parse a persisted preference. Anything else is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light Mode",
            Self::Dark => "Dark Mode",
            Self::System => "System",
        }
    }
}

/// Resolved theme together with the preference it came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub theme: ThemeName,
    pub preference: ThemePreference,
}

/// Toggle copy derived from a [`ThemeState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeDescription {
    pub next_preference: ThemePreference,
    pub message: String,
}

/// OS scheme, or light when it cannot be evaluated.
pub fn system_theme(scheme: &dyn ColorScheme) -> ThemeName {
    ThemeName::from_dark(scheme.prefers_dark().unwrap_or(false))
}

pub fn calculate_theme(preference: ThemePreference, system: ThemeName) -> ThemeName {
    match preference {
        ThemePreference::Light => ThemeName::Light,
        ThemePreference::Dark => ThemeName::Dark,
        ThemePreference::System => system,
    }
}

/// [`calculate_theme`], probing the OS only when the preference needs it.
pub fn resolve_theme(preference: ThemePreference, scheme: &dyn ColorScheme) -> ThemeName {
    match preference {
        ThemePreference::System => system_theme(scheme),
        explicit => calculate_theme(explicit, ThemeName::Light),
    }
}

/// system → light → dark → system.
pub fn cycle_preference(preference: ThemePreference) -> ThemePreference {
    match preference {
        ThemePreference::System => ThemePreference::Light,
        ThemePreference::Light => ThemePreference::Dark,
        ThemePreference::Dark => ThemePreference::System,
    }
}

pub fn describe_state(state: ThemeState) -> ThemeDescription {
    let next_preference = cycle_preference(state.preference);
    let current = match state.preference {
        ThemePreference::System => format!("{} (currently {})", ThemePreference::System.label(), state.theme.as_str()),
        explicit => explicit.label().to_owned(),
    };
    ThemeDescription {
        next_preference,
        message: format!("Current theme: {current}. Click to switch to {}", next_preference.label()),
    }
}
