//! Theme naming.
//!
//! Themes are persisted as *coded theme names* of the form
//! `<light|dark>.<css-name>`, e.g. `dark.base16-ocean`. The appearance
//! prefix says which system appearance the theme is meant for; the css-name
//! identifies the theme inside the catalog.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Which appearance the user wants previews rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

impl ThemeMode {
    /// Resolve to a concrete appearance, asking `system_is_dark` only when
    /// following the system.
    pub fn resolve(self, system_is_dark: impl FnOnce() -> bool) -> Appearance {
        match self {
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
            Self::SystemDefault => {
                if system_is_dark() {
                    Appearance::Dark
                } else {
                    Appearance::Light
                }
            }
        }
    }
}

impl FromStr for ThemeMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "auto" | "system" | "systemdefault" => Ok(Self::SystemDefault),
            other => Err(AppError::Settings(format!("unknown appearance '{}'", other))),
        }
    }
}

fn coded_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(light|dark)\.([a-z0-9][a-z0-9_-]*)$").expect("coded theme pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CodedThemeName {
    appearance: Appearance,
    css_name: String,
}

impl CodedThemeName {
    pub fn new(appearance: Appearance, css_name: &str) -> Result<Self, AppError> {
        format!("{}.{}", appearance.prefix(), css_name).parse()
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn css_name(&self) -> &str {
        &self.css_name
    }
}

impl FromStr for CodedThemeName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let caps = coded_name_pattern()
            .captures(&lowered)
            .ok_or_else(|| AppError::Theme(format!("invalid theme name '{}'", s)))?;
        let appearance = match &caps[1] {
            "dark" => Appearance::Dark,
            _ => Appearance::Light,
        };
        Ok(Self {
            appearance,
            css_name: caps[2].to_string(),
        })
    }
}

impl TryFrom<String> for CodedThemeName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CodedThemeName> for String {
    fn from(value: CodedThemeName) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CodedThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.appearance.prefix(), self.css_name)
    }
}

/// Highlighting themes bundled with syntect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxTheme {
    Base16OceanDark,
    Base16OceanLight,
    Base16EightiesDark,
    Base16MochaDark,
    SolarizedDark,
    SolarizedLight,
    InspiredGitHub,
}

impl SyntaxTheme {
    /// Get the syntect theme key for this theme
    pub fn theme_key(&self) -> &'static str {
        match self {
            Self::Base16OceanDark => "base16-ocean.dark",
            Self::Base16OceanLight => "base16-ocean.light",
            Self::Base16EightiesDark => "base16-eighties.dark",
            Self::Base16MochaDark => "base16-mocha.dark",
            Self::SolarizedDark => "Solarized (dark)",
            Self::SolarizedLight => "Solarized (light)",
            Self::InspiredGitHub => "InspiredGitHub",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Base16OceanDark => "Base16 Ocean Dark",
            Self::Base16OceanLight => "Base16 Ocean Light",
            Self::Base16EightiesDark => "Base16 Eighties Dark",
            Self::Base16MochaDark => "Base16 Mocha Dark",
            Self::SolarizedDark => "Solarized Dark",
            Self::SolarizedLight => "Solarized Light",
            Self::InspiredGitHub => "Inspired GitHub",
        }
    }

    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Base16OceanDark | Self::Base16OceanLight => "base16-ocean",
            Self::Base16EightiesDark => "base16-eighties",
            Self::Base16MochaDark => "base16-mocha",
            Self::SolarizedDark | Self::SolarizedLight => "solarized",
            Self::InspiredGitHub => "inspired-github",
        }
    }

    pub fn appearance(&self) -> Appearance {
        match self {
            Self::Base16OceanLight | Self::SolarizedLight | Self::InspiredGitHub => {
                Appearance::Light
            }
            _ => Appearance::Dark,
        }
    }

    pub fn coded_name(&self) -> CodedThemeName {
        CodedThemeName {
            appearance: self.appearance(),
            css_name: self.css_name().to_string(),
        }
    }

    pub fn from_coded(name: &CodedThemeName) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.appearance() == name.appearance() && t.css_name() == name.css_name())
    }

    pub fn all() -> &'static [SyntaxTheme] {
        &[
            Self::Base16OceanDark,
            Self::Base16OceanLight,
            Self::Base16EightiesDark,
            Self::Base16MochaDark,
            Self::SolarizedDark,
            Self::SolarizedLight,
            Self::InspiredGitHub,
        ]
    }
}
