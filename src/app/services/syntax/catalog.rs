//! Theme catalog: bundled syntect themes plus user `.tmTheme` files, all
//! addressed by coded theme name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use syntect::highlighting::{Highlighter, Theme, ThemeSet};
use syntect::parsing::Scope;

use crate::app::domain::styled::Rgb;
use crate::app::domain::theme::{Appearance, CodedThemeName, SyntaxTheme};
use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    pub coded: CodedThemeName,
    pub display_name: String,
    pub builtin: bool,
}

/// Colors a preview needs besides per-token highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Rgb,
    pub foreground: Rgb,
    pub gutter: Rgb,
    /// Color of YAML mapping keys
    pub key: Rgb,
    /// Color of YAML scalar values
    pub value: Rgb,
}

pub struct ThemeCatalog {
    themes: HashMap<CodedThemeName, Theme>,
    entries: Vec<ThemeEntry>,
}

impl ThemeCatalog {
    pub fn load_defaults() -> Self {
        let mut defaults = ThemeSet::load_defaults();
        let mut catalog = Self {
            themes: HashMap::new(),
            entries: Vec::new(),
        };
        for builtin in SyntaxTheme::all() {
            match defaults.themes.remove(builtin.theme_key()) {
                Some(theme) => catalog.insert(
                    builtin.coded_name(),
                    builtin.display_name().to_string(),
                    theme,
                    true,
                ),
                None => log::warn!("Bundled theme '{}' is missing", builtin.theme_key()),
            }
        }
        catalog
    }

    /// Default location of user themes: data_dir/codepeek/themes/
    pub fn custom_theme_dir() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("codepeek");
        path.push("themes");
        path
    }

    /// Add every `.tmTheme` in `dir`. The css-name is the sanitized file stem
    /// and the appearance follows the theme background. Returns how many
    /// themes were added. A missing directory adds nothing.
    pub fn load_custom_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Ok(0);
        }
        let mut added = 0;
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("tmtheme")))
            .collect();
        paths.sort();

        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let theme = match ThemeSet::get_theme(&path) {
                Ok(theme) => theme,
                Err(e) => {
                    log::warn!("Skipping theme {}: {}", path.display(), e);
                    continue;
                }
            };
            let appearance = if theme_background(&theme).is_dark() {
                Appearance::Dark
            } else {
                Appearance::Light
            };
            let coded = match CodedThemeName::new(appearance, &sanitize_css_name(stem)) {
                Ok(coded) => coded,
                Err(e) => {
                    log::warn!("Skipping theme {}: {}", path.display(), e);
                    continue;
                }
            };
            if self.themes.contains_key(&coded) {
                log::warn!("Theme {} shadows existing '{}', skipped", path.display(), coded);
                continue;
            }
            let display_name = theme.name.clone().unwrap_or_else(|| stem.to_string());
            log::debug!("Loaded custom theme '{}' from {}", coded, path.display());
            self.insert(coded, display_name, theme, false);
            added += 1;
        }
        Ok(added)
    }

    fn insert(&mut self, coded: CodedThemeName, display_name: String, theme: Theme, builtin: bool) {
        self.entries.push(ThemeEntry {
            coded: coded.clone(),
            display_name,
            builtin,
        });
        self.themes.insert(coded, theme);
    }

    pub fn entries(&self) -> &[ThemeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &CodedThemeName) -> Result<&Theme> {
        self.themes
            .get(name)
            .ok_or_else(|| AppError::Theme(format!("unknown theme '{}'", name)))
    }

    /// Look up `name`, falling back to the bundled default for `appearance`.
    pub fn get_or_default(&self, name: &CodedThemeName, appearance: Appearance) -> &Theme {
        if let Ok(theme) = self.get(name) {
            return theme;
        }
        let fallback = match appearance {
            Appearance::Light => SyntaxTheme::Base16OceanLight,
            Appearance::Dark => SyntaxTheme::Base16OceanDark,
        }
        .coded_name();
        log::warn!("Theme '{}' not found, falling back to '{}'", name, fallback);
        match self.themes.get(&fallback) {
            Some(theme) => theme,
            None => self
                .themes
                .values()
                .next()
                .unwrap_or_else(|| default_theme()),
        }
    }
}

fn default_theme() -> &'static Theme {
    static EMPTY: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();
    EMPTY.get_or_init(Theme::default)
}

fn sanitize_css_name(stem: &str) -> String {
    let mapped: String = stem
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' }
        })
        .collect();
    mapped.trim_start_matches(['-', '_']).to_string()
}

fn to_rgb(color: syntect::highlighting::Color) -> Rgb {
    Rgb::new(color.r, color.g, color.b)
}

pub fn theme_background(theme: &Theme) -> Rgb {
    theme
        .settings
        .background
        .map(to_rgb)
        .unwrap_or(Rgb::new(255, 255, 255))
}

pub fn theme_foreground(theme: &Theme) -> Rgb {
    theme
        .settings
        .foreground
        .map(to_rgb)
        .unwrap_or(Rgb::new(0, 0, 0))
}

fn scope_color(highlighter: &Highlighter<'_>, scope: &str) -> Option<Rgb> {
    let scopes = scope
        .split_whitespace()
        .map(Scope::new)
        .collect::<std::result::Result<Vec<_>, _>>()
        .ok()?;
    Some(to_rgb(highlighter.style_for_stack(&scopes).foreground))
}

pub fn theme_colors(theme: &Theme) -> ThemeColors {
    let foreground = theme_foreground(theme);
    let highlighter = Highlighter::new(theme);
    let key = scope_color(&highlighter, "source.yaml entity.name.tag.yaml").unwrap_or(foreground);
    let value =
        scope_color(&highlighter, "source.yaml string.unquoted.plain.out.yaml").unwrap_or(foreground);
    ThemeColors {
        background: theme_background(theme),
        foreground,
        gutter: theme
            .settings
            .gutter_foreground
            .map(to_rgb)
            .unwrap_or(foreground),
        key,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_builtins() {
        let catalog = ThemeCatalog::load_defaults();
        assert_eq!(catalog.entries().len(), SyntaxTheme::all().len());
        for theme in SyntaxTheme::all() {
            assert!(catalog.get(&theme.coded_name()).is_ok());
        }
    }

    #[test]
    fn test_unknown_theme_errors_and_falls_back() {
        let catalog = ThemeCatalog::load_defaults();
        let missing: CodedThemeName = "dark.nope".parse().unwrap();
        assert!(matches!(catalog.get(&missing), Err(AppError::Theme(_))));

        let fallback = catalog.get_or_default(&missing, Appearance::Dark);
        let expected = catalog.get(&SyntaxTheme::Base16OceanDark.coded_name()).unwrap();
        assert_eq!(fallback.name, expected.name);
    }

    #[test]
    fn test_builtin_appearance_matches_background() {
        let catalog = ThemeCatalog::load_defaults();
        for entry in catalog.entries() {
            let theme = catalog.get(&entry.coded).unwrap();
            let dark = theme_background(theme).is_dark();
            assert_eq!(dark, entry.coded.appearance() == Appearance::Dark, "{}", entry.coded);
        }
    }

    #[test]
    fn test_yaml_key_and_value_colors_differ() {
        let catalog = ThemeCatalog::load_defaults();
        let theme = catalog.get(&SyntaxTheme::Base16OceanDark.coded_name()).unwrap();
        let colors = theme_colors(theme);
        assert_ne!(colors.key, colors.value);
        assert!(colors.background.is_dark());
    }

    #[test]
    fn test_sanitize_css_name() {
        assert_eq!(sanitize_css_name("My Theme (v2)"), "my-theme--v2-");
        assert_eq!(sanitize_css_name("__dracula"), "dracula");
    }

    #[test]
    fn test_missing_custom_dir_adds_nothing() {
        let mut catalog = ThemeCatalog::load_defaults();
        let added = catalog.load_custom_dir(Path::new("/no/such/dir")).unwrap();
        assert_eq!(added, 0);
    }

    #[test]
    fn test_custom_dir_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.tmTheme"), "not a plist").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let mut catalog = ThemeCatalog::load_defaults();
        let added = catalog.load_custom_dir(dir.path()).unwrap();
        assert_eq!(added, 0);
        assert_eq!(catalog.entries().len(), SyntaxTheme::all().len());
    }
}
