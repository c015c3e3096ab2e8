use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app::domain::styled::Rgb;
use crate::app::domain::theme::{Appearance, CodedThemeName, SyntaxTheme, ThemeMode};
use crate::app::infrastructure::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Ansi,
    Html,
    Plain,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" | "terminal" => Ok(Self::Ansi),
            "html" => Ok(Self::Html),
            "plain" | "text" => Ok(Self::Plain),
            other => Err(AppError::Settings(format!("unknown output format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    /// Coded name of the theme used for light appearance
    #[serde(default = "default_light_theme")]
    pub light_theme: CodedThemeName,

    /// Coded name of the theme used for dark appearance
    #[serde(default = "default_dark_theme")]
    pub dark_theme: CodedThemeName,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    /// Tab size in spaces (default 4)
    #[serde(default = "default_tab_size")]
    pub tab_size: u32,

    /// Render YAML files as a structured outline instead of highlighted source
    #[serde(default = "default_yaml_enabled")]
    pub yaml_enabled: bool,

    #[serde(default = "default_yaml_indent_step")]
    pub yaml_indent_step: usize,

    /// Append the raw source below the error message when a YAML file fails to parse
    #[serde(default = "default_yaml_show_source_on_error")]
    pub yaml_show_source_on_error: bool,

    /// Hex color overriding the theme-derived key color
    #[serde(default)]
    pub yaml_key_color: Option<String>,

    /// Hex color overriding the theme-derived value color
    #[serde(default)]
    pub yaml_value_color: Option<String>,

    #[serde(default = "default_max_preview_bytes")]
    pub max_preview_bytes: u64,

    #[serde(default = "default_thumbnail_lines")]
    pub thumbnail_lines: usize,

    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::SystemDefault
}

fn default_light_theme() -> CodedThemeName {
    SyntaxTheme::Base16OceanLight.coded_name()
}

fn default_dark_theme() -> CodedThemeName {
    SyntaxTheme::Base16OceanDark.coded_name()
}

fn default_font_family() -> String {
    "Menlo".to_string()
}

fn default_font_size() -> u32 {
    12
}

fn default_line_numbers() -> bool {
    false
}

fn default_word_wrap() -> bool {
    true
}

fn default_tab_size() -> u32 {
    4
}

fn default_yaml_enabled() -> bool {
    true
}

fn default_yaml_indent_step() -> usize {
    4
}

fn default_yaml_show_source_on_error() -> bool {
    true
}

fn default_max_preview_bytes() -> u64 {
    512 * 1024
}

fn default_thumbnail_lines() -> usize {
    40
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Ansi
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            light_theme: default_light_theme(),
            dark_theme: default_dark_theme(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: default_word_wrap(),
            tab_size: default_tab_size(),
            yaml_enabled: default_yaml_enabled(),
            yaml_indent_step: default_yaml_indent_step(),
            yaml_show_source_on_error: default_yaml_show_source_on_error(),
            yaml_key_color: None,
            yaml_value_color: None,
            max_preview_bytes: default_max_preview_bytes(),
            thumbnail_lines: default_thumbnail_lines(),
            output_format: default_output_format(),
        }
    }
}

impl AppSettings {
    /// Get the coded theme name for an appearance
    pub fn theme_for(&self, appearance: Appearance) -> &CodedThemeName {
        match appearance {
            Appearance::Light => &self.light_theme,
            Appearance::Dark => &self.dark_theme,
        }
    }

    pub fn key_color_override(&self) -> Option<Rgb> {
        self.yaml_key_color.as_deref().and_then(Rgb::from_hex)
    }

    pub fn value_color_override(&self) -> Option<Rgb> {
        self.yaml_value_color.as_deref().and_then(Rgb::from_hex)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(6..=96).contains(&self.font_size) {
            return Err(AppError::Settings(format!(
                "font_size {} out of range (6-96)",
                self.font_size
            )));
        }
        if !(1..=16).contains(&self.tab_size) {
            return Err(AppError::Settings(format!(
                "tab_size {} out of range (1-16)",
                self.tab_size
            )));
        }
        if !(1..=16).contains(&self.yaml_indent_step) {
            return Err(AppError::Settings(format!(
                "yaml_indent_step {} out of range (1-16)",
                self.yaml_indent_step
            )));
        }
        if self.thumbnail_lines == 0 {
            return Err(AppError::Settings("thumbnail_lines must be positive".to_string()));
        }
        if self.max_preview_bytes == 0 {
            return Err(AppError::Settings("max_preview_bytes must be positive".to_string()));
        }
        for (field, value) in [
            ("yaml_key_color", &self.yaml_key_color),
            ("yaml_value_color", &self.yaml_value_color),
        ] {
            if let Some(hex) = value
                && Rgb::from_hex(hex).is_none()
            {
                return Err(AppError::Settings(format!("{} '{}' is not a hex color", field, hex)));
            }
        }
        Ok(())
    }

    /// Set a single field by its JSON key. `raw` is read as JSON first and
    /// falls back to a plain string, so `true`, `14` and `dark.solarized`
    /// all work from a command line.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<(), AppError> {
        let mut json = serde_json::to_value(&*self)?;
        let map = json
            .as_object_mut()
            .ok_or_else(|| AppError::Settings("settings are not an object".to_string()))?;
        if !map.contains_key(key) {
            return Err(AppError::Settings(format!("unknown setting '{}'", key)));
        }
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        map.insert(key.to_string(), value);

        let updated: AppSettings = serde_json::from_value(json)
            .map_err(|e| AppError::Settings(format!("invalid value for '{}': {}", key, e)))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<AppSettings>(&contents) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => settings,
                    Err(e) => {
                        log::warn!("Ignoring settings in {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(e) if e.kind() != ErrorKind::NotFound => {
                // Unreadable but present: keep the file for the user to fix
                log::warn!("Cannot read settings {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                if let Err(e) = default.save_to(path) {
                    log::debug!("Could not write default settings to {}: {}", path.display(), e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("codepeek");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme_mode, ThemeMode::SystemDefault);
        assert_eq!(settings.light_theme.to_string(), "light.base16-ocean");
        assert_eq!(settings.dark_theme.to_string(), "dark.base16-ocean");
        assert_eq!(settings.font_size, 12);
        assert_eq!(settings.tab_size, 4);
        assert_eq!(settings.yaml_indent_step, 4);
        assert!(settings.yaml_enabled);
        assert!(settings.yaml_show_source_on_error);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        // Simulate old config missing new fields
        let json = r#"{"line_numbers_enabled": true, "dark_theme": "dark.solarized"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.font_size, 12);
        assert!(settings.line_numbers_enabled);
        assert_eq!(settings.dark_theme.css_name(), "solarized");
    }

    #[test]
    fn test_theme_for_appearance() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme_for(Appearance::Dark), &settings.dark_theme);
        assert_eq!(settings.theme_for(Appearance::Light), &settings.light_theme);
    }

    #[test]
    fn test_invalid_theme_name_rejected() {
        let json = r#"{"light_theme": "sepia"}"#;
        assert!(serde_json::from_str::<AppSettings>(json).is_err());
    }

    #[test]
    fn test_set_value_parses_json_and_strings() {
        let mut settings = AppSettings::default();
        settings.set_value("font_size", "14").unwrap();
        settings.set_value("line_numbers_enabled", "true").unwrap();
        settings.set_value("dark_theme", "dark.base16-mocha").unwrap();
        settings.set_value("theme_mode", "Dark").unwrap();
        settings.set_value("yaml_key_color", "#cc6633").unwrap();
        assert_eq!(settings.font_size, 14);
        assert!(settings.line_numbers_enabled);
        assert_eq!(settings.dark_theme.to_string(), "dark.base16-mocha");
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert_eq!(settings.key_color_override(), Some(Rgb::new(0xcc, 0x66, 0x33)));
    }

    #[test]
    fn test_set_value_rejects_unknown_and_invalid() {
        let mut settings = AppSettings::default();
        assert!(settings.set_value("nope", "1").is_err());
        assert!(settings.set_value("font_size", "big").is_err());
        assert!(settings.set_value("font_size", "200").is_err());
        assert!(settings.set_value("yaml_value_color", "purple").is_err());
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings::load_from(&path);
        assert_eq!(settings, AppSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        fs::write(&path, r#"{"tab_size": 0}"#).unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_load_unreadable_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let original: &[u8] = b"{\"font_size\": 14, \"font_family\": \"Caf\xE9\"}";
        fs::write(&path, original).unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        assert_eq!(fs::read(&path).unwrap(), original);

        // A directory in place of the file is not "missing" either
        let dir_path = dir.path().join("as_dir");
        fs::create_dir(&dir_path).unwrap();
        assert_eq!(AppSettings::load_from(&dir_path), AppSettings::default());
        assert!(dir_path.is_dir());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = AppSettings {
            theme_mode: ThemeMode::Light,
            yaml_indent_step: 2,
            output_format: OutputFormat::Html,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
