//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Persisted preview settings
//! - Coded theme names and appearances
//! - The styled text model every renderer produces

pub mod settings;
pub mod styled;
pub mod theme;

pub use settings::{AppSettings, OutputFormat};
pub use styled::{Fragment, Rgb, StyleRole, StyledText, TextRun, TextStyle};
pub use theme::{Appearance, CodedThemeName, SyntaxTheme, ThemeMode};
