//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Settings, themes, styled text)
//! - `services/` - Business operations (YAML outline, syntax highlighting, export)
//! - `infrastructure/` - External integrations (file reads, platform, error)
//! - `preview_controller.rs` - Turns a file into an encoded preview or thumbnail

pub mod domain;
pub mod file_filters;
pub mod infrastructure;
pub mod preview_controller;
pub mod services;

// Re-exports for convenient external access
pub use domain::{
    AppSettings, Appearance, CodedThemeName, OutputFormat, StyledText, SyntaxTheme, ThemeMode,
};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::detect_system_dark_mode;
pub use preview_controller::{Preview, PreviewController, PreviewKind};
