use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] yaml_rust2::ScanError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Theme error: {0}")]
    Theme(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Syntax error: {0}")]
    Syntax(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
