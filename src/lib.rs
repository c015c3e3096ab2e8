//! Syntax-highlighted previews and thumbnails for source files, with a
//! structured outline renderer for YAML.

pub mod app;
