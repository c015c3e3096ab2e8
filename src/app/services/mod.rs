//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - YAML outline rendering
//! - Syntax highlighting and the theme catalog
//! - Output encoding (ANSI, HTML, plain)
//! - Text decoding and line operations

pub mod export;
pub mod syntax;
pub mod text_ops;
pub mod yaml;
