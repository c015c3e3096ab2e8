//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Capped file reads
//! - Platform-specific detection
//! - Error types

pub mod error;
pub mod file_reader;
pub mod platform;
