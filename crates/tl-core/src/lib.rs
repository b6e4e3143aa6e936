//! Core types for the CSV table loader
//!
//! This crate owns the run configuration: where the database lives and
//! which directory holds the CSV files to ingest.

pub mod config;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, DbConfig};
