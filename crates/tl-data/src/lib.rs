//! Bulk loading of CSV files into relational tables
//!
//! One table per file: the table name comes from the file name, the columns
//! from the header row, and every data row is inserted as text.

pub mod db;
pub mod ident;
pub mod loader;
pub mod provision;
pub mod schema;
pub mod walker;

use std::path::PathBuf;
use thiserror::Error;

// Re-exports
pub use loader::{BulkLoader, LoadReport};
pub use provision::TableProvisioner;
pub use schema::SchemaInspector;
pub use walker::{DirectoryWalker, FileFailure, RunSummary};

/// Errors that can occur while loading CSV files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot derive a table name from {path}")]
    InvalidFileName { path: PathBuf },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV for table {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("no records found in CSV file for table {table}")]
    NoRecords { table: String },

    #[error("blank column name at position {position} for table {table}")]
    InvalidIdentifier { table: String, position: usize },

    #[error("duplicate column {column} for table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("failed to inspect table {table}: {source}")]
    Catalog {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to create table {table}: {source}")]
    CreateTable {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("table {table} already exists without columns {}", .missing.join(", "))]
    SchemaMismatch { table: String, missing: Vec<String> },

    #[error("failed to prepare insert into {table}: {source}")]
    PrepareInsert {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to insert record {row} into {table}: {source}")]
    InsertRow {
        table: String,
        row: usize,
        #[source]
        source: rusqlite::Error,
    },
}

impl LoadError {
    /// Whether the error ends the whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoadError::Connect { .. } | LoadError::ListDir { .. })
    }

    /// Table the error refers to, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            LoadError::Csv { table, .. }
            | LoadError::NoRecords { table }
            | LoadError::InvalidIdentifier { table, .. }
            | LoadError::DuplicateColumn { table, .. }
            | LoadError::Catalog { table, .. }
            | LoadError::CreateTable { table, .. }
            | LoadError::SchemaMismatch { table, .. }
            | LoadError::PrepareInsert { table, .. }
            | LoadError::InsertRow { table, .. } => Some(table),
            LoadError::Connect { .. }
            | LoadError::ListDir { .. }
            | LoadError::InvalidFileName { .. }
            | LoadError::Open { .. } => None,
        }
    }
}
