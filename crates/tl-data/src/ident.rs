//! Table and column identifiers

use std::path::Path;
use ahash::AHashSet;

use crate::LoadError;

/// Suffix of files picked up by the loader
pub const CSV_SUFFIX: &str = ".csv";

/// Quote an identifier for use in SQL text, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Table name for a CSV file: the base name without its `.csv` suffix
pub fn table_name_for(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let table = name.strip_suffix(CSV_SUFFIX).unwrap_or(name);
    if table.is_empty() {
        None
    } else {
        Some(table.to_string())
    }
}

/// Reject header rows the engine cannot turn into a column list.
///
/// Names compare ASCII case-insensitively, matching how the engine
/// resolves column names.
pub fn validate_columns(table: &str, columns: &[String]) -> Result<(), LoadError> {
    let mut seen = AHashSet::with_capacity(columns.len());

    for (idx, column) in columns.iter().enumerate() {
        if column.trim().is_empty() {
            return Err(LoadError::InvalidIdentifier {
                table: table.to_string(),
                position: idx + 1,
            });
        }
        if !seen.insert(column.to_ascii_lowercase()) {
            return Err(LoadError::DuplicateColumn {
                table: table.to_string(),
                column: column.clone(),
            });
        }
    }

    Ok(())
}
