//! Table creation from a CSV header

use rusqlite::Connection;
use tracing::debug;

use crate::ident::{quote_ident, validate_columns};
use crate::LoadError;

/// Build the `CREATE TABLE IF NOT EXISTS` statement for a header row.
///
/// Every column is declared `TEXT`, in header order.
pub fn create_table_sql(name: &str, columns: &[String]) -> Result<String, LoadError> {
    validate_columns(name, columns)?;

    let column_defs = columns
        .iter()
        .map(|col| format!("{} TEXT", quote_ident(col)))
        .collect::<Vec<_>>();

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(name),
        column_defs.join(", ")
    ))
}

/// Creates destination tables on demand
pub struct TableProvisioner<'conn> {
    conn: &'conn Connection,
}

impl<'conn> TableProvisioner<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Create the table unless it already exists.
    ///
    /// An existing table is left as is, even when its columns differ.
    pub fn ensure(&self, name: &str, columns: &[String]) -> Result<(), LoadError> {
        let stmt = create_table_sql(name, columns)?;
        println!("{}", stmt);
        debug!(table = name, columns = columns.len(), "creating table");

        self.conn
            .execute(&stmt, [])
            .map_err(|source| LoadError::CreateTable { table: name.to_string(), source })?;

        println!("Table {} created successfully.", name);
        Ok(())
    }
}
