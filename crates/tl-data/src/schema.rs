//! Catalog lookups

use rusqlite::Connection;

use crate::LoadError;

/// Answers questions about tables already present in the database
pub struct SchemaInspector<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SchemaInspector<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Whether a table or view with this name is registered in the catalog.
    ///
    /// Matching is case-insensitive, like the engine's own name resolution.
    pub fn exists(&self, name: &str) -> Result<bool, LoadError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE)",
                [name],
                |row| row.get::<_, bool>(0),
            )
            .map_err(|source| LoadError::Catalog { table: name.to_string(), source })
    }

    /// Column names of an existing table in declaration order
    pub fn columns(&self, name: &str) -> Result<Vec<String>, LoadError> {
        let catalog_err = |source: rusqlite::Error| LoadError::Catalog { table: name.to_string(), source };

        let mut stmt = self.conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(catalog_err)?;

        let rows = stmt.query_map([name], |row| row.get::<_, String>(0))
            .map_err(catalog_err)?;

        let columns = rows.collect::<Result<Vec<_>, _>>().map_err(catalog_err)?;
        Ok(columns)
    }
}
