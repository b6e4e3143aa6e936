//! Loading a single CSV file into its table

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info, warn};

use crate::ident::{quote_ident, table_name_for, validate_columns};
use crate::provision::TableProvisioner;
use crate::schema::SchemaInspector;
use crate::LoadError;

/// Outcome of loading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Source file
    pub path: PathBuf,
    /// Destination table
    pub table: String,
    /// Whether the table was created by this load
    pub created: bool,
    /// Data rows inserted
    pub rows_inserted: usize,
}

/// Parsed contents of a CSV file
struct CsvContents {
    header: Vec<String>,
    records: Vec<StringRecord>,
}

/// Build the positional INSERT for a header row
pub fn insert_sql(table: &str, columns: &[String]) -> String {
    let names = columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>();
    let placeholders = (1..=columns.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Loads CSV files into tables named after them
pub struct BulkLoader<'conn> {
    conn: &'conn Connection,
}

impl<'conn> BulkLoader<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Load every data row of `path` into its table.
    ///
    /// The file is parsed completely before any statement runs. Rows are
    /// inserted one statement each without a surrounding transaction, so a
    /// failing row leaves the rows before it in place.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let table = table_name_for(path)
            .ok_or_else(|| LoadError::InvalidFileName { path: path.to_path_buf() })?;

        info!("Loading {} into table {}", path.display(), table);
        let contents = Self::read_file(path, &table)?;

        if contents.header.is_empty() {
            return Err(LoadError::NoRecords { table });
        }
        validate_columns(&table, &contents.header)?;

        let inspector = SchemaInspector::new(self.conn);
        let created = if inspector.exists(&table)? {
            self.check_existing_columns(&inspector, &table, &contents.header)?;
            false
        } else {
            TableProvisioner::new(self.conn).ensure(&table, &contents.header)?;
            true
        };

        if contents.records.is_empty() {
            return Err(LoadError::NoRecords { table });
        }

        let rows_inserted = self.insert_records(&table, &contents)?;

        println!("Processed file: {}", path.display());
        info!("Inserted {} rows into {}", rows_inserted, table);

        Ok(LoadReport {
            path: path.to_path_buf(),
            table,
            created,
            rows_inserted,
        })
    }

    /// Parse the whole file; ragged rows fail the file
    fn read_file(path: &Path, table: &str) -> Result<CsvContents, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(BufReader::new(file));

        let csv_err = |source: csv::Error| LoadError::Csv { table: table.to_string(), source };

        let header = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        debug!(table, columns = header.len(), records = records.len(), "parsed CSV");
        Ok(CsvContents { header, records })
    }

    /// An existing table must have every header column; it is never altered
    fn check_existing_columns(
        &self,
        inspector: &SchemaInspector<'_>,
        table: &str,
        header: &[String],
    ) -> Result<(), LoadError> {
        let existing = inspector.columns(table)?;
        let missing = header
            .iter()
            .filter(|col| !existing.iter().any(|e| e.eq_ignore_ascii_case(col)))
            .cloned()
            .collect::<Vec<_>>();

        if missing.is_empty() {
            return Ok(());
        }

        warn!("Table {} exists but lacks columns {:?}", table, missing);
        Err(LoadError::SchemaMismatch { table: table.to_string(), missing })
    }

    fn insert_records(&self, table: &str, contents: &CsvContents) -> Result<usize, LoadError> {
        let sql = insert_sql(table, &contents.header);
        debug!(table, "{}", sql);

        let mut stmt = self.conn
            .prepare(&sql)
            .map_err(|source| LoadError::PrepareInsert { table: table.to_string(), source })?;

        for (idx, record) in contents.records.iter().enumerate() {
            stmt.execute(params_from_iter(record.iter()))
                .map_err(|source| LoadError::InsertRow {
                    table: table.to_string(),
                    row: idx + 1,
                    source,
                })?;
        }

        Ok(contents.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use std::fs;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn count_rows(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_insert_sql() {
        let columns = vec!["id".to_string(), "name".to_string(), "amount".to_string()];
        assert_eq!(
            insert_sql("orders", &columns),
            "INSERT INTO \"orders\" (\"id\", \"name\", \"amount\") VALUES (?1, ?2, ?3)"
        );
    }

    #[test]
    fn test_load_creates_table_and_inserts_rows() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "orders.csv",
            "id,name,amount\n1,Alice,10.50\n2,Bob,3.00\n3,\"Carol, Jr.\",7\n",
        );
        let conn = open_in_memory().unwrap();

        let report = BulkLoader::new(&conn).load(&path).unwrap();
        assert_eq!(report.table, "orders");
        assert!(report.created);
        assert_eq!(report.rows_inserted, 3);
        assert_eq!(count_rows(&conn, "orders"), 3);

        let name: String = conn
            .query_row("SELECT name FROM orders WHERE id = '3'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Carol, Jr.");
    }

    #[test]
    fn test_values_bound_in_header_order() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "payments.csv", "id,name,amount\n1,Alice,10.50\n");
        let conn = open_in_memory().unwrap();
        // Same columns, different declaration order
        conn.execute_batch("CREATE TABLE payments (amount TEXT, id TEXT, name TEXT)").unwrap();

        let report = BulkLoader::new(&conn).load(&path).unwrap();
        assert!(!report.created);

        let row: (String, String, String) = conn
            .query_row("SELECT id, name, amount FROM payments", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert_eq!(row, ("1".to_string(), "Alice".to_string(), "10.50".to_string()));
    }

    #[test]
    fn test_values_stay_text() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "codes.csv", "zip,qty\n00501,007\n");
        let conn = open_in_memory().unwrap();

        BulkLoader::new(&conn).load(&path).unwrap();

        let (zip, kind): (String, String) = conn
            .query_row("SELECT zip, typeof(qty) FROM codes", [], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        assert_eq!(zip, "00501");
        assert_eq!(kind, "text");
    }

    #[test]
    fn test_header_only_creates_table_then_reports_no_records() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "empty_orders.csv", "id,name\n");
        let conn = open_in_memory().unwrap();

        let err = BulkLoader::new(&conn).load(&path).unwrap_err();
        assert!(matches!(err, LoadError::NoRecords { ref table } if table == "empty_orders"));
        assert!(SchemaInspector::new(&conn).exists("empty_orders").unwrap());
        assert_eq!(count_rows(&conn, "empty_orders"), 0);
    }

    #[test]
    fn test_empty_file_reports_no_records() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "nothing.csv", "");
        let conn = open_in_memory().unwrap();

        let err = BulkLoader::new(&conn).load(&path).unwrap_err();
        assert!(matches!(err, LoadError::NoRecords { .. }));
        assert!(!SchemaInspector::new(&conn).exists("nothing").unwrap());
    }

    #[test]
    fn test_ragged_row_fails_whole_file() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "ragged.csv", "a,b\n1,2\n3\n4,5\n");
        let conn = open_in_memory().unwrap();

        let err = BulkLoader::new(&conn).load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
        // parsing happens before any statement
        assert!(!SchemaInspector::new(&conn).exists("ragged").unwrap());
    }

    #[test]
    fn test_unopenable_file() {
        let dir = tempdir().unwrap();
        let conn = open_in_memory().unwrap();

        let err = BulkLoader::new(&conn).load(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn test_existing_table_with_other_columns_is_mismatch() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "items.csv", "sku,qty,colour\nA1,2,red\n");
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE items (sku TEXT, qty TEXT)").unwrap();

        let err = BulkLoader::new(&conn).load(&path).unwrap_err();
        match err {
            LoadError::SchemaMismatch { table, missing } => {
                assert_eq!(table, "items");
                assert_eq!(missing, vec!["colour".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count_rows(&conn, "items"), 0);
        assert_eq!(SchemaInspector::new(&conn).columns("items").unwrap(), vec!["sku", "qty"]);
    }

    #[test]
    fn test_failing_row_keeps_earlier_rows() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "people.csv", "id,name\n1,a\n2,b\n2,c\n3,d\n");
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE people (id TEXT PRIMARY KEY, name TEXT)").unwrap();

        let err = BulkLoader::new(&conn).load(&path).unwrap_err();
        assert!(matches!(err, LoadError::InsertRow { row: 3, .. }));
        assert_eq!(count_rows(&conn, "people"), 2);
    }

    #[test]
    fn test_reload_appends() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "log.csv", "ts,msg\n1,up\n2,down\n");
        let conn = open_in_memory().unwrap();
        let loader = BulkLoader::new(&conn);

        assert!(loader.load(&path).unwrap().created);
        assert!(!loader.load(&path).unwrap().created);
        assert_eq!(count_rows(&conn, "log"), 4);
    }

    #[test]
    fn test_non_ascii_names_differing_in_case_load() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "accents.csv", "É,é\n1,2\n");
        let conn = open_in_memory().unwrap();

        let report = BulkLoader::new(&conn).load(&path).unwrap();
        assert_eq!(report.rows_inserted, 1);
        assert_eq!(SchemaInspector::new(&conn).columns("accents").unwrap(), vec!["É", "é"]);
    }

    #[test]
    fn test_file_named_after_view_is_not_created() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "recent.csv", "id\n1\n");
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE base (id TEXT); CREATE VIEW recent AS SELECT id FROM base")
            .unwrap();

        let err = BulkLoader::new(&conn).load(&path).unwrap_err();
        assert!(matches!(err, LoadError::PrepareInsert { ref table, .. } if table == "recent"));
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM base", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_awkward_identifiers_are_quoted() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "Order Lines.csv", "select,\"unit \"\"price\"\"\",from\nx,1.5,y\n");
        let conn = open_in_memory().unwrap();

        let report = BulkLoader::new(&conn).load(&path).unwrap();
        assert_eq!(report.table, "Order Lines");
        assert_eq!(
            SchemaInspector::new(&conn).columns("Order Lines").unwrap(),
            vec!["select", "unit \"price\"", "from"]
        );
        assert_eq!(count_rows(&conn, "Order Lines"), 1);
    }
}
