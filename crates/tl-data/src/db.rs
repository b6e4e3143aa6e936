//! Database handle

use rusqlite::Connection;
use tl_core::DbConfig;
use tracing::info;

use crate::LoadError;

/// Open the single database handle shared by one run
pub fn open(config: &DbConfig) -> Result<Connection, LoadError> {
    let target = config.connection_string();
    info!("Connecting to {}", target);

    let conn = Connection::open(&config.db_name)
        .map_err(|source| LoadError::Connect { target: target.clone(), source })?;

    // Connection::open is lazy about some failures; make one round trip.
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(|source| LoadError::Connect { target, source })?;

    Ok(conn)
}

/// Open a private in-memory database
pub fn open_in_memory() -> Result<Connection, LoadError> {
    Connection::open_in_memory().map_err(|source| LoadError::Connect {
        target: ":memory:".to_string(),
        source,
    })
}
