use std::{fs, io, path::Path};

use rusqlite::{Connection, Transaction};
use tracing::{debug, error, info};

use crate::error::{LoadError, Result};
use crate::process::record::OutputRow;
use crate::schema::{SchemaVariant, TABLE_NAME};

/// Remove any existing file at `path`; a missing file is fine.
pub fn remove_existing(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed previous store");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(LoadError::FileAccess {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Open a fresh SQLite store at `path`, deleting whatever was there, and lay
/// down the `tweets` table with its indexes.
pub fn create_store(path: &Path, variant: SchemaVariant) -> Result<Connection> {
    remove_existing(path)?;
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA encoding = 'UTF-8';")?;
    create_schema(&conn, variant)?;
    info!(path = %path.display(), schema = %variant, "store created");
    Ok(conn)
}

pub fn create_schema(conn: &Connection, variant: SchemaVariant) -> Result<()> {
    conn.execute(&variant.create_table_sql(), [])?;
    for sql in variant.create_index_sql() {
        conn.execute(&sql, [])?;
    }
    debug!(
        table = TABLE_NAME,
        columns = variant.columns().len(),
        indexes = variant.indexes().len(),
        "schema created"
    );
    Ok(())
}

/// Insert one row inside `tx`. On rejection the full row is logged before the
/// error is returned.
pub fn insert_row(tx: &Transaction<'_>, variant: SchemaVariant, row: &OutputRow) -> Result<()> {
    let mut stmt = tx.prepare_cached(&variant.insert_sql())?;
    stmt.execute(row.params().as_slice()).map_err(|source| {
        error!(row = %row, error = %source, "insert rejected");
        LoadError::Insertion {
            row: row.to_string(),
            source,
        }
    })?;
    Ok(())
}

pub fn count_rows(conn: &Connection) -> Result<i64> {
    let n = conn.query_row(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"), [], |r| r.get(0))?;
    Ok(n)
}
