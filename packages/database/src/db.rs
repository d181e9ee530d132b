//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::DbError;

/// Default location of the incidents `SQLite` database.
pub const DEFAULT_DB_PATH: &str = "data/stpaul_incidents.sqlite3";

/// Opens the `SQLite` store at `path`, creating parent directories as
/// needed.
///
/// The returned handle is meant to be opened once and shared for the
/// lifetime of the process.
///
/// # Errors
///
/// Returns [`DbError`] if the parent directory cannot be created or the
/// database cannot be opened.
pub fn open(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    log::debug!("Opening SQLite database at {}", path.display());

    init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connection {
        message: e.to_string(),
    })
}
