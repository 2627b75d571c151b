use std::fmt;
use std::path::Path;

use rusqlite::params_from_iter;

use crate::error::MiddlewareDbError;
use crate::handle::{PhysicalHandle, Prepared};
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;
use super::query::build_result_set;

/// Physical handle over a single rusqlite connection.
///
/// Reports the `"sqlite"` identity, which resolves to native transactions.
pub struct SqliteHandle {
    conn: rusqlite::Connection,
}

impl SqliteHandle {
    /// Open (or create) a database file.
    ///
    /// # Errors
    /// Returns `MiddlewareDbError::SqliteError` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MiddlewareDbError> {
        Ok(Self::from_connection(rusqlite::Connection::open(path)?))
    }

    /// # Errors
    /// Returns `MiddlewareDbError::SqliteError` if the database cannot be created.
    pub fn open_in_memory() -> Result<Self, MiddlewareDbError> {
        Ok(Self::from_connection(rusqlite::Connection::open_in_memory()?))
    }

    #[must_use]
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl fmt::Debug for SqliteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteHandle")
            .field("path", &self.conn.path())
            .field("autocommit", &self.conn.is_autocommit())
            .finish()
    }
}

impl PhysicalHandle for SqliteHandle {
    fn driver_identity(&self) -> &str {
        "sqlite"
    }

    fn prepare(&mut self, sql: &str) -> Result<Prepared, MiddlewareDbError> {
        // Compile once so syntax errors surface here; the statement stays cached.
        self.conn.prepare_cached(sql)?;
        Ok(Prepared::new(sql))
    }

    fn query_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<ResultSet, MiddlewareDbError> {
        let converted = Params::convert(params)?;
        let mut stmt = self.conn.prepare_cached(prepared.sql())?;
        build_result_set(&mut stmt, converted.as_values())
    }

    fn execute_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        let converted = Params::convert(params)?;
        let mut stmt = self.conn.prepare_cached(prepared.sql())?;
        Ok(stmt.execute(params_from_iter(converted.as_values()))?)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), MiddlewareDbError> {
        Ok(self.conn.execute_batch(sql)?)
    }

    fn begin_native(&mut self) -> Result<(), MiddlewareDbError> {
        if !self.conn.is_autocommit() {
            return Err(MiddlewareDbError::ExecutionError(
                "SQLite transaction already in progress".into(),
            ));
        }
        Ok(self.conn.execute_batch("BEGIN")?)
    }

    fn commit_native(&mut self) -> Result<(), MiddlewareDbError> {
        Ok(self.conn.execute_batch("COMMIT")?)
    }

    fn rollback_native(&mut self) -> Result<(), MiddlewareDbError> {
        Ok(self.conn.execute_batch("ROLLBACK")?)
    }
}
