use crate::error::MiddlewareDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Statement accepted by a physical handle.
///
/// Stores the SQL text the handle validated; execution is delegated back to
/// the handle with the bind values for that call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    sql: String,
}

impl Prepared {
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// A live, already opened connection to the database server.
///
/// A [`Connection`](crate::Connection) owns one of these for writes and
/// optionally a second one for row-returning reads. Implementations run one
/// statement at a time and block until the server answers.
///
/// Bind values arrive in placeholder order; a count mismatch is reported by
/// the driver when the statement executes.
pub trait PhysicalHandle: Send {
    /// Name the driver reports for itself, e.g. `"sqlite"` or `"sqlsrv"`.
    fn driver_identity(&self) -> &str;

    /// Prepare a statement.
    ///
    /// # Errors
    /// Returns the driver error if the statement is rejected.
    fn prepare(&mut self, sql: &str) -> Result<Prepared, MiddlewareDbError>;

    /// Execute a prepared statement and fetch every row.
    ///
    /// # Errors
    /// Returns the driver error if execution or row extraction fails.
    fn query_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<ResultSet, MiddlewareDbError>;

    /// Execute a prepared statement and return the affected row count.
    ///
    /// # Errors
    /// Returns the driver error if execution fails.
    fn execute_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<usize, MiddlewareDbError>;

    /// Execute raw SQL text with no bindings and no result.
    ///
    /// # Errors
    /// Returns the driver error if execution fails.
    fn execute_batch(&mut self, sql: &str) -> Result<(), MiddlewareDbError>;

    /// Open a transaction through the driver's own mechanism.
    ///
    /// # Errors
    /// The default implementation returns `Unimplemented`.
    fn begin_native(&mut self) -> Result<(), MiddlewareDbError> {
        Err(MiddlewareDbError::Unimplemented(format!(
            "{} has no native transaction support",
            self.driver_identity()
        )))
    }

    /// # Errors
    /// The default implementation returns `Unimplemented`.
    fn commit_native(&mut self) -> Result<(), MiddlewareDbError> {
        Err(MiddlewareDbError::Unimplemented(format!(
            "{} has no native transaction support",
            self.driver_identity()
        )))
    }

    /// # Errors
    /// The default implementation returns `Unimplemented`.
    fn rollback_native(&mut self) -> Result<(), MiddlewareDbError> {
        Err(MiddlewareDbError::Unimplemented(format!(
            "{} has no native transaction support",
            self.driver_identity()
        )))
    }
}

impl<H: PhysicalHandle + ?Sized> PhysicalHandle for Box<H> {
    fn driver_identity(&self) -> &str {
        (**self).driver_identity()
    }

    fn prepare(&mut self, sql: &str) -> Result<Prepared, MiddlewareDbError> {
        (**self).prepare(sql)
    }

    fn query_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<ResultSet, MiddlewareDbError> {
        (**self).query_prepared(prepared, params)
    }

    fn execute_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        (**self).execute_prepared(prepared, params)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), MiddlewareDbError> {
        (**self).execute_batch(sql)
    }

    fn begin_native(&mut self) -> Result<(), MiddlewareDbError> {
        (**self).begin_native()
    }

    fn commit_native(&mut self) -> Result<(), MiddlewareDbError> {
        (**self).commit_native()
    }

    fn rollback_native(&mut self) -> Result<(), MiddlewareDbError> {
        (**self).rollback_native()
    }
}
