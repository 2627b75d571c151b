use crate::error::MiddlewareDbError;
use crate::grammar::{QueryShape, SelectQuery};
use crate::results::Rows;
use crate::types::{ExecutionMode, RowValues};

use super::Connection;

impl Connection {
    /// Run a row-returning statement in the connection's default mode.
    ///
    /// # Errors
    /// Returns the driver error if preparing or executing the statement fails.
    pub fn select(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<Rows, MiddlewareDbError> {
        let mode = self.default_mode();
        self.select_with(query, bindings, mode)
    }

    /// Run a row-returning statement on the read handle.
    ///
    /// In `Pretend` mode an empty result in the connection's fetch mode is
    /// returned and no handle is touched.
    ///
    /// # Errors
    /// Returns the driver error if preparing or executing the statement fails.
    pub fn select_with(
        &mut self,
        query: &str,
        bindings: &[RowValues],
        mode: ExecutionMode,
    ) -> Result<Rows, MiddlewareDbError> {
        let fetch_mode = self.fetch_mode();
        self.run(
            query,
            bindings,
            mode,
            || Rows::empty(fetch_mode),
            |me, query, bindings| {
                let processor = me.processor_handle();
                let handle = me.read_handle();
                let prepared = handle.prepare(query)?;
                let raw = handle.query_prepared(&prepared, bindings)?;
                Ok(processor.process_select(raw, fetch_mode))
            },
        )
    }

    /// Like [`select`](Connection::select) but keeps only the first row.
    ///
    /// # Errors
    /// Returns the driver error if preparing or executing the statement fails.
    pub fn select_one(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<Rows, MiddlewareDbError> {
        let mut rows = self.select(query, bindings)?;
        rows.truncate(1);
        Ok(rows)
    }

    /// Compile `query` with the connection's grammar and run it.
    ///
    /// # Errors
    /// Returns `GrammarError` if the shape cannot be rendered, or the driver
    /// error if execution fails.
    pub fn select_shape(
        &mut self,
        query: SelectQuery,
        bindings: &[RowValues],
    ) -> Result<Rows, MiddlewareDbError> {
        let sql = self.compile(&QueryShape::Select(query))?;
        self.select(&sql, bindings)
    }
}
