use crate::error::MiddlewareDbError;
use crate::grammar::QueryShape;
use crate::types::{ExecutionMode, RowValues};

use super::Connection;

impl Connection {
    /// Run a statement and return the affected row count, in the connection's
    /// default mode.
    ///
    /// # Errors
    /// Returns the driver error if preparing or executing the statement fails.
    pub fn affecting_statement(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        let mode = self.default_mode();
        self.affecting_statement_with(query, bindings, mode)
    }

    /// Run a statement on the write handle and return the driver-reported
    /// affected row count. `Pretend` returns 0 without touching the handle.
    ///
    /// # Errors
    /// Returns the driver error if preparing or executing the statement fails.
    pub fn affecting_statement_with(
        &mut self,
        query: &str,
        bindings: &[RowValues],
        mode: ExecutionMode,
    ) -> Result<usize, MiddlewareDbError> {
        self.run(
            query,
            bindings,
            mode,
            || 0,
            |me, query, bindings| {
                let handle = me.write_handle();
                let prepared = handle.prepare(query)?;
                handle.execute_prepared(&prepared, bindings)
            },
        )
    }

    /// # Errors
    /// Returns the driver error if the insert fails.
    pub fn insert(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.affecting_statement(query, bindings)
    }

    /// # Errors
    /// Returns the driver error if the update fails.
    pub fn update(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.affecting_statement(query, bindings)
    }

    /// # Errors
    /// Returns the driver error if the delete fails.
    pub fn delete(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.affecting_statement(query, bindings)
    }

    /// Run an insert, then read back the generated identity on the same
    /// (write) handle using the processor's identity query.
    ///
    /// Returns 0 in `Pretend` mode.
    ///
    /// # Errors
    /// Returns `Unimplemented` when the dialect has no identity query, the
    /// driver error if either statement fails, or `ExecutionError` if the
    /// identity is not numeric.
    pub fn insert_get_id(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<i64, MiddlewareDbError> {
        let Some(id_sql) = self.processor().last_insert_id_sql() else {
            return Err(MiddlewareDbError::Unimplemented(format!(
                "{} processor cannot report inserted ids",
                self.processor().name()
            )));
        };
        let mode = self.default_mode();
        self.affecting_statement_with(query, bindings, mode)?;
        self.run(id_sql, &[], mode, || 0, |me, id_sql, _| {
            let handle = me.write_handle();
            let prepared = handle.prepare(id_sql)?;
            let raw = handle.query_prepared(&prepared, &[])?;
            let value = raw
                .results
                .first()
                .and_then(|row| row.get_by_index(0))
                .cloned()
                .unwrap_or(RowValues::Null);
            identity_value(&value)
        })
    }

    /// Compile a statement shape with the connection's grammar and run it as
    /// an affecting statement.
    ///
    /// # Errors
    /// Returns `GrammarError` if the shape cannot be rendered, or the driver
    /// error if execution fails.
    pub fn affecting_shape(
        &mut self,
        shape: impl Into<QueryShape>,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        let sql = self.compile(&shape.into())?;
        self.affecting_statement(&sql, bindings)
    }

    /// Run raw SQL text with no bindings on the write handle.
    ///
    /// # Errors
    /// Returns the driver error if execution fails.
    pub fn unprepared(
        &mut self,
        query: &str,
        mode: ExecutionMode,
    ) -> Result<(), MiddlewareDbError> {
        self.run(query, &[], mode, || (), |me, query, _| {
            me.write_handle().execute_batch(query)
        })
    }
}

fn identity_value(value: &RowValues) -> Result<i64, MiddlewareDbError> {
    match value {
        RowValues::Int(i) => Ok(*i),
        #[allow(clippy::cast_possible_truncation)]
        RowValues::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        RowValues::Text(s) => s.trim().parse().map_err(|e| {
            MiddlewareDbError::ExecutionError(format!("inserted id `{s}` is not an integer: {e}"))
        }),
        other => Err(MiddlewareDbError::ExecutionError(format!(
            "inserted id is not numeric: {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_from_common_shapes() {
        assert_eq!(identity_value(&RowValues::Int(9)).unwrap(), 9);
        assert_eq!(identity_value(&RowValues::Float(12.0)).unwrap(), 12);
        assert_eq!(identity_value(&RowValues::Text(" 41 ".into())).unwrap(), 41);
        assert!(identity_value(&RowValues::Null).is_err());
        assert!(identity_value(&RowValues::Float(1.5)).is_err());
    }
}
