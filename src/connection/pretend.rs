use crate::error::MiddlewareDbError;
use crate::grammar::{Grammar, QueryShape, SelectQuery};
use crate::results::Rows;
use crate::types::{ExecutionMode, RowValues};

use super::{Connection, LoggedQuery};

/// Dry-run view over a [`Connection`]: every call runs in
/// [`ExecutionMode::Pretend`], so statements are recorded but never reach a
/// physical handle.
pub struct PretendConnection<'a> {
    conn: &'a mut Connection,
}

impl PretendConnection<'_> {
    /// # Errors
    /// Never fails in practice; the signature mirrors [`Connection::select`].
    pub fn select(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<Rows, MiddlewareDbError> {
        self.conn.select_with(query, bindings, ExecutionMode::Pretend)
    }

    /// # Errors
    /// Returns `GrammarError` if the shape cannot be rendered.
    pub fn select_shape(
        &mut self,
        query: SelectQuery,
        bindings: &[RowValues],
    ) -> Result<Rows, MiddlewareDbError> {
        let sql = self.conn.compile(&QueryShape::Select(query))?;
        self.select(&sql, bindings)
    }

    /// # Errors
    /// Never fails in practice; the signature mirrors
    /// [`Connection::affecting_statement`].
    pub fn affecting_statement(
        &mut self,
        query: &str,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.conn
            .affecting_statement_with(query, bindings, ExecutionMode::Pretend)
    }

    /// # Errors
    /// Returns `GrammarError` if the shape cannot be rendered.
    pub fn affecting_shape(
        &mut self,
        shape: impl Into<QueryShape>,
        bindings: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        let sql = self.conn.compile(&shape.into())?;
        self.affecting_statement(&sql, bindings)
    }

    /// # Errors
    /// Never fails in practice.
    pub fn unprepared(&mut self, query: &str) -> Result<(), MiddlewareDbError> {
        self.conn.unprepared(query, ExecutionMode::Pretend)
    }

    #[must_use]
    pub fn grammar(&self) -> &dyn Grammar {
        self.conn.grammar()
    }
}

impl Connection {
    /// Run `work` against a dry-run view of this connection and return the
    /// statements it would have executed.
    ///
    /// # Errors
    /// Returns whatever `work` returns; statements recorded before the
    /// failure are discarded with it.
    pub fn pretend<F>(&mut self, work: F) -> Result<Vec<LoggedQuery>, MiddlewareDbError>
    where
        F: FnOnce(&mut PretendConnection<'_>) -> Result<(), MiddlewareDbError>,
    {
        let start = self.query_log.entries.len();
        self.query_log.begin_capture();
        let result = work(&mut PretendConnection { conn: self });
        self.query_log.end_capture();
        let recorded = self.query_log.entries.split_off(start);
        result.map(|()| recorded)
    }
}
