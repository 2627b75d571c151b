use std::time::{Duration, Instant};

use crate::error::MiddlewareDbError;
use crate::types::{ExecutionMode, RowValues};

use super::Connection;

/// A statement that went through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedQuery {
    pub sql: String,
    pub bindings: Vec<RowValues>,
    pub elapsed: Duration,
    pub mode: ExecutionMode,
}

/// Statements are kept while logging is enabled. Dry-run statements are also
/// kept while a [`Connection::pretend`] block is capturing them.
#[derive(Debug, Default)]
pub(crate) struct QueryLog {
    enabled: bool,
    capturing: u32,
    pub(crate) entries: Vec<LoggedQuery>,
}

impl QueryLog {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            capturing: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn begin_capture(&mut self) {
        self.capturing += 1;
    }

    pub(crate) fn end_capture(&mut self) {
        self.capturing = self.capturing.saturating_sub(1);
    }

    fn record(&mut self, entry: LoggedQuery) {
        if self.enabled || (self.capturing > 0 && entry.mode.is_pretend()) {
            self.entries.push(entry);
        }
    }
}

impl Connection {
    /// Shared execution wrapper for every pipeline entry point.
    ///
    /// In `Pretend` mode `on_pretend` supplies the result and `exec` is never
    /// called, so no handle is touched. Failures from `exec` are returned
    /// as-is.
    pub(crate) fn run<T, P, F>(
        &mut self,
        query: &str,
        bindings: &[RowValues],
        mode: ExecutionMode,
        on_pretend: P,
        exec: F,
    ) -> Result<T, MiddlewareDbError>
    where
        P: FnOnce() -> T,
        F: FnOnce(&mut Connection, &str, &[RowValues]) -> Result<T, MiddlewareDbError>,
    {
        let start = Instant::now();
        let result = match mode {
            ExecutionMode::Pretend => Ok(on_pretend()),
            ExecutionMode::Execute => exec(self, query, bindings),
        };
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => tracing::debug!(
                sql = query,
                bindings = bindings.len(),
                ?mode,
                elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                "statement completed"
            ),
            Err(err) => tracing::debug!(
                sql = query,
                bindings = bindings.len(),
                ?mode,
                error = %err,
                "statement failed"
            ),
        }

        self.query_log.record(LoggedQuery {
            sql: query.to_string(),
            bindings: bindings.to_vec(),
            elapsed,
            mode,
        });
        result
    }

    /// Keep executed statements in the query log.
    pub fn enable_query_log(&mut self) {
        self.query_log.enabled = true;
    }

    pub fn disable_query_log(&mut self) {
        self.query_log.enabled = false;
    }

    #[must_use]
    pub fn logging_queries(&self) -> bool {
        self.query_log.enabled
    }

    #[must_use]
    pub fn query_log(&self) -> &[LoggedQuery] {
        &self.query_log.entries
    }

    /// Empty the query log, returning what it held.
    pub fn flush_query_log(&mut self) -> Vec<LoggedQuery> {
        std::mem::take(&mut self.query_log.entries)
    }
}
