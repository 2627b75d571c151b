use std::fmt;

use tokio::runtime::{Builder, Runtime};

use super::client::create_mssql_client;
use super::config::{MssqlClient, MssqlOptions};
use super::query;
use crate::error::MiddlewareDbError;
use crate::handle::{PhysicalHandle, Prepared};
use crate::results::ResultSet;
use crate::translation::{PlaceholderStyle, translate_placeholders};
use crate::types::RowValues;

/// Blocking physical handle over a tiberius client.
///
/// Each call drives the async client to completion on a private
/// current-thread runtime, so callers never see a future. Do not use it from
/// inside another tokio runtime's worker thread.
pub struct TdsHandle {
    client: MssqlClient,
    runtime: Runtime,
    identity: String,
}

impl TdsHandle {
    /// Connect using `opts`.
    ///
    /// # Errors
    /// Returns `MiddlewareDbError::ConnectionError` if the runtime cannot be
    /// built or the server cannot be reached.
    pub fn connect(opts: &MssqlOptions) -> Result<Self, MiddlewareDbError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| MiddlewareDbError::ConnectionError(format!("runtime error: {e}")))?;
        let client = runtime.block_on(create_mssql_client(opts))?;
        Ok(Self {
            client,
            runtime,
            identity: opts.driver_identity.clone(),
        })
    }
}

impl fmt::Debug for TdsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TdsHandle")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl PhysicalHandle for TdsHandle {
    fn driver_identity(&self) -> &str {
        &self.identity
    }

    /// Rewrites `?` placeholders to `@P1..`; the server validates on first
    /// execution.
    fn prepare(&mut self, sql: &str) -> Result<Prepared, MiddlewareDbError> {
        Ok(Prepared::new(translate_placeholders(sql, PlaceholderStyle::AtP)))
    }

    fn query_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<ResultSet, MiddlewareDbError> {
        self.runtime
            .block_on(query::build_result_set(&mut self.client, prepared.sql(), params))
    }

    fn execute_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.runtime
            .block_on(query::execute_dml(&mut self.client, prepared.sql(), params))
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), MiddlewareDbError> {
        self.runtime
            .block_on(query::execute_batch(&mut self.client, sql))
    }
}
