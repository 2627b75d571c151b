use std::fmt;
use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::driver::{self, DriverKind, DriverProfile};
use crate::error::MiddlewareDbError;
use crate::grammar::{Grammar, QueryShape};
use crate::handle::PhysicalHandle;
use crate::processor::Processor;
use crate::types::{ExecutionMode, FetchMode};

use super::run::QueryLog;
use super::tx::TransactionState;

/// One logical database connection.
///
/// Owns the write handle, an optional read handle used only for
/// row-returning statements, and the grammar/processor pair picked from the
/// driver identity. The pair and the transaction capability are fixed for the
/// lifetime of the connection.
///
/// Every operation takes `&mut self`: a connection serves one caller at a
/// time. Share work across threads with one connection per worker or an
/// external mutex.
pub struct Connection {
    pub(crate) write: Box<dyn PhysicalHandle>,
    pub(crate) read: Option<Box<dyn PhysicalHandle>>,
    database: String,
    table_prefix: String,
    config: ConnectionConfig,
    driver_name: String,
    profile: DriverProfile,
    native_transactions: bool,
    grammar: Arc<dyn Grammar>,
    processor: Arc<dyn Processor>,
    pub(crate) tx_state: TransactionState,
    pub(crate) query_log: QueryLog,
}

impl Connection {
    /// Wrap an already opened write handle.
    ///
    /// An empty `database` or `table_prefix` falls back to the `database` /
    /// `prefix` entries of `config`. The driver identity is `config.driver`
    /// when set, otherwise whatever the handle reports.
    pub fn new<H>(
        write: H,
        database: impl Into<String>,
        table_prefix: impl Into<String>,
        config: ConnectionConfig,
    ) -> Self
    where
        H: PhysicalHandle + 'static,
    {
        let mut database = database.into();
        if database.is_empty() {
            database = config.database.clone().unwrap_or_default();
        }
        let mut table_prefix = table_prefix.into();
        if table_prefix.is_empty() {
            table_prefix = config.prefix.clone().unwrap_or_default();
        }

        let driver_name = if config.driver.trim().is_empty() {
            write.driver_identity().to_string()
        } else {
            config.driver.clone()
        };
        let profile = driver::resolve(&driver_name);
        let native_transactions = config
            .native_transactions
            .unwrap_or(profile.native_transactions);

        let grammar = driver::grammar_for(profile.kind, &table_prefix);
        let processor = driver::processor_for(profile.kind, config.trim_char_padding);
        let query_log = QueryLog::new(config.log_queries);

        tracing::debug!(
            driver = %driver_name,
            grammar = grammar.name(),
            processor = processor.name(),
            native_transactions,
            "connection configured"
        );

        Self {
            write: Box::new(write),
            read: None,
            database,
            table_prefix,
            config,
            driver_name,
            profile,
            native_transactions,
            grammar,
            processor,
            tx_state: TransactionState::default(),
            query_log,
        }
    }

    /// Route row-returning statements to a separate handle (e.g. a replica).
    #[must_use]
    pub fn with_read_handle<H>(mut self, read: H) -> Self
    where
        H: PhysicalHandle + 'static,
    {
        self.read = Some(Box::new(read));
        self
    }

    #[must_use]
    pub fn grammar(&self) -> &dyn Grammar {
        self.grammar.as_ref()
    }

    #[must_use]
    pub fn processor(&self) -> &dyn Processor {
        self.processor.as_ref()
    }

    pub(crate) fn processor_handle(&self) -> Arc<dyn Processor> {
        Arc::clone(&self.processor)
    }

    #[must_use]
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    #[must_use]
    pub fn driver_kind(&self) -> DriverKind {
        self.profile.kind
    }

    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        self.config.fetch_mode
    }

    /// Mode used by calls that do not take one explicitly.
    #[must_use]
    pub fn default_mode(&self) -> ExecutionMode {
        self.config.default_mode()
    }

    #[must_use]
    pub fn supports_native_transactions(&self) -> bool {
        self.native_transactions
    }

    pub fn write_handle(&mut self) -> &mut dyn PhysicalHandle {
        self.write.as_mut()
    }

    /// The read handle, or the write handle when none was attached or a
    /// transaction is open.
    pub fn read_handle(&mut self) -> &mut dyn PhysicalHandle {
        if self.tx_state.is_active() {
            return self.write.as_mut();
        }
        match self.read.as_mut() {
            Some(read) => read.as_mut(),
            None => self.write.as_mut(),
        }
    }

    #[must_use]
    pub fn has_read_handle(&self) -> bool {
        self.read.is_some()
    }

    /// Render a statement shape with this connection's grammar.
    ///
    /// # Errors
    /// Returns `GrammarError` if the grammar cannot render the shape.
    pub fn compile(&self, shape: &QueryShape) -> Result<String, MiddlewareDbError> {
        self.grammar.compile(shape)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("driver", &self.driver_name)
            .field("database", &self.database)
            .field("table_prefix", &self.table_prefix)
            .field("grammar", &self.grammar.name())
            .field("processor", &self.processor.name())
            .field("native_transactions", &self.native_transactions)
            .field("has_read_handle", &self.read.is_some())
            .field("transaction_level", &self.tx_state.level())
            .finish_non_exhaustive()
    }
}
