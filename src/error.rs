use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiddlewareDbError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Grammar error: {0}")]
    GrammarError(String),

    /// A `transaction` call was made while another one was still open on the
    /// same connection.
    #[error("Nested transactions are not supported on this connection")]
    NestedTransaction,

    /// The unit of work failed and the rollback issued afterwards failed too.
    /// `original` is the failure raised by the unit of work.
    #[error("{original} (rollback also failed: {rollback})")]
    RollbackFailed {
        #[source]
        original: Box<MiddlewareDbError>,
        rollback: Box<MiddlewareDbError>,
    },

    /// Caller-defined failure raised inside a unit of work.
    #[error("Unit of work failed: {0}")]
    UnitOfWork(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl MiddlewareDbError {
    /// Wrap any caller error so it can be returned from a transaction closure.
    pub fn unit_of_work<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MiddlewareDbError::UnitOfWork(Box::new(err))
    }

    /// The failure that started it all, looking through `RollbackFailed`.
    #[must_use]
    pub fn original(&self) -> &MiddlewareDbError {
        match self {
            MiddlewareDbError::RollbackFailed { original, .. } => original.original(),
            other => other,
        }
    }
}
