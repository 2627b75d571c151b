use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::MiddlewareDbError;
use crate::types::{ExecutionMode, FetchMode};

/// Configuration recognized when a [`Connection`](crate::Connection) is built.
///
/// Every key is optional; missing keys fall back to empty/identity values and
/// unknown keys are ignored, so a host's full connection map can be passed in
/// as-is:
/// ```rust
/// use sybase_middleware::prelude::*;
///
/// let cfg = ConnectionConfig::from_json(
///     r#"{"driver": "dblib", "host": "ase01", "prefix": "app_", "fetch_mode": "assoc"}"#,
/// )?;
/// assert_eq!(cfg.driver, "dblib");
/// assert_eq!(cfg.fetch_mode, FetchMode::Assoc);
/// # Ok::<(), MiddlewareDbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Driver identity; selects grammar, processor and the transaction path.
    /// When empty the write handle's own identity is used.
    pub driver: String,
    pub host: Option<String>,
    pub database: Option<String>,
    /// Table prefix, used when the constructor is given an empty one.
    pub prefix: Option<String>,
    /// Start every default-mode call as a dry run.
    pub pretending: bool,
    pub fetch_mode: FetchMode,
    /// Override the driver table's native transaction capability.
    pub native_transactions: Option<bool>,
    /// Record executed statements in the query log from the start.
    pub log_queries: bool,
    /// Strip trailing blanks from text cells on Sybase connections. The
    /// driver does not say whether a column is `CHAR(n)`, so this also trims
    /// `VARCHAR` values that really end in spaces.
    pub trim_char_padding: bool,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration map.
    ///
    /// # Errors
    /// Returns `MiddlewareDbError::ConfigError` if the text is not a JSON
    /// object or a recognized key has the wrong type.
    pub fn from_json(text: &str) -> Result<Self, MiddlewareDbError> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| MiddlewareDbError::ConfigError(format!("invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build from an already parsed configuration map.
    ///
    /// # Errors
    /// Returns `MiddlewareDbError::ConfigError` if `value` is not an object or
    /// a recognized key has the wrong type.
    pub fn from_value(value: JsonValue) -> Result<Self, MiddlewareDbError> {
        if !value.is_object() {
            return Err(MiddlewareDbError::ConfigError(
                "connection config must be a map".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| MiddlewareDbError::ConfigError(format!("invalid connection config: {e}")))
    }

    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_pretending(mut self, pretending: bool) -> Self {
        self.pretending = pretending;
        self
    }

    #[must_use]
    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    #[must_use]
    pub fn with_native_transactions(mut self, native: bool) -> Self {
        self.native_transactions = Some(native);
        self
    }

    #[must_use]
    pub fn with_query_log(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    #[must_use]
    pub fn with_trim_char_padding(mut self, trim: bool) -> Self {
        self.trim_char_padding = trim;
        self
    }

    /// Execution mode used by calls that do not pass one explicitly.
    #[must_use]
    pub fn default_mode(&self) -> ExecutionMode {
        if self.pretending {
            ExecutionMode::Pretend
        } else {
            ExecutionMode::Execute
        }
    }
}
