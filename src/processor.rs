use std::fmt::Debug;

use crate::results::{ResultSet, Rows};
use crate::types::{FetchMode, RowValues};

/// Result post-processor held by a [`Connection`](crate::Connection).
///
/// Shapes the raw rows a physical handle returns into what callers see, and
/// knows how the dialect reports the identity of the last inserted row.
pub trait Processor: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Shape a raw result set into caller-facing rows.
    fn process_select(&self, result_set: ResultSet, fetch_mode: FetchMode) -> Rows {
        Rows::from_result_set(result_set, fetch_mode)
    }

    /// Query returning the identity generated by the last insert on the
    /// same session, if the dialect has one.
    fn last_insert_id_sql(&self) -> Option<&'static str> {
        None
    }
}

/// Sybase returns `CHAR(n)` columns blank padded. Values pass through
/// untouched unless `trim_char_padding` is set, in which case trailing blanks
/// are stripped from every text cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SybaseProcessor {
    pub trim_char_padding: bool,
}

impl SybaseProcessor {
    #[must_use]
    pub fn new(trim_char_padding: bool) -> Self {
        Self { trim_char_padding }
    }
}

impl Processor for SybaseProcessor {
    fn name(&self) -> &'static str {
        "sybase"
    }

    fn process_select(&self, mut result_set: ResultSet, fetch_mode: FetchMode) -> Rows {
        if self.trim_char_padding {
            result_set.map_values(|value| {
                if let RowValues::Text(text) = value {
                    let trimmed = text.trim_end_matches(' ').len();
                    text.truncate(trimmed);
                }
            });
        }
        Rows::from_result_set(result_set, fetch_mode)
    }

    /// `@@identity` is `numeric(38,0)`; the cast keeps it an integer cell.
    fn last_insert_id_sql(&self) -> Option<&'static str> {
        Some("select convert(bigint, @@identity) as id")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerProcessor;

impl Processor for SqlServerProcessor {
    fn name(&self) -> &'static str {
        "sqlsrv"
    }

    fn last_insert_id_sql(&self) -> Option<&'static str> {
        Some("select cast(scope_identity() as bigint) as id")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteProcessor;

impl Processor for SqliteProcessor {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn last_insert_id_sql(&self) -> Option<&'static str> {
        Some("select last_insert_rowid() as id")
    }
}

/// Pass-through processor for unrecognized drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProcessor;

impl Processor for DefaultProcessor {
    fn name(&self) -> &'static str {
        "default"
    }
}
