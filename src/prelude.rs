//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::ConnectionConfig;
pub use crate::connection::{
    BEGIN_TRAN, COMMIT_TRAN, Connection, LoggedQuery, PretendConnection, ROLLBACK_TRAN,
};
pub use crate::driver::{DriverKind, DriverProfile};
pub use crate::error::MiddlewareDbError;
pub use crate::grammar::{
    DeleteQuery, Direction, Filterable, Grammar, InsertQuery, QueryShape, SelectQuery,
    UpdateQuery,
};
pub use crate::handle::{PhysicalHandle, Prepared};
pub use crate::processor::Processor;
pub use crate::results::{AssocRow, CustomDbRow, ResultSet, Rows};
pub use crate::translation::{PlaceholderStyle, translate_placeholders};
pub use crate::types::{ExecutionMode, FetchMode, RowValues};

#[cfg(feature = "mssql")]
pub use crate::mssql::{MssqlOptions, MssqlOptionsBuilder, TdsHandle};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteHandle;
