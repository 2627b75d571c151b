//! Blocking connection wrapper for Sybase-family drivers.
//!
//! A [`Connection`] owns an already opened write handle (and optionally a
//! read handle), picks a [`Grammar`](grammar::Grammar) and
//! [`Processor`](processor::Processor) from the driver identity, and runs
//! every statement through one pipeline that supports dry runs and a query
//! log. Transactions are delimited with literal `BEGIN TRAN` /
//! `COMMIT TRAN` / `ROLLBACK TRAN` unless the driver's native transactions
//! are trusted.
//!
//! ```rust
//! use sybase_middleware::prelude::*;
//!
//! # fn main() -> Result<(), MiddlewareDbError> {
//! let handle = SqliteHandle::open_in_memory()?;
//! let mut conn = Connection::new(handle, "main", "", ConnectionConfig::default());
//! conn.unprepared("create table t (id integer primary key, name text)", ExecutionMode::Execute)?;
//!
//! conn.transaction(|tx| {
//!     tx.insert("insert into t (name) values (?)", &[RowValues::Text("alice".into())])
//! })?;
//!
//! let rows = conn.select("select name from t", &[])?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod handle;
pub mod prelude;
pub mod processor;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::ConnectionConfig;
pub use connection::{Connection, LoggedQuery, PretendConnection};
pub use error::MiddlewareDbError;
pub use handle::{PhysicalHandle, Prepared};
pub use results::{AssocRow, CustomDbRow, ResultSet, Rows};
pub use types::{ExecutionMode, FetchMode, RowValues};
