// MSSQL module - tiberius-backed physical handle for TDS servers
//
// - config: connection options
// - client: raw client creation
// - query: result extraction, building, and query binding
// - handle: `TdsHandle`, a blocking `PhysicalHandle` over the async client
//
// tiberius has no transaction API, so these identities resolve to manual
// `BEGIN/COMMIT/ROLLBACK TRAN` control.

pub mod client;
pub mod config;
pub mod handle;
pub mod query;

pub use client::create_mssql_client;
pub use config::{MssqlClient, MssqlOptions, MssqlOptionsBuilder};
pub use handle::TdsHandle;
pub use query::build_result_set;
