// Connection module - one logical database connection
//
// - core: handles, identity, collaborators chosen at construction
// - run: the shared execution wrapper and query log
// - select / dml: row-returning and affected-row entry points
// - tx: manual or native transaction control
// - pretend: dry-run view over a connection

mod core;
mod dml;
mod pretend;
mod run;
mod select;
mod tx;

pub use core::Connection;
pub use pretend::PretendConnection;
pub use run::LoggedQuery;
pub use tx::{BEGIN_TRAN, COMMIT_TRAN, ROLLBACK_TRAN};
