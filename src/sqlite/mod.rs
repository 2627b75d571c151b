// SQLite module - rusqlite-backed physical handle
//
// - handle: `SqliteHandle`, the `PhysicalHandle` implementation
// - params: conversion from `RowValues` to rusqlite values
// - query: result extraction and building

pub mod handle;
pub mod params;
pub mod query;

pub use handle::SqliteHandle;
pub use params::Params;
pub use query::build_result_set;
