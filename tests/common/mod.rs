#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sybase_middleware::prelude::*;

/// One call a test handle received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Prepare(String),
    Query(String, Vec<RowValues>),
    Execute(String, Vec<RowValues>),
    Batch(String),
    BeginNative,
    CommitNative,
    RollbackNative,
}

impl Call {
    pub fn batch(sql: &str) -> Self {
        Call::Batch(sql.to_string())
    }
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<Call>,
    fail_on: Vec<String>,
    rows: Option<ResultSet>,
    affected: usize,
}

/// Call log shared between a test and the handle it gave away.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Script>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn batches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Batch(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Any statement containing `needle` fails with an execution error.
    pub fn fail_on(&self, needle: &str) {
        self.inner.lock().unwrap().fail_on.push(needle.to_string());
    }

    pub fn set_rows(&self, rows: ResultSet) {
        self.inner.lock().unwrap().rows = Some(rows);
    }

    pub fn set_affected(&self, affected: usize) {
        self.inner.lock().unwrap().affected = affected;
    }

    fn push(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }

    fn check(&self, sql: &str) -> Result<(), MiddlewareDbError> {
        let script = self.inner.lock().unwrap();
        match script.fail_on.iter().find(|n| sql.contains(n.as_str())) {
            Some(needle) => Err(MiddlewareDbError::ExecutionError(format!(
                "scripted failure on `{needle}`"
            ))),
            None => Ok(()),
        }
    }
}

/// Handle with no database behind it: records calls and answers from a script.
#[derive(Debug)]
pub struct ScriptedHandle {
    identity: String,
    recorder: Recorder,
}

impl ScriptedHandle {
    pub fn new(identity: &str) -> (Self, Recorder) {
        let recorder = Recorder::default();
        (
            Self {
                identity: identity.to_string(),
                recorder: recorder.clone(),
            },
            recorder,
        )
    }
}

impl PhysicalHandle for ScriptedHandle {
    fn driver_identity(&self) -> &str {
        &self.identity
    }

    fn prepare(&mut self, sql: &str) -> Result<Prepared, MiddlewareDbError> {
        self.recorder.push(Call::Prepare(sql.to_string()));
        Ok(Prepared::new(sql))
    }

    fn query_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<ResultSet, MiddlewareDbError> {
        self.recorder
            .push(Call::Query(prepared.sql().to_string(), params.to_vec()));
        self.recorder.check(prepared.sql())?;
        let script = self.recorder.inner.lock().unwrap();
        Ok(script.rows.clone().unwrap_or_default())
    }

    fn execute_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.recorder
            .push(Call::Execute(prepared.sql().to_string(), params.to_vec()));
        self.recorder.check(prepared.sql())?;
        Ok(self.recorder.inner.lock().unwrap().affected)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), MiddlewareDbError> {
        self.recorder.push(Call::Batch(sql.to_string()));
        self.recorder.check(sql)
    }

    fn begin_native(&mut self) -> Result<(), MiddlewareDbError> {
        self.recorder.push(Call::BeginNative);
        Ok(())
    }

    fn commit_native(&mut self) -> Result<(), MiddlewareDbError> {
        self.recorder.push(Call::CommitNative);
        Ok(())
    }

    fn rollback_native(&mut self) -> Result<(), MiddlewareDbError> {
        self.recorder.push(Call::RollbackNative);
        Ok(())
    }
}

/// SQLite-backed handle that reports `manual-only` and accepts the literal
/// `BEGIN TRAN` / `COMMIT TRAN` / `ROLLBACK TRAN` markers.
#[cfg(feature = "sqlite")]
#[derive(Debug)]
pub struct ManualSqliteHandle {
    inner: SqliteHandle,
    recorder: Recorder,
}

#[cfg(feature = "sqlite")]
impl ManualSqliteHandle {
    pub fn new(inner: SqliteHandle) -> (Self, Recorder) {
        let recorder = Recorder::default();
        (
            Self {
                inner,
                recorder: recorder.clone(),
            },
            recorder,
        )
    }
}

#[cfg(feature = "sqlite")]
impl PhysicalHandle for ManualSqliteHandle {
    fn driver_identity(&self) -> &str {
        "manual-only"
    }

    fn prepare(&mut self, sql: &str) -> Result<Prepared, MiddlewareDbError> {
        self.recorder.push(Call::Prepare(sql.to_string()));
        self.inner.prepare(sql)
    }

    fn query_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<ResultSet, MiddlewareDbError> {
        self.recorder
            .push(Call::Query(prepared.sql().to_string(), params.to_vec()));
        self.inner.query_prepared(prepared, params)
    }

    fn execute_prepared(
        &mut self,
        prepared: &Prepared,
        params: &[RowValues],
    ) -> Result<usize, MiddlewareDbError> {
        self.recorder
            .push(Call::Execute(prepared.sql().to_string(), params.to_vec()));
        self.inner.execute_prepared(prepared, params)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<(), MiddlewareDbError> {
        self.recorder.push(Call::Batch(sql.to_string()));
        self.recorder.check(sql)?;
        let native = match sql {
            BEGIN_TRAN => "BEGIN",
            COMMIT_TRAN => "COMMIT",
            ROLLBACK_TRAN => "ROLLBACK",
            other => other,
        };
        self.inner.execute_batch(native)
    }
}

/// Result set with the given columns and rows.
pub fn result_set(columns: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
    let mut rs = ResultSet::with_capacity(rows.len());
    rs.set_column_names(Arc::new(columns.iter().map(|c| (*c).to_string()).collect()));
    for row in rows {
        rs.add_row_values(row);
    }
    rs
}
