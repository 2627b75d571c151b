mod common;

use std::panic::{self, AssertUnwindSafe};

use common::{Call, ScriptedHandle};
use sybase_middleware::prelude::*;

fn manual_conn(identity: &str) -> (Connection, common::Recorder) {
    let (handle, recorder) = ScriptedHandle::new(identity);
    recorder.set_affected(1);
    let conn = Connection::new(handle, "app", "", ConnectionConfig::default());
    assert!(!conn.supports_native_transactions());
    (conn, recorder)
}

#[test]
fn commit_follows_successful_work() -> Result<(), Box<dyn std::error::Error>> {
    let (mut conn, recorder) = manual_conn("dblib");

    let inserted = conn.transaction(|tx| {
        assert_eq!(tx.transaction_level(), 1);
        tx.insert("insert into t (a) values (?)", &[RowValues::Int(1)])
    })?;
    assert_eq!(inserted, 1);
    assert_eq!(conn.transaction_level(), 0);

    assert_eq!(
        recorder.calls(),
        vec![
            Call::batch(BEGIN_TRAN),
            Call::Prepare("insert into t (a) values (?)".into()),
            Call::Execute("insert into t (a) values (?)".into(), vec![RowValues::Int(1)]),
            Call::batch(COMMIT_TRAN),
        ]
    );
    Ok(())
}

#[test]
fn rollback_precedes_the_original_error() {
    let (mut conn, recorder) = manual_conn("tds");

    let err = conn
        .transaction(|tx| {
            tx.insert("insert into t (a) values (?)", &[RowValues::Int(1)])?;
            Err::<(), _>(MiddlewareDbError::ExecutionError("duplicate key".into()))
        })
        .unwrap_err();

    assert!(matches!(&err, MiddlewareDbError::ExecutionError(msg) if msg == "duplicate key"));
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, ROLLBACK_TRAN]);
    assert_eq!(recorder.count(&Call::batch(COMMIT_TRAN)), 0);
}

#[test]
fn failing_statement_inside_work_is_rolled_back() {
    let (mut conn, recorder) = manual_conn("dblib");
    recorder.fail_on("insert into t");

    let err = conn
        .transaction(|tx| tx.insert("insert into t (a) values (?)", &[RowValues::Int(1)]))
        .unwrap_err();

    assert!(matches!(err, MiddlewareDbError::ExecutionError(_)));
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, ROLLBACK_TRAN]);
}

#[test]
fn caller_errors_survive_the_rollback() {
    let (mut conn, recorder) = manual_conn("dblib");

    let err = conn
        .transaction(|_| -> Result<(), MiddlewareDbError> {
            let parsed: Result<i32, _> = "not a number".parse::<i32>();
            parsed.map_err(MiddlewareDbError::unit_of_work)?;
            Ok(())
        })
        .unwrap_err();

    let MiddlewareDbError::UnitOfWork(source) = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(source.downcast_ref::<std::num::ParseIntError>().is_some());
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, ROLLBACK_TRAN]);
}

#[test]
fn failed_rollback_reports_both_errors() {
    let (mut conn, recorder) = manual_conn("dblib");
    recorder.fail_on(ROLLBACK_TRAN);

    let err = conn
        .transaction(|_| Err::<(), _>(MiddlewareDbError::Other("work failed".into())))
        .unwrap_err();

    match &err {
        MiddlewareDbError::RollbackFailed { original, rollback } => {
            assert!(matches!(original.as_ref(), MiddlewareDbError::Other(msg) if msg == "work failed"));
            assert!(matches!(rollback.as_ref(), MiddlewareDbError::ExecutionError(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.original(), MiddlewareDbError::Other(_)));
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, ROLLBACK_TRAN]);
}

#[test]
fn failed_begin_skips_the_work() {
    let (mut conn, recorder) = manual_conn("dblib");
    recorder.fail_on(BEGIN_TRAN);

    let mut ran = false;
    let err = conn
        .transaction(|_| {
            ran = true;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, MiddlewareDbError::ExecutionError(_)));
    assert!(!ran);
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN]);
    assert_eq!(conn.transaction_level(), 0);
}

#[test]
fn failed_commit_is_returned_without_rollback() {
    let (mut conn, recorder) = manual_conn("dblib");
    recorder.fail_on(COMMIT_TRAN);

    let err = conn.transaction(|_| Ok(())).unwrap_err();

    assert!(matches!(err, MiddlewareDbError::ExecutionError(_)));
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, COMMIT_TRAN]);
}

#[test]
fn nested_transactions_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (mut conn, recorder) = manual_conn("dblib");

    conn.transaction(|tx| {
        let nested = tx.transaction(|_| Ok(()));
        assert!(matches!(nested, Err(MiddlewareDbError::NestedTransaction)));
        Ok(())
    })?;

    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, COMMIT_TRAN]);
    Ok(())
}

#[test]
fn panicking_work_is_rolled_back_and_resumed() {
    let (mut conn, recorder) = manual_conn("dblib");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        conn.transaction::<(), _>(|_| panic!("kaboom"))
    }));

    assert!(outcome.is_err());
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, ROLLBACK_TRAN]);
    assert_eq!(conn.transaction_level(), 0);
}

#[test]
fn native_drivers_issue_no_tran_literals() -> Result<(), Box<dyn std::error::Error>> {
    let (handle, recorder) = ScriptedHandle::new("pdo_bdlib");
    let mut conn = Connection::new(handle, "app", "", ConnectionConfig::default());
    assert!(conn.supports_native_transactions());

    conn.transaction(|tx| tx.update("update t set a = 1", &[]))?;
    let _ = conn.transaction(|_| Err::<(), _>(MiddlewareDbError::Other("no".into())));

    let calls = recorder.calls();
    assert_eq!(calls.first(), Some(&Call::BeginNative));
    assert_eq!(recorder.count(&Call::BeginNative), 2);
    assert_eq!(recorder.count(&Call::CommitNative), 1);
    assert_eq!(recorder.count(&Call::RollbackNative), 1);
    assert!(recorder.batches().is_empty());
    Ok(())
}

#[test]
fn config_can_force_manual_transactions() -> Result<(), Box<dyn std::error::Error>> {
    let (handle, recorder) = ScriptedHandle::new("pdo_bdlib");
    let config = ConnectionConfig::default().with_native_transactions(false);
    let mut conn = Connection::new(handle, "app", "", config);

    conn.transaction(|_| Ok(()))?;
    assert_eq!(recorder.batches(), vec![BEGIN_TRAN, COMMIT_TRAN]);
    assert_eq!(recorder.count(&Call::BeginNative), 0);
    Ok(())
}

#[test]
fn tran_markers_bypass_pretend_and_the_query_log() -> Result<(), Box<dyn std::error::Error>> {
    let (handle, recorder) = ScriptedHandle::new("dblib");
    let config = ConnectionConfig::default()
        .with_pretending(true)
        .with_query_log(true);
    let mut conn = Connection::new(handle, "app", "", config);

    conn.transaction(|tx| tx.delete("delete from t", &[]))?;

    assert_eq!(recorder.calls(), vec![Call::batch(BEGIN_TRAN), Call::batch(COMMIT_TRAN)]);
    let logged: Vec<_> = conn.query_log().iter().map(|q| q.sql.as_str()).collect();
    assert_eq!(logged, vec!["delete from t"]);
    Ok(())
}

#[cfg(feature = "sqlite")]
mod manual_only_sqlite {
    use super::*;
    use crate::common::ManualSqliteHandle;

    fn setup() -> Result<(Connection, common::Recorder), MiddlewareDbError> {
        let (handle, recorder) = ManualSqliteHandle::new(SqliteHandle::open_in_memory()?);
        let mut conn = Connection::new(handle, "main", "", ConnectionConfig::default());
        conn.unprepared(
            "create table people (id integer primary key, name text not null)",
            ExecutionMode::Execute,
        )?;
        recorder.clear();
        Ok((conn, recorder))
    }

    fn count(conn: &mut Connection) -> Result<i64, MiddlewareDbError> {
        let rows = conn.select("select count(*) as n from people", &[])?;
        let rs = rows.into_result_set().unwrap();
        Ok(*rs.results[0].get("n").and_then(RowValues::as_int).unwrap())
    }

    #[test]
    fn failing_work_leaves_no_row() -> Result<(), Box<dyn std::error::Error>> {
        let (mut conn, recorder) = setup()?;
        assert_eq!(conn.driver_kind(), DriverKind::Sybase);

        let err = conn
            .transaction(|tx| {
                tx.insert("insert into people (name) values (?)", &[RowValues::Text("ann".into())])?;
                Err::<(), _>(MiddlewareDbError::Other("abort".into()))
            })
            .unwrap_err();

        assert!(matches!(&err, MiddlewareDbError::Other(msg) if msg == "abort"));
        assert_eq!(recorder.batches(), vec![BEGIN_TRAN, ROLLBACK_TRAN]);
        assert!(recorder.calls().iter().any(|c| matches!(c, Call::Execute(sql, _) if sql.starts_with("insert"))));
        assert_eq!(count(&mut conn)?, 0);
        Ok(())
    }

    #[test]
    fn successful_work_keeps_the_row() -> Result<(), Box<dyn std::error::Error>> {
        let (mut conn, recorder) = setup()?;

        conn.transaction(|tx| {
            tx.insert("insert into people (name) values (?)", &[RowValues::Text("bo".into())])
        })?;

        assert_eq!(recorder.batches(), vec![BEGIN_TRAN, COMMIT_TRAN]);
        assert_eq!(count(&mut conn)?, 1);
        Ok(())
    }
}
