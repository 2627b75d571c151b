use std::sync::Arc;

use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::Query;
use tiberius::numeric::Numeric;

use super::config::MssqlClient;
use crate::error::MiddlewareDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run a row-returning statement and collect every row.
///
/// # Errors
/// Returns `MiddlewareDbError::MssqlError` carrying the server error if the
/// query, column fetch or row fetch fails.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, MiddlewareDbError> {
    let mut stream = bind_query_params(query, params).query(client).await?;

    let column_names: Vec<String> = stream
        .columns()
        .await?
        .map(|cols| cols.iter().map(|col| col.name().to_string()).collect())
        .unwrap_or_default();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_stream = stream.into_row_stream();
    while let Some(row) = rows_stream.try_next().await? {
        let row_values = (0..col_count).map(|i| extract_value(&row, i)).collect();
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Run a statement and return the summed affected row count.
///
/// # Errors
/// Returns `MiddlewareDbError::MssqlError` if execution fails.
pub async fn execute_dml(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<usize, MiddlewareDbError> {
    let result = bind_query_params(query, params).execute(client).await?;
    let rows_affected: u64 = result.rows_affected().iter().sum();
    usize::try_from(rows_affected).map_err(|e| {
        MiddlewareDbError::ExecutionError(format!("Invalid rows affected count: {e}"))
    })
}

/// Send raw text as a plain SQL batch (no `sp_executesql` wrapper), so
/// `BEGIN TRAN` stays open across calls.
///
/// # Errors
/// Returns `MiddlewareDbError::MssqlError` if the batch fails.
pub async fn execute_batch(client: &mut MssqlClient, sql: &str) -> Result<(), MiddlewareDbError> {
    client.simple_query(sql).await?.into_results().await?;
    Ok(())
}

/// Extract a value from a row at a specific index, trying the common column
/// types in turn. Unreadable cells become `Null`.
fn extract_value(row: &tiberius::Row, idx: usize) -> RowValues {
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return RowValues::Int(val);
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<Numeric, _>(idx) {
        return numeric_value(val);
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return RowValues::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return RowValues::Float(val);
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return RowValues::Bool(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return RowValues::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return RowValues::Text(val.to_string());
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return RowValues::Blob(val.to_vec());
    }
    RowValues::Null
}

/// `numeric`/`decimal` cells: whole numbers that fit become `Int`, the rest
/// `Float`.
fn numeric_value(val: Numeric) -> RowValues {
    if val.scale() == 0 {
        if let Ok(i) = i64::try_from(val.value()) {
            return RowValues::Int(i);
        }
    }
    RowValues::Float(f64::from(val))
}

/// Bind values positionally onto a query builder
pub fn bind_query_params<'a>(query: &'a str, params: &[RowValues]) -> Query<'a> {
    let mut query_builder = Query::new(query);
    for param in params {
        match param {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => query_builder.bind(*dt),
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query_builder.bind(jsval.to_string()),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }
    query_builder
}
