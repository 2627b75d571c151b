use super::Grammar;
use super::shape::{DeleteQuery, InsertQuery, SelectQuery, UpdateQuery, WhereClause, WhereKind};
use crate::error::MiddlewareDbError;

const OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=", "like", "not like",
];

pub(super) fn select<G: Grammar + ?Sized>(
    grammar: &G,
    query: &SelectQuery,
) -> Result<String, MiddlewareDbError> {
    let mut sql = String::from("select ");
    if query.distinct {
        sql.push_str("distinct ");
    }
    if let Some(top) = grammar.select_top(query) {
        sql.push_str(&top);
        sql.push(' ');
    }

    if query.columns.is_empty() {
        sql.push('*');
    } else {
        let columns: Vec<String> = query.columns.iter().map(|c| grammar.wrap(c)).collect();
        sql.push_str(&columns.join(", "));
    }

    sql.push_str(" from ");
    sql.push_str(&grammar.wrap_table(&query.table));
    push_wheres(grammar, &mut sql, &query.wheres)?;

    if !query.orders.is_empty() {
        let orders: Vec<String> = query
            .orders
            .iter()
            .map(|o| format!("{} {}", grammar.wrap(&o.column), o.direction.as_sql()))
            .collect();
        sql.push_str(" order by ");
        sql.push_str(&orders.join(", "));
    }

    if let Some(tail) = grammar.select_tail(query)? {
        sql.push(' ');
        sql.push_str(&tail);
    }
    Ok(sql)
}

pub(super) fn insert<G: Grammar + ?Sized>(grammar: &G, query: &InsertQuery) -> String {
    let table = grammar.wrap_table(&query.table);
    if query.columns.is_empty() {
        return format!("insert into {table} default values");
    }

    let columns: Vec<String> = query.columns.iter().map(|c| grammar.wrap(c)).collect();
    let tuple = format!("({})", vec!["?"; query.columns.len()].join(", "));
    let tuples = vec![tuple; query.rows.max(1)].join(", ");
    format!("insert into {table} ({}) values {tuples}", columns.join(", "))
}

pub(super) fn update<G: Grammar + ?Sized>(
    grammar: &G,
    query: &UpdateQuery,
) -> Result<String, MiddlewareDbError> {
    if query.columns.is_empty() {
        return Err(MiddlewareDbError::GrammarError(
            "update needs at least one column".to_string(),
        ));
    }
    let sets: Vec<String> = query
        .columns
        .iter()
        .map(|c| format!("{} = ?", grammar.wrap(c)))
        .collect();
    let mut sql = format!(
        "update {} set {}",
        grammar.wrap_table(&query.table),
        sets.join(", ")
    );
    push_wheres(grammar, &mut sql, &query.wheres)?;
    Ok(sql)
}

pub(super) fn delete<G: Grammar + ?Sized>(
    grammar: &G,
    query: &DeleteQuery,
) -> Result<String, MiddlewareDbError> {
    let mut sql = format!("delete from {}", grammar.wrap_table(&query.table));
    push_wheres(grammar, &mut sql, &query.wheres)?;
    Ok(sql)
}

fn push_wheres<G: Grammar + ?Sized>(
    grammar: &G,
    sql: &mut String,
    wheres: &[WhereClause],
) -> Result<(), MiddlewareDbError> {
    for (i, clause) in wheres.iter().enumerate() {
        sql.push_str(if i == 0 { " where " } else { " and " });
        let column = grammar.wrap(&clause.column);
        match &clause.kind {
            WhereKind::Compare(op) => {
                let op = op.trim().to_ascii_lowercase();
                if !OPERATORS.contains(&op.as_str()) {
                    return Err(MiddlewareDbError::GrammarError(format!(
                        "unsupported operator `{op}`"
                    )));
                }
                sql.push_str(&format!("{column} {op} ?"));
            }
            WhereKind::Null => sql.push_str(&format!("{column} is null")),
            WhereKind::NotNull => sql.push_str(&format!("{column} is not null")),
            WhereKind::In(0) => sql.push_str("1 = 0"),
            WhereKind::In(n) => {
                sql.push_str(&format!("{column} in ({})", vec!["?"; *n].join(", ")));
            }
        }
    }
    Ok(())
}
