// Grammar module - renders statement shapes into dialect-specific SQL
//
// - shape: plain-data statement descriptions
// - compile: dialect-independent clause assembly
// - dialects: Sybase, SQL Server, SQLite and ANSI fallback grammars

mod compile;
pub mod dialects;
pub mod shape;

use std::fmt::Debug;

use crate::error::MiddlewareDbError;

pub use dialects::{AnsiGrammar, SqlServerGrammar, SqliteGrammar, SybaseGrammar};
pub use shape::{
    DeleteQuery, Direction, Filterable, InsertQuery, OrderBy, QueryShape, SelectQuery,
    UpdateQuery, WhereClause, WhereKind,
};

/// SQL dialect renderer held by a [`Connection`](crate::Connection).
///
/// A dialect only has to say how an identifier is quoted and how row limits
/// are expressed; clause assembly is shared.
pub trait Grammar: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn table_prefix(&self) -> &str;

    /// Attach the table prefix applied by [`wrap_table`](Grammar::wrap_table).
    fn set_table_prefix(&mut self, prefix: &str);

    /// Quote a single identifier segment.
    fn quote_segment(&self, segment: &str) -> String;

    /// `top n` fragment placed right after `select [distinct]`.
    fn select_top(&self, _query: &SelectQuery) -> Option<String> {
        None
    }

    /// Limit/offset clause placed after `order by`.
    ///
    /// # Errors
    /// Returns `GrammarError` when the dialect cannot express the request.
    fn select_tail(&self, query: &SelectQuery) -> Result<Option<String>, MiddlewareDbError> {
        let clause = match (query.limit, query.offset) {
            (None, None) => return Ok(None),
            (Some(limit), None) => format!("limit {limit}"),
            (Some(limit), Some(offset)) => format!("limit {limit} offset {offset}"),
            (None, Some(offset)) => format!("limit -1 offset {offset}"),
        };
        Ok(Some(clause))
    }

    /// Quote a column reference, keeping `*`, dotted qualifiers and
    /// `expr as alias` intact.
    fn wrap(&self, value: &str) -> String {
        if let Some((expr, alias)) = split_alias(value) {
            return format!("{} as {}", self.wrap(expr), self.quote_segment(alias));
        }
        value
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    "*".to_string()
                } else {
                    self.quote_segment(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a table reference. Unqualified names get the table prefix;
    /// qualified names (`owner.table`) are left as written.
    fn wrap_table(&self, table: &str) -> String {
        if let Some((name, alias)) = split_alias(table) {
            return format!("{} as {}", self.wrap_table(name), self.quote_segment(alias));
        }
        if table.contains('.') {
            self.wrap(table)
        } else {
            self.quote_segment(&format!("{}{table}", self.table_prefix()))
        }
    }

    /// Render a statement shape.
    ///
    /// # Errors
    /// Returns `GrammarError` for unsupported operators, empty updates or
    /// limits the dialect cannot express.
    fn compile(&self, shape: &QueryShape) -> Result<String, MiddlewareDbError> {
        match shape {
            QueryShape::Select(q) => compile::select(self, q),
            QueryShape::Insert(q) => Ok(compile::insert(self, q)),
            QueryShape::Update(q) => compile::update(self, q),
            QueryShape::Delete(q) => compile::delete(self, q),
        }
    }
}

fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    lower
        .find(" as ")
        .map(|i| (value[..i].trim(), value[i + 4..].trim()))
}

/// Quote with a doubled closing character as the escape.
pub(crate) fn quote_with(segment: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(segment.len() + 2);
    out.push(open);
    for c in segment.chars() {
        if c == close {
            out.push(close);
        }
        out.push(c);
    }
    out.push(close);
    out
}
