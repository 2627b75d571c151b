use super::shape::SelectQuery;
use super::{Grammar, quote_with};
use crate::error::MiddlewareDbError;

/// Sybase ASE / dblib dialect: bracketed identifiers and `top n` limits.
#[derive(Debug, Clone, Default)]
pub struct SybaseGrammar {
    table_prefix: String,
}

impl Grammar for SybaseGrammar {
    fn name(&self) -> &'static str {
        "sybase"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    fn quote_segment(&self, segment: &str) -> String {
        quote_with(segment, '[', ']')
    }

    fn select_top(&self, query: &SelectQuery) -> Option<String> {
        query.limit.map(|n| format!("top {n}"))
    }

    fn select_tail(&self, query: &SelectQuery) -> Result<Option<String>, MiddlewareDbError> {
        // ASE has no row offset syntax.
        if query.offset.is_some() {
            return Err(MiddlewareDbError::GrammarError(
                "offset is not supported by the sybase grammar".to_string(),
            ));
        }
        Ok(None)
    }
}

/// SQL Server dialect: `top n` without an offset, `offset .. fetch next`
/// with one.
#[derive(Debug, Clone, Default)]
pub struct SqlServerGrammar {
    table_prefix: String,
}

impl Grammar for SqlServerGrammar {
    fn name(&self) -> &'static str {
        "sqlsrv"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    fn quote_segment(&self, segment: &str) -> String {
        quote_with(segment, '[', ']')
    }

    fn select_top(&self, query: &SelectQuery) -> Option<String> {
        match (query.limit, query.offset) {
            (Some(n), None) => Some(format!("top {n}")),
            _ => None,
        }
    }

    fn select_tail(&self, query: &SelectQuery) -> Result<Option<String>, MiddlewareDbError> {
        let Some(offset) = query.offset else {
            return Ok(None);
        };
        // offset/fetch is only legal after an order by
        let mut tail = String::new();
        if query.orders.is_empty() {
            tail.push_str("order by (select 0) ");
        }
        tail.push_str(&format!("offset {offset} rows"));
        if let Some(limit) = query.limit {
            tail.push_str(&format!(" fetch next {limit} rows only"));
        }
        Ok(Some(tail))
    }
}

/// SQLite dialect: double-quoted identifiers and `limit/offset`.
#[derive(Debug, Clone, Default)]
pub struct SqliteGrammar {
    table_prefix: String,
}

impl Grammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    fn quote_segment(&self, segment: &str) -> String {
        quote_with(segment, '"', '"')
    }
}

/// Fallback for unrecognized drivers.
#[derive(Debug, Clone, Default)]
pub struct AnsiGrammar {
    table_prefix: String,
}

impl Grammar for AnsiGrammar {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    fn quote_segment(&self, segment: &str) -> String {
        quote_with(segment, '"', '"')
    }

    fn select_tail(&self, query: &SelectQuery) -> Result<Option<String>, MiddlewareDbError> {
        let clause = match (query.limit, query.offset) {
            (None, None) => return Ok(None),
            (Some(limit), None) => format!("fetch first {limit} rows only"),
            (Some(limit), Some(offset)) => {
                format!("offset {offset} rows fetch next {limit} rows only")
            }
            (None, Some(offset)) => format!("offset {offset} rows"),
        };
        Ok(Some(clause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::shape::{
        DeleteQuery, Direction, Filterable, InsertQuery, QueryShape, SelectQuery, UpdateQuery,
    };

    fn sybase(prefix: &str) -> SybaseGrammar {
        let mut g = SybaseGrammar::default();
        g.set_table_prefix(prefix);
        g
    }

    #[test]
    fn sybase_select_uses_top_and_prefix() {
        let q = SelectQuery::from("users")
            .columns(["id", "name"])
            .where_eq("id")
            .where_null("deleted_at")
            .order_by("name", Direction::Desc)
            .limit(5);
        let sql = sybase("app_").compile(&QueryShape::Select(q)).unwrap();
        assert_eq!(
            sql,
            "select top 5 [id], [name] from [app_users] where [id] = ? and [deleted_at] is null order by [name] desc"
        );
    }

    #[test]
    fn sybase_rejects_offset() {
        let q = SelectQuery::from("users").limit(5).offset(10);
        let err = sybase("").compile(&q.into()).unwrap_err();
        assert!(matches!(err, MiddlewareDbError::GrammarError(_)));
    }

    #[test]
    fn qualified_tables_are_not_prefixed() {
        let g = sybase("app_");
        assert_eq!(g.wrap_table("dbo.users"), "[dbo].[users]");
        assert_eq!(g.wrap_table("users as u"), "[app_users] as [u]");
        assert_eq!(g.wrap("u.*"), "[u].*");
        assert_eq!(g.wrap("odd]name"), "[odd]]name]");
    }

    #[test]
    fn sqlserver_offset_fetch() {
        let q = SelectQuery::from("orders").limit(10).offset(20);
        let sql = SqlServerGrammar::default().compile(&q.into()).unwrap();
        assert_eq!(
            sql,
            "select * from [orders] order by (select 0) offset 20 rows fetch next 10 rows only"
        );
    }

    #[test]
    fn sqlite_limit_offset_and_quoting() {
        let q = SelectQuery::from("t")
            .columns(["a"])
            .where_in("b", 3)
            .limit(2)
            .offset(4);
        let shape = QueryShape::Select(q);
        let sql = SqliteGrammar::default().compile(&shape).unwrap();
        assert_eq!(
            sql,
            "select \"a\" from \"t\" where \"b\" in (?, ?, ?) limit 2 offset 4"
        );
        assert_eq!(shape.placeholder_count(), 3);
    }

    #[test]
    fn ansi_fetch_first() {
        let q = SelectQuery::from("t").limit(1);
        let sql = AnsiGrammar::default().compile(&q.into()).unwrap();
        assert_eq!(sql, "select * from \"t\" fetch first 1 rows only");
    }

    #[test]
    fn insert_update_delete() {
        let g = sybase("p_");
        let insert = InsertQuery::into_table("items", ["name", "qty"]).rows(2);
        assert_eq!(
            g.compile(&insert.into()).unwrap(),
            "insert into [p_items] ([name], [qty]) values (?, ?), (?, ?)"
        );

        let update = UpdateQuery::table("items", ["qty"]).where_eq("id");
        assert_eq!(
            g.compile(&update.into()).unwrap(),
            "update [p_items] set [qty] = ? where [id] = ?"
        );

        let delete = DeleteQuery::from("items").where_op("qty", "<=");
        assert_eq!(
            g.compile(&delete.into()).unwrap(),
            "delete from [p_items] where [qty] <= ?"
        );

        let empty = InsertQuery::into_table("items", Vec::<String>::new());
        assert_eq!(
            g.compile(&empty.into()).unwrap(),
            "insert into [p_items] default values"
        );
    }

    #[test]
    fn rejects_bad_operator_and_empty_update() {
        let g = SqliteGrammar::default();
        let q = SelectQuery::from("t").where_op("a", "; drop table t");
        assert!(matches!(
            g.compile(&q.into()),
            Err(MiddlewareDbError::GrammarError(_))
        ));

        let u = UpdateQuery::table("t", Vec::<String>::new());
        assert!(matches!(
            g.compile(&u.into()),
            Err(MiddlewareDbError::GrammarError(_))
        ));
    }
}
