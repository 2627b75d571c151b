//! Plain-data descriptions of the statements a [`Grammar`](super::Grammar)
//! can render. Values are never stored here; every comparison renders a `?`
//! placeholder and the caller supplies bindings in the same order.

/// Sort direction for `order by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereKind {
    /// `column <op> ?`
    Compare(String),
    /// `column is null`
    Null,
    /// `column is not null`
    NotNull,
    /// `column in (?, ?, ..)` with the given number of placeholders
    In(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub column: String,
    pub kind: WhereKind,
}

impl WhereClause {
    /// Placeholders this clause contributes.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        match &self.kind {
            WhereKind::Compare(_) => 1,
            WhereKind::Null | WhereKind::NotNull => 0,
            WhereKind::In(n) => *n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Where-clause builder shared by select, update and delete.
pub trait Filterable: Sized {
    fn wheres_mut(&mut self) -> &mut Vec<WhereClause>;

    #[must_use]
    fn where_op(mut self, column: impl Into<String>, operator: impl Into<String>) -> Self {
        self.wheres_mut().push(WhereClause {
            column: column.into(),
            kind: WhereKind::Compare(operator.into()),
        });
        self
    }

    #[must_use]
    fn where_eq(self, column: impl Into<String>) -> Self {
        self.where_op(column, "=")
    }

    #[must_use]
    fn where_null(mut self, column: impl Into<String>) -> Self {
        self.wheres_mut().push(WhereClause {
            column: column.into(),
            kind: WhereKind::Null,
        });
        self
    }

    #[must_use]
    fn where_not_null(mut self, column: impl Into<String>) -> Self {
        self.wheres_mut().push(WhereClause {
            column: column.into(),
            kind: WhereKind::NotNull,
        });
        self
    }

    #[must_use]
    fn where_in(mut self, column: impl Into<String>, count: usize) -> Self {
        self.wheres_mut().push(WhereClause {
            column: column.into(),
            kind: WhereKind::In(count),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectQuery {
    pub table: String,
    /// Empty means `*`.
    pub columns: Vec<String>,
    pub distinct: bool,
    pub wheres: Vec<WhereClause>,
    pub orders: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectQuery {
    #[must_use]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.orders.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl Filterable for SelectQuery {
    fn wheres_mut(&mut self) -> &mut Vec<WhereClause> {
        &mut self.wheres
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsertQuery {
    pub table: String,
    pub columns: Vec<String>,
    /// Number of value tuples; at least one is rendered.
    pub rows: usize,
}

impl InsertQuery {
    #[must_use]
    pub fn into_table<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: 1,
        }
    }

    #[must_use]
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub wheres: Vec<WhereClause>,
}

impl UpdateQuery {
    #[must_use]
    pub fn table<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            wheres: Vec::new(),
        }
    }
}

impl Filterable for UpdateQuery {
    fn wheres_mut(&mut self) -> &mut Vec<WhereClause> {
        &mut self.wheres
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteQuery {
    pub table: String,
    pub wheres: Vec<WhereClause>,
}

impl DeleteQuery {
    #[must_use]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Vec::new(),
        }
    }
}

impl Filterable for DeleteQuery {
    fn wheres_mut(&mut self) -> &mut Vec<WhereClause> {
        &mut self.wheres
    }
}

/// A statement the grammar knows how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryShape {
    Select(SelectQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
}

impl QueryShape {
    /// Number of `?` placeholders the rendered SQL will contain.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        let wheres = |w: &[WhereClause]| {
            w.iter()
                .map(WhereClause::placeholder_count)
                .sum::<usize>()
        };
        match self {
            QueryShape::Select(q) => wheres(&q.wheres),
            QueryShape::Insert(q) => q.columns.len() * q.rows.max(1),
            QueryShape::Update(q) => q.columns.len() + wheres(&q.wheres),
            QueryShape::Delete(q) => wheres(&q.wheres),
        }
    }

    #[must_use]
    pub fn is_select(&self) -> bool {
        matches!(self, QueryShape::Select(_))
    }
}

impl From<SelectQuery> for QueryShape {
    fn from(q: SelectQuery) -> Self {
        QueryShape::Select(q)
    }
}

impl From<InsertQuery> for QueryShape {
    fn from(q: InsertQuery) -> Self {
        QueryShape::Insert(q)
    }
}

impl From<UpdateQuery> for QueryShape {
    fn from(q: UpdateQuery) -> Self {
        QueryShape::Update(q)
    }
}

impl From<DeleteQuery> for QueryShape {
    fn from(q: DeleteQuery) -> Self {
        QueryShape::Delete(q)
    }
}
