mod column;
mod expression;

pub use column::*;
pub use expression::*;

use crate::Value;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Where {
    pub exprs: Vec<Expression>,
}

impl Where {
    pub fn new(exprs: impl IntoIterator<Item = Expression>) -> Self {
        Self {
            exprs: exprs.into_iter().collect(),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub limit: Option<u64>,
    pub offset: u64,
}

impl Limit {
    pub fn new(limit: Option<u64>, offset: u64) -> Self {
        Self { limit, offset }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Column,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<Column>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Set(pub Vec<Assignment>);

impl Set {
    pub fn new(assignments: impl IntoIterator<Item = Assignment>) -> Self {
        Self(assignments.into_iter().collect())
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Select {
    pub distinct: bool,
    pub columns: Vec<Column>,
    /// Replaces the column list entirely.
    pub expression: Option<Expr>,
}

impl Select {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            ..Default::default()
        }
    }
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Cross,
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinType::Cross => "CROSS",
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: Table,
    pub on: Where,
    pub using: Vec<String>,
    /// Raw join text, takes precedence over the structured fields.
    pub expression: Option<Expr>,
}

impl Join {
    pub fn raw(sql: impl Into<String>, vars: impl IntoIterator<Item = Value>) -> Self {
        Self {
            expression: Some(Expr::new(sql, vars)),
            ..Default::default()
        }
    }
    pub fn on(
        join_type: JoinType,
        table: impl Into<Table>,
        on: impl IntoIterator<Item = Expression>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            on: Where::new(on),
            ..Default::default()
        }
    }
}

/// FROM clause, empty tables mean the statement's current table.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct FromClause {
    pub tables: Vec<Table>,
    pub joins: Vec<Join>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub columns: Vec<Column>,
    pub having: Vec<Expression>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct OrderByColumn {
    pub column: Column,
    pub desc: bool,
}

impl OrderByColumn {
    pub fn asc(column: impl Into<Column>) -> Self {
        Self {
            column: column.into(),
            desc: false,
        }
    }
    pub fn desc(column: impl Into<Column>) -> Self {
        Self {
            column: column.into(),
            desc: true,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub columns: Vec<OrderByColumn>,
    pub expression: Option<Expr>,
}

impl OrderBy {
    pub fn new(columns: impl IntoIterator<Item = OrderByColumn>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            expression: None,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub columns: Vec<Column>,
    pub where_clause: Where,
    pub do_nothing: bool,
    pub do_updates: Set,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target table, the current table when `None`.
    pub table: Option<Table>,
    pub modifier: String,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Values {
    pub columns: Vec<Column>,
    /// One entry per row, `None` cells take the column default.
    pub rows: Vec<Vec<Option<Value>>>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Option<Table>,
    pub modifier: String,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Delete {
    pub modifier: String,
}

/// A statement fragment, stored in the statement under its keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Select(Select),
    From(FromClause),
    Where(Where),
    GroupBy(GroupBy),
    OrderBy(OrderBy),
    Limit(Limit),
    Set(Set),
    OnConflict(OnConflict),
    Insert(Insert),
    Values(Values),
    Update(Update),
    Delete(Delete),
}

impl Clause {
    pub fn keyword(&self) -> &'static str {
        match self {
            Clause::Select(..) => "SELECT",
            Clause::From(..) => "FROM",
            Clause::Where(..) => "WHERE",
            Clause::GroupBy(..) => "GROUP BY",
            Clause::OrderBy(..) => "ORDER BY",
            Clause::Limit(..) => "LIMIT",
            Clause::Set(..) => "SET",
            Clause::OnConflict(..) => "ON CONFLICT",
            Clause::Insert(..) => "INSERT",
            Clause::Values(..) => "VALUES",
            Clause::Update(..) => "UPDATE",
            Clause::Delete(..) => "DELETE",
        }
    }
}

macro_rules! impl_into_clause {
    ($source:ty, $into:path) => {
        impl From<$source> for Clause {
            fn from(value: $source) -> Self {
                $into(value)
            }
        }
    };
}

impl_into_clause!(Select, Clause::Select);
impl_into_clause!(FromClause, Clause::From);
impl_into_clause!(Where, Clause::Where);
impl_into_clause!(GroupBy, Clause::GroupBy);
impl_into_clause!(OrderBy, Clause::OrderBy);
impl_into_clause!(Limit, Clause::Limit);
impl_into_clause!(Set, Clause::Set);
impl_into_clause!(OnConflict, Clause::OnConflict);
impl_into_clause!(Insert, Clause::Insert);
impl_into_clause!(Values, Clause::Values);
impl_into_clause!(Update, Clause::Update);
impl_into_clause!(Delete, Clause::Delete);
