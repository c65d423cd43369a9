use crate::{Column, Value};

/// Raw SQL fragment, each `?` is replaced by the next variable when built.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Expr {
    pub sql: String,
    pub vars: Vec<Value>,
}

impl Expr {
    pub fn new(sql: impl Into<String>, vars: impl IntoIterator<Item = Value>) -> Self {
        Self {
            sql: sql.into(),
            vars: vars.into_iter().collect(),
        }
    }
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            vars: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Like,
    NotLike,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Equal => " = ",
            CompareOp::NotEqual => " <> ",
            CompareOp::Greater => " > ",
            CompareOp::GreaterEqual => " >= ",
            CompareOp::Less => " < ",
            CompareOp::LessEqual => " <= ",
            CompareOp::Like => " LIKE ",
            CompareOp::NotLike => " NOT LIKE ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub column: Column,
    pub op: CompareOp,
    pub value: Value,
}

/// Membership test, a single value that is a [`Value::List`] is expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    pub column: Column,
    pub values: Vec<Value>,
}

/// Condition tree used by WHERE and HAVING.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Expr(Expr),
    Compare(Compare),
    In(In),
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Vec<Expression>),
}

impl Expression {
    pub fn expr(sql: impl Into<String>, vars: impl IntoIterator<Item = Value>) -> Self {
        Expression::Expr(Expr::new(sql, vars))
    }
    pub fn compare(column: impl Into<Column>, op: CompareOp, value: impl Into<Value>) -> Self {
        Expression::Compare(Compare {
            column: column.into(),
            op,
            value: value.into(),
        })
    }
    pub fn eq(column: impl Into<Column>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Equal, value)
    }
    pub fn neq(column: impl Into<Column>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::NotEqual, value)
    }
    pub fn is_in(column: impl Into<Column>, values: impl IntoIterator<Item = Value>) -> Self {
        Expression::In(In {
            column: column.into(),
            values: values.into_iter().collect(),
        })
    }
    pub fn and(exprs: impl IntoIterator<Item = Expression>) -> Self {
        Expression::And(exprs.into_iter().collect())
    }
    pub fn or(exprs: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Or(exprs.into_iter().collect())
    }
    pub fn not(exprs: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Not(exprs.into_iter().collect())
    }

    /// An OR group holding exactly one condition, joined to its predecessor with `OR`.
    pub fn is_single_or(&self) -> bool {
        matches!(self, Expression::Or(v) if v.len() == 1)
    }

    /// The raw SQL of the expression, looking through a single element AND/OR group.
    pub fn raw_sql(&self) -> Option<&str> {
        match self {
            Expression::Expr(e) => Some(&e.sql),
            Expression::And(v) | Expression::Or(v) if v.len() == 1 => match &v[0] {
                Expression::Expr(e) => Some(&e.sql),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<Expr> for Expression {
    fn from(value: Expr) -> Self {
        Expression::Expr(value)
    }
}
