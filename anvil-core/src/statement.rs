use crate::{
    CURRENT_TABLE, Clause, Column, Dialect, Error, ErrorContext, Query, Result, Schema, Table,
    Value, separated_by, truncate_long,
};
use std::collections::BTreeMap;

/// Clause keywords of a SELECT, in build order.
pub const QUERY_CLAUSES: &[&str] = &["SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY", "LIMIT"];
/// Clause keywords of an INSERT, in build order.
pub const CREATE_CLAUSES: &[&str] = &["INSERT", "VALUES", "ON CONFLICT"];
/// Clause keywords of an UPDATE, in build order.
pub const UPDATE_CLAUSES: &[&str] = &["UPDATE", "SET", "WHERE"];
/// Clause keywords of a DELETE, in build order.
pub const DELETE_CLAUSES: &[&str] = &["DELETE", "FROM", "WHERE"];

/// Accumulates clauses and renders them into SQL with bound variables.
///
/// Clauses are stored by keyword and rendered through the dialect in the order
/// requested by [`Statement::build`]. Problems found while rendering are
/// collected and reported by [`Statement::finish`].
pub struct Statement<'s> {
    pub dialect: &'s dyn Dialect,
    pub schema: Option<&'s Schema>,
    /// Name of the current table.
    pub table: String,
    pub clauses: BTreeMap<&'static str, Clause>,
    pub sql: String,
    pub vars: Vec<Value>,
    pub errors: Vec<Error>,
}

impl<'s> Statement<'s> {
    pub fn new(dialect: &'s dyn Dialect) -> Self {
        Self {
            dialect,
            schema: None,
            table: String::new(),
            clauses: BTreeMap::new(),
            sql: String::with_capacity(128),
            vars: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Use `schema` for primary key resolution and its table as the current table.
    pub fn with_schema(mut self, schema: &'s Schema) -> Self {
        self.table = schema.table.clone();
        self.schema = Some(schema);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Store a clause. WHERE conditions merge with the existing ones, other clauses replace.
    pub fn add_clause(&mut self, clause: impl Into<Clause>) -> &mut Self {
        match clause.into() {
            Clause::Where(other) if matches!(self.clauses.get("WHERE"), Some(Clause::Where(..))) => {
                if let Some(Clause::Where(current)) = self.clauses.get_mut("WHERE") {
                    current.exprs.extend(other.exprs);
                }
            }
            clause => {
                self.clauses.insert(clause.keyword(), clause);
            }
        }
        self
    }

    pub fn has_clause(&self, keyword: &str) -> bool {
        self.clauses.contains_key(keyword)
    }

    pub fn clause(&self, keyword: &str) -> Option<&Clause> {
        self.clauses.get(keyword)
    }

    /// Render the stored clauses named by `keywords`, skipping the absent ones.
    ///
    /// Clauses are separated by a single space, a clause rendering nothing leaves no trace.
    pub fn build(&mut self, keywords: &[&str]) -> &mut Self {
        for keyword in keywords {
            let Some(clause) = self.clauses.remove(*keyword) else {
                continue;
            };
            let start = self.sql.len();
            if start > 0 {
                self.sql.push(' ');
            }
            let len = self.sql.len();
            let dialect = self.dialect;
            dialect.build_clause(self, &clause);
            if self.sql.len() == len {
                self.sql.truncate(start);
            }
            self.clauses.insert(clause.keyword(), clause);
        }
        self
    }

    /// Bind a variable, lists expand into a parenthesized placeholder list.
    pub fn add_var(&mut self, value: &Value) {
        match value.as_list() {
            Some([]) => self.sql.push_str("(NULL)"),
            Some(values) => {
                self.sql.push('(');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        self.sql.push(',');
                    }
                    self.add_var(v);
                }
                self.sql.push(')');
            }
            None => {
                self.vars.push(value.clone());
                let dialect = self.dialect;
                dialect.bind_var_to(self, value);
            }
        }
    }

    pub fn write_quoted<Q: Quoted + ?Sized>(&mut self, value: &Q) -> &mut Self {
        value.quote_to(self);
        self
    }

    pub fn add_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// The rendered query, or the first error collected while rendering.
    pub fn finish(self) -> Result<Query> {
        if let Some(error) = self.errors.into_iter().next() {
            let sql = self.sql;
            return Err(error).with_context(|| format!("While building `{}`", truncate_long!(sql)));
        }
        Ok(Query::new(self.sql, self.vars))
    }
}

/// Something written to the SQL buffer as quoted identifiers.
pub trait Quoted {
    fn quote_to(&self, stmt: &mut Statement);
}

impl Quoted for str {
    fn quote_to(&self, stmt: &mut Statement) {
        stmt.dialect.quote_to(&mut stmt.sql, self);
    }
}

impl Quoted for String {
    fn quote_to(&self, stmt: &mut Statement) {
        self.as_str().quote_to(stmt);
    }
}

impl Quoted for Table {
    fn quote_to(&self, stmt: &mut Statement) {
        let dialect = stmt.dialect;
        if self.raw {
            stmt.sql.push_str(&self.name);
        } else if self.is_current() {
            dialect.quote_to(&mut stmt.sql, &stmt.table);
        } else {
            dialect.quote_to(&mut stmt.sql, &self.name);
        }
        if !self.alias.is_empty() {
            stmt.sql.push(' ');
            dialect.quote_to(&mut stmt.sql, &self.alias);
        }
    }
}

impl Quoted for Column {
    fn quote_to(&self, stmt: &mut Statement) {
        let dialect = stmt.dialect;
        if self.raw {
            stmt.sql.push_str(&self.name);
        } else {
            if !self.table.is_empty() {
                if self.table == CURRENT_TABLE {
                    dialect.quote_to(&mut stmt.sql, &stmt.table);
                } else {
                    dialect.quote_to(&mut stmt.sql, &self.table);
                }
                stmt.sql.push('.');
            }
            if self.is_primary_key() {
                let name = stmt.schema.and_then(|schema| {
                    schema
                        .prioritized_primary_field()
                        .map(|f| f.db_name.as_str())
                        .or_else(|| schema.db_names().next())
                });
                match name {
                    Some(name) => dialect.quote_to(&mut stmt.sql, name),
                    None => stmt.add_error(Error::msg(
                        "The primary key of the statement cannot be resolved without a schema",
                    )),
                }
            } else {
                dialect.quote_to(&mut stmt.sql, &self.name);
            }
        }
        if !self.alias.is_empty() {
            stmt.sql.push_str(" AS ");
            dialect.quote_to(&mut stmt.sql, &self.alias);
        }
    }
}

impl Quoted for [Column] {
    fn quote_to(&self, stmt: &mut Statement) {
        stmt.sql.push('(');
        for (i, column) in self.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            column.quote_to(stmt);
        }
        stmt.sql.push(')');
    }
}

impl Quoted for [String] {
    fn quote_to(&self, stmt: &mut Statement) {
        let dialect = stmt.dialect;
        stmt.sql.push('(');
        separated_by(
            &mut stmt.sql,
            self,
            |out, v| dialect.quote_to(out, v),
            ",",
        );
        stmt.sql.push(')');
    }
}
