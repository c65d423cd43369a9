use crate::{
    Clause, Column, Compare, CompareOp, DataType, Delete, Error, Expr, Expression, Field, FromClause, GroupBy,
    In, Insert, Join, Limit, Namer, OnConflict, OrderBy, Select, Set, SnakeNamer, Statement,
    Table, Update, Value, Values, Where, contains_ignore_ascii_case, explain_sql,
    possibly_parenthesized,
};
use std::fmt::Write;

/// Wraps a raw condition holding boolean operators when it sits among other conditions.
fn needs_parentheses(expr: &Expression) -> bool {
    expr.raw_sql().is_some_and(|sql| {
        contains_ignore_ascii_case(sql, " AND ") || contains_ignore_ascii_case(sql, " OR ")
    })
}

/// SQL flavor of a database: quoting, types, bind variables and clause rendering.
///
/// Every method has a generic SQL implementation, engines override what differs.
/// Clause builders write a keyword led fragment with no leading space, the
/// statement takes care of separating clauses.
pub trait Dialect: Send + Sync {
    /// Name of the dialect, matching the driver name.
    fn name(&self) -> &'static str;

    /// Naming strategy for tables, columns and constraints.
    fn namer(&self) -> &dyn Namer {
        &SnakeNamer
    }

    /// Native column type of a field.
    fn data_type_of(&self, field: &Field) -> String {
        match &field.data_type {
            DataType::Bool => "BOOLEAN".into(),
            DataType::Int | DataType::Uint => {
                let unsigned = if field.data_type == DataType::Uint {
                    " UNSIGNED"
                } else {
                    ""
                };
                let name = match field.size {
                    0 => "BIGINT",
                    1..=8 => "TINYINT",
                    9..=16 => "SMALLINT",
                    17..=32 => "INTEGER",
                    _ => "BIGINT",
                };
                format!("{}{}", name, unsigned)
            }
            DataType::Float if field.precision > 0 => {
                format!("DECIMAL({},{})", field.precision, field.scale)
            }
            DataType::Float if field.size > 0 && field.size <= 32 => "REAL".into(),
            DataType::Float => "DOUBLE PRECISION".into(),
            DataType::String if field.size > 0 => format!("VARCHAR({})", field.size),
            DataType::String => "TEXT".into(),
            DataType::Time => "TIMESTAMP".into(),
            DataType::Bytes => "BLOB".into(),
            DataType::Custom(v) => v.to_string(),
        }
    }

    /// Expression standing for a missing value of `field` in a VALUES list.
    fn default_value_of(&self, _field: &Field) -> Expr {
        Expr::raw("DEFAULT")
    }

    /// Write the placeholder of a bound variable, already pushed into `stmt.vars`.
    fn bind_var_to(&self, stmt: &mut Statement, _value: &Value) {
        stmt.sql.push('?');
    }

    /// Quote an identifier, dots separate qualified segments.
    fn quote_to(&self, out: &mut String, value: &str) {
        out.push('"');
        for c in value.chars() {
            match c {
                '"' => out.push_str("\"\""),
                '.' => out.push_str("\".\""),
                _ => out.push(c),
            }
        }
        out.push('"');
    }

    /// SQL with the variables inlined, used for logging.
    fn explain(&self, sql: &str, vars: &[Value]) -> String {
        explain_sql(sql, "\"", vars)
    }

    fn write_save_point(&self, out: &mut String, name: &str) {
        out.push_str("SAVEPOINT ");
        out.push_str(name);
    }

    fn write_rollback_to(&self, out: &mut String, name: &str) {
        out.push_str("ROLLBACK TO SAVEPOINT ");
        out.push_str(name);
    }

    /// Dispatch a clause to its builder.
    fn build_clause(&self, stmt: &mut Statement, clause: &Clause) {
        match clause {
            Clause::Select(v) => self.build_select(stmt, v),
            Clause::From(v) => self.build_from(stmt, v),
            Clause::Where(v) => self.build_where(stmt, v),
            Clause::GroupBy(v) => self.build_group_by(stmt, v),
            Clause::OrderBy(v) => self.build_order_by(stmt, v),
            Clause::Limit(v) => self.build_limit(stmt, v),
            Clause::Set(v) => self.build_set(stmt, v),
            Clause::OnConflict(v) => self.build_on_conflict(stmt, v),
            Clause::Insert(v) => self.build_insert(stmt, v),
            Clause::Values(v) => self.build_values(stmt, v),
            Clause::Update(v) => self.build_update(stmt, v),
            Clause::Delete(v) => self.build_delete(stmt, v),
        }
    }

    fn build_select(&self, stmt: &mut Statement, select: &Select) {
        stmt.sql.push_str("SELECT ");
        if let Some(expr) = &select.expression {
            self.build_expr(stmt, expr);
        } else if select.columns.is_empty() {
            stmt.sql.push('*');
        } else {
            if select.distinct {
                stmt.sql.push_str("DISTINCT ");
            }
            for (i, column) in select.columns.iter().enumerate() {
                if i > 0 {
                    stmt.sql.push(',');
                }
                stmt.write_quoted(column);
            }
        }
    }

    fn build_from(&self, stmt: &mut Statement, from: &FromClause) {
        stmt.sql.push_str("FROM ");
        if from.tables.is_empty() {
            stmt.write_quoted(&Table::current());
        } else {
            for (i, table) in from.tables.iter().enumerate() {
                if i > 0 {
                    stmt.sql.push(',');
                }
                stmt.write_quoted(table);
            }
        }
        for join in &from.joins {
            stmt.sql.push(' ');
            self.build_join(stmt, join);
        }
    }

    fn build_join(&self, stmt: &mut Statement, join: &Join) {
        if let Some(expr) = &join.expression {
            self.build_expr(stmt, expr);
            return;
        }
        stmt.sql.push_str(join.join_type.as_sql());
        stmt.sql.push_str(" JOIN ");
        stmt.write_quoted(&join.table);
        if !join.on.exprs.is_empty() {
            stmt.sql.push_str(" ON ");
            self.build_conditions(stmt, &join.on);
        } else if !join.using.is_empty() {
            stmt.sql.push_str(" USING ");
            stmt.write_quoted(join.using.as_slice());
        }
    }

    fn build_where(&self, stmt: &mut Statement, value: &Where) {
        if value.exprs.is_empty() {
            return;
        }
        stmt.sql.push_str("WHERE ");
        self.build_conditions(stmt, value);
    }

    /// Conditions of a WHERE, ON or HAVING without the keyword.
    fn build_conditions(&self, stmt: &mut Statement, value: &Where) {
        let mut exprs: Vec<&Expression> = match value.exprs.as_slice() {
            [Expression::And(inner)] => inner.iter().collect(),
            exprs => exprs.iter().collect(),
        };
        // A single element OR group cannot lead
        if let Some(i) = exprs.iter().position(|e| !e.is_single_or()) {
            exprs.swap(0, i);
        }
        self.build_expressions(stmt, &exprs, " AND ");
    }

    /// Join `exprs` with `separator`, single element OR groups are joined with `OR`.
    fn build_expressions(&self, stmt: &mut Statement, exprs: &[&Expression], separator: &str) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                stmt.sql
                    .push_str(if expr.is_single_or() { " OR " } else { separator });
            }
            let wrap = exprs.len() > 1 && needs_parentheses(expr);
            possibly_parenthesized!(stmt.sql, wrap, self.build_expression(stmt, expr));
        }
    }

    fn build_expression(&self, stmt: &mut Statement, expr: &Expression) {
        match expr {
            Expression::Expr(v) => self.build_expr(stmt, v),
            Expression::Compare(v) => self.build_compare(stmt, v),
            Expression::In(v) => self.build_in(stmt, v),
            Expression::And(v) | Expression::Or(v) => {
                let separator = if matches!(expr, Expression::And(..)) {
                    " AND "
                } else {
                    " OR "
                };
                let exprs = v.iter().collect::<Vec<_>>();
                possibly_parenthesized!(
                    stmt.sql,
                    exprs.len() > 1,
                    self.build_expressions(stmt, &exprs, separator)
                );
            }
            Expression::Not(v) => self.build_not(stmt, v),
        }
    }

    /// Raw SQL, each `?` takes the next variable.
    fn build_expr(&self, stmt: &mut Statement, expr: &Expr) {
        let mut vars = expr.vars.iter();
        for c in expr.sql.chars() {
            if c == '?' {
                if let Some(v) = vars.next() {
                    stmt.add_var(v);
                    continue;
                }
            }
            stmt.sql.push(c);
        }
        if vars.next().is_some() {
            stmt.add_error(Error::msg(format!(
                "Expression `{}` has more variables than placeholders",
                expr.sql
            )));
        }
    }

    fn build_compare(&self, stmt: &mut Statement, value: &Compare) {
        stmt.write_quoted(&value.column);
        match value.op {
            CompareOp::Equal if value.value.is_null() => stmt.sql.push_str(" IS NULL"),
            CompareOp::NotEqual if value.value.is_null() => stmt.sql.push_str(" IS NOT NULL"),
            op => {
                stmt.sql.push_str(op.as_sql());
                stmt.add_var(&value.value);
            }
        }
    }

    fn build_in(&self, stmt: &mut Statement, value: &In) {
        stmt.write_quoted(&value.column);
        match value.values.as_slice() {
            [] => stmt.sql.push_str(" IN (NULL)"),
            [v] if v.as_list().is_none() => {
                stmt.sql.push_str(" = ");
                stmt.add_var(v);
            }
            values => {
                stmt.sql.push_str(" IN (");
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        stmt.sql.push(',');
                    }
                    stmt.add_var(v);
                }
                stmt.sql.push(')');
            }
        }
    }

    fn build_not(&self, stmt: &mut Statement, exprs: &[Expression]) {
        possibly_parenthesized!(stmt.sql, exprs.len() > 1, {
            for (i, expr) in exprs.iter().enumerate() {
                if i > 0 {
                    stmt.sql.push_str(" AND ");
                }
                stmt.sql.push_str("NOT ");
                let wrap = matches!(expr, Expression::Expr(..)) && needs_parentheses(expr);
                possibly_parenthesized!(stmt.sql, wrap, self.build_expression(stmt, expr));
            }
        });
    }

    fn build_group_by(&self, stmt: &mut Statement, group_by: &GroupBy) {
        stmt.sql.push_str("GROUP BY ");
        for (i, column) in group_by.columns.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(column);
        }
        if !group_by.having.is_empty() {
            stmt.sql.push_str(" HAVING ");
            self.build_conditions(stmt, &Where::new(group_by.having.iter().cloned()));
        }
    }

    fn build_order_by(&self, stmt: &mut Statement, order_by: &OrderBy) {
        stmt.sql.push_str("ORDER BY ");
        if let Some(expr) = &order_by.expression {
            self.build_expr(stmt, expr);
            return;
        }
        for (i, column) in order_by.columns.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(&column.column);
            if column.desc {
                stmt.sql.push_str(" DESC");
            }
        }
    }

    fn build_limit(&self, stmt: &mut Statement, limit: &Limit) {
        if let Some(value) = limit.limit {
            let _ = write!(stmt.sql, "LIMIT {}", value);
        }
        if limit.offset > 0 {
            if limit.limit.is_some() {
                stmt.sql.push(' ');
            }
            let _ = write!(stmt.sql, "OFFSET {}", limit.offset);
        }
    }

    fn build_set(&self, stmt: &mut Statement, set: &Set) {
        stmt.sql.push_str("SET ");
        if set.0.is_empty() {
            let pk = Column::primary_key();
            stmt.write_quoted(&pk);
            stmt.sql.push('=');
            stmt.write_quoted(&pk);
            return;
        }
        for (i, assignment) in set.0.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(&assignment.column);
            stmt.sql.push('=');
            stmt.add_var(&assignment.value);
        }
    }

    fn build_on_conflict(&self, stmt: &mut Statement, on_conflict: &OnConflict) {
        stmt.sql.push_str("ON CONFLICT ");
        if !on_conflict.columns.is_empty() {
            stmt.write_quoted(on_conflict.columns.as_slice());
            stmt.sql.push(' ');
        }
        if on_conflict.do_nothing || on_conflict.do_updates.0.is_empty() {
            stmt.sql.push_str("DO NOTHING");
        } else {
            stmt.sql.push_str("DO UPDATE ");
            self.build_set(stmt, &on_conflict.do_updates);
            if !on_conflict.where_clause.exprs.is_empty() {
                stmt.sql.push(' ');
                self.build_where(stmt, &on_conflict.where_clause);
            }
        }
    }

    fn build_insert(&self, stmt: &mut Statement, insert: &Insert) {
        stmt.sql.push_str("INSERT ");
        if !insert.modifier.is_empty() {
            stmt.sql.push_str(&insert.modifier);
            stmt.sql.push(' ');
        }
        stmt.sql.push_str("INTO ");
        match &insert.table {
            Some(table) => stmt.write_quoted(table),
            None => stmt.write_quoted(&Table::current()),
        };
    }

    fn build_values(&self, stmt: &mut Statement, values: &Values) {
        if values.columns.is_empty() {
            stmt.sql.push_str("DEFAULT VALUES");
            return;
        }
        stmt.write_quoted(values.columns.as_slice());
        stmt.sql.push_str(" VALUES ");
        for (i, row) in values.rows.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.sql.push('(');
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    stmt.sql.push(',');
                }
                match cell {
                    Some(value) => stmt.add_var(value),
                    None => {
                        let name = values.columns.get(j).map(|c| c.name.as_str()).unwrap_or("");
                        let expr = match stmt.schema.and_then(|s| s.lookup_field(name)) {
                            Some(field) => self.default_value_of(field),
                            None => self.default_value_of(&Field::new(name, DataType::default())),
                        };
                        self.build_expr(stmt, &expr);
                    }
                }
            }
            stmt.sql.push(')');
        }
    }

    fn build_update(&self, stmt: &mut Statement, update: &Update) {
        stmt.sql.push_str("UPDATE ");
        if !update.modifier.is_empty() {
            stmt.sql.push_str(&update.modifier);
            stmt.sql.push(' ');
        }
        match &update.table {
            Some(table) => stmt.write_quoted(table),
            None => stmt.write_quoted(&Table::current()),
        };
    }

    fn build_delete(&self, stmt: &mut Statement, delete: &Delete) {
        stmt.sql.push_str("DELETE");
        if !delete.modifier.is_empty() {
            stmt.sql.push(' ');
            stmt.sql.push_str(&delete.modifier);
        }
    }
}

/// Dialect emitting standard SQL.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}
