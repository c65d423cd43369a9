use crate::Dm8Namer;
use anvil_core::{
    Column, DataType, Dialect, Expr, Expression, Field, FromClause, GroupBy, In, Limit, Namer,
    OnConflict, OrderBy, Select, Set, Statement, Table, Value, Where, explain_sql,
    possibly_parenthesized,
};
use std::{fmt::Write, slice};

/// Length of string columns taking part in keys when no default size is configured.
pub const DEFAULT_KEY_STRING_SIZE: u32 = 256;
/// Longest `varchar` accepted by DM8 for a row in the default page size.
pub const MAX_VARCHAR_SIZE: u32 = 8188;

/// SQL dialect of DM8 (Dameng).
///
/// Identifiers are folded to upper case when quoted, and the SQL rendered so far
/// is upper cased every time a variable is bound, matching the way DM8 stores
/// unquoted names. Pagination uses `OFFSET n ROWS FETCH NEXT n ROWS ONLY`, which
/// requires an `ORDER BY`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dm8Dialect {
    /// Length of key string columns with no explicit size, zero for 256.
    pub default_string_size: u32,
}

impl Dm8Dialect {
    pub const fn new(default_string_size: u32) -> Self {
        Self {
            default_string_size,
        }
    }
}

/// Quote `value` the DM8 way.
///
/// The identifier is upper cased and every dot separated segment is wrapped in
/// double quotes. Two consecutive backticks stand for an escaped double quote,
/// a segment opened by a single backtick is already quoted and its closing
/// backtick is dropped.
pub fn quote_identifier(out: &mut String, value: &str) {
    if value.is_empty() {
        out.push_str("\"\"");
        return;
    }
    let value = value.to_uppercase();
    let mut under_quoted = false;
    let mut self_quoted = false;
    let mut backticks = 0_i32;
    let mut shift_delimiter = 0_i32;
    for c in value.chars() {
        match c {
            '`' => {
                backticks += 1;
                if backticks == 2 {
                    out.push_str("\"\"");
                    backticks = 0;
                }
            }
            '.' => {
                if backticks > 0 || !self_quoted {
                    shift_delimiter = 0;
                    under_quoted = false;
                    backticks = 0;
                    out.push('"');
                }
                out.push('.');
                continue;
            }
            _ => {
                if shift_delimiter - backticks <= 0 && !under_quoted {
                    out.push('"');
                    under_quoted = true;
                    self_quoted = backticks > 0;
                    if self_quoted {
                        backticks -= 1;
                    }
                }
                while backticks > 0 {
                    out.push_str("\"\"");
                    backticks -= 1;
                }
                out.push(c);
            }
        }
        shift_delimiter += 1;
    }
    if backticks > 0 && !self_quoted {
        out.push_str("\"\"");
    }
    out.push('"');
}

/// Whether a raw condition, possibly inside a single element group, mentions a boolean operator.
///
/// The match is a plain substring test on the lower cased text, so names like
/// `color` or `origin` count as well.
fn mentions_boolean_operator(expr: &Expression) -> bool {
    expr.raw_sql().is_some_and(|sql| {
        let sql = sql.to_lowercase();
        sql.contains("and") || sql.contains("or")
    })
}

/// `IN` whose first value is a list of more than one element.
fn is_list_in(value: &In) -> bool {
    value
        .values
        .first()
        .and_then(Value::as_list)
        .is_some_and(|v| v.len() > 1)
}

/// `"COL" IN (?,?,...)` with list values expanded in place.
fn build_flat_in(stmt: &mut Statement, value: &In) {
    stmt.write_quoted(&value.column);
    stmt.sql.push_str(" IN (");
    let values = value
        .values
        .iter()
        .flat_map(|v| v.as_list().unwrap_or(slice::from_ref(v)));
    for (i, v) in values.enumerate() {
        if i > 0 {
            stmt.sql.push(',');
        }
        stmt.add_var(v);
    }
    stmt.sql.push(')');
}

/// Copy of `column` with an upper cased name, the primary key marker is kept.
fn upper_column(column: &Column) -> Column {
    if column.is_primary_key() {
        return column.clone();
    }
    Column {
        name: column.name.to_uppercase(),
        ..column.clone()
    }
}

/// Copy of `table` with an upper cased name, the current table marker is kept.
fn upper_table(table: &Table) -> Table {
    if table.is_current() {
        return table.clone();
    }
    Table {
        name: table.name.to_uppercase(),
        ..table.clone()
    }
}

impl Dialect for Dm8Dialect {
    fn name(&self) -> &'static str {
        "dm"
    }

    fn namer(&self) -> &dyn Namer {
        &Dm8Namer
    }

    fn data_type_of(&self, field: &Field) -> String {
        match &field.data_type {
            DataType::Bool => "bit".into(),
            DataType::Int | DataType::Uint => {
                let name = match field.size {
                    0..8 => "tinyint",
                    8..16 => "smallint",
                    16..32 => "int",
                    _ => "bigint",
                };
                if field.auto_increment {
                    format!("{} IDENTITY(1,1)", name)
                } else {
                    name.into()
                }
            }
            DataType::Float if field.precision > 0 => {
                format!("DECIMAL({}, {})", field.precision, field.scale)
            }
            DataType::Float if field.size <= 32 => "float".into(),
            DataType::Float => "double".into(),
            DataType::String => {
                let mut size = field.size;
                if size == 0 && (field.primary_key || field.has_index()) {
                    size = if self.default_string_size > 0 {
                        self.default_string_size
                    } else {
                        DEFAULT_KEY_STRING_SIZE
                    };
                }
                if size > 0 && size <= MAX_VARCHAR_SIZE {
                    format!("varchar({})", size)
                } else {
                    format!("varchar({})", MAX_VARCHAR_SIZE)
                }
            }
            DataType::Time => {
                let mut result = String::from("datetime");
                if field.precision > 0 {
                    let _ = write!(result, "({})", field.precision);
                }
                if !field.not_null && !field.primary_key {
                    result.push_str(" NULL");
                }
                result
            }
            DataType::Bytes if field.size > 0 && field.size < 65536 => {
                format!("binary({})", field.size)
            }
            DataType::Bytes => "blob".into(),
            DataType::Custom(v) => v.to_string(),
        }
    }

    fn bind_var_to(&self, stmt: &mut Statement, _value: &Value) {
        stmt.sql = stmt.sql.to_uppercase();
        stmt.sql.push('?');
    }

    fn quote_to(&self, out: &mut String, value: &str) {
        quote_identifier(out, value);
    }

    fn explain(&self, sql: &str, vars: &[Value]) -> String {
        explain_sql(sql, "'", vars)
    }

    fn build_where(&self, stmt: &mut Statement, value: &Where) {
        if value.exprs.is_empty() {
            return;
        }
        stmt.sql.push_str("WHERE ");
        let mut exprs = value.exprs.iter().collect::<Vec<_>>();
        if let Some(i) = exprs.iter().position(|e| !e.is_single_or()) {
            exprs.swap(0, i);
        }
        let many = exprs.len() > 1;
        for (i, expr) in exprs.into_iter().enumerate() {
            if i > 0 {
                stmt.sql
                    .push_str(if expr.is_single_or() { " OR " } else { " AND " });
            }
            match expr {
                Expression::In(v) if is_list_in(v) => build_flat_in(stmt, v),
                _ => {
                    let wrap = many && mentions_boolean_operator(expr);
                    possibly_parenthesized!(stmt.sql, wrap, self.build_expression(stmt, expr));
                }
            }
        }
    }

    fn build_limit(&self, stmt: &mut Statement, limit: &Limit) {
        let mut written = false;
        if !stmt.has_clause("ORDER BY") {
            stmt.sql.push_str("ORDER BY ");
            match stmt.schema.and_then(|v| v.prioritized_primary_field()) {
                Some(field) => {
                    stmt.write_quoted(field.db_name.as_str());
                }
                None => stmt.sql.push_str("(SELECT NULL FROM DUAL)"),
            }
            written = true;
        }
        if limit.offset > 0 {
            if written {
                stmt.sql.push(' ');
            }
            let _ = write!(stmt.sql, "OFFSET {} ROWS", limit.offset);
            written = true;
        }
        if let Some(value) = limit.limit.filter(|v| *v > 0) {
            if written {
                stmt.sql.push(' ');
            }
            let _ = write!(stmt.sql, "FETCH NEXT {} ROWS ONLY", value);
        }
    }

    fn build_set(&self, stmt: &mut Statement, set: &Set) {
        stmt.sql.push_str("SET ");
        let assignments = set
            .0
            .iter()
            .filter(|v| !v.column.name.eq_ignore_ascii_case("id"))
            .collect::<Vec<_>>();
        if assignments.is_empty() {
            let pk = Column::primary_key();
            stmt.write_quoted(&pk);
            stmt.sql.push('=');
            stmt.write_quoted(&pk);
            return;
        }
        for (i, assignment) in assignments.into_iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(&upper_column(&assignment.column));
            stmt.sql.push('=');
            stmt.add_var(&assignment.value);
        }
    }

    fn build_select(&self, stmt: &mut Statement, select: &Select) {
        stmt.sql.push_str("SELECT ");
        if let Some(expr) = &select.expression {
            self.build_expr(stmt, expr);
            return;
        }
        if select.columns.is_empty() {
            stmt.sql.push('*');
            return;
        }
        if select.distinct {
            stmt.sql.push_str("DISTINCT ");
        }
        for (i, column) in select.columns.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(&upper_column(column));
        }
    }

    fn build_from(&self, stmt: &mut Statement, from: &FromClause) {
        stmt.sql.push_str("FROM ");
        if from.tables.is_empty() {
            stmt.write_quoted(&Table::current());
        }
        for (i, table) in from.tables.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(&upper_table(table));
        }
        for join in &from.joins {
            stmt.sql.push(' ');
            match &join.expression {
                Some(expr) => {
                    let expr = Expr {
                        sql: expr.sql.to_uppercase(),
                        vars: expr.vars.clone(),
                    };
                    self.build_expr(stmt, &expr);
                }
                None => self.build_join(stmt, join),
            }
        }
    }

    fn build_group_by(&self, stmt: &mut Statement, group_by: &GroupBy) {
        stmt.sql.push_str("GROUP BY ");
        for (i, column) in group_by.columns.iter().enumerate() {
            if i > 0 {
                stmt.sql.push(',');
            }
            stmt.write_quoted(&upper_column(column));
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
            stmt.write_quoted(&upper_column(&column.column));
            if column.desc {
                stmt.sql.push_str(" DESC");
            }
        }
    }

    fn build_on_conflict(&self, _stmt: &mut Statement, _on_conflict: &OnConflict) {
        log::debug!("DM8 has no ON CONFLICT, the clause is left out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(value: &str) -> String {
        let mut out = String::new();
        quote_identifier(&mut out, value);
        out
    }

    fn field(data_type: DataType, size: u32) -> Field {
        Field::new("value", data_type).size(size)
    }

    #[test]
    fn quote_segments() {
        assert_eq!(quoted("user"), r#""USER""#);
        assert_eq!(quoted("a.b"), r#""A"."B""#);
        assert_eq!(quoted("`a`.`b`"), r#""A"."B""#);
        assert_eq!(quoted("login_name"), r#""LOGIN_NAME""#);
    }

    #[test]
    fn quote_backticks() {
        assert_eq!(quoted("a``b"), r#""A""B""#);
        assert_eq!(quoted("`a.b`"), r#""A.B""#);
        assert_eq!(quoted("a`"), r#""A""""#);
        assert_eq!(quoted(""), r#""""#);
    }

    #[test]
    fn integer_types() {
        let dialect = Dm8Dialect::default();
        assert_eq!(dialect.data_type_of(&field(DataType::Int, 7)), "tinyint");
        assert_eq!(dialect.data_type_of(&field(DataType::Uint, 15)), "smallint");
        assert_eq!(dialect.data_type_of(&field(DataType::Int, 31)), "int");
        assert_eq!(dialect.data_type_of(&field(DataType::Int, 32)), "bigint");
        assert_eq!(dialect.data_type_of(&field(DataType::Int, 0)), "tinyint");
        assert_eq!(
            dialect.data_type_of(&field(DataType::Int, 64).auto_increment()),
            "bigint IDENTITY(1,1)"
        );
    }

    #[test]
    fn string_types() {
        let dialect = Dm8Dialect::default();
        assert_eq!(
            dialect.data_type_of(&field(DataType::String, 0).primary_key()),
            "varchar(256)"
        );
        assert_eq!(
            Dm8Dialect::new(191).data_type_of(&field(DataType::String, 0).index()),
            "varchar(191)"
        );
        assert_eq!(
            dialect.data_type_of(&field(DataType::String, 0)),
            "varchar(8188)"
        );
        assert_eq!(
            dialect.data_type_of(&field(DataType::String, 100)),
            "varchar(100)"
        );
        assert_eq!(
            dialect.data_type_of(&field(DataType::String, 10000)),
            "varchar(8188)"
        );
    }

    #[test]
    fn other_types() {
        let dialect = Dm8Dialect::default();
        assert_eq!(dialect.data_type_of(&field(DataType::Bool, 0)), "bit");
        assert_eq!(
            dialect.data_type_of(&field(DataType::Float, 0).precision(10, 2)),
            "DECIMAL(10, 2)"
        );
        assert_eq!(dialect.data_type_of(&field(DataType::Float, 32)), "float");
        assert_eq!(dialect.data_type_of(&field(DataType::Float, 64)), "double");
        assert_eq!(dialect.data_type_of(&field(DataType::Float, 0)), "float");
        assert_eq!(
            dialect.data_type_of(&field(DataType::Time, 0)),
            "datetime NULL"
        );
        assert_eq!(
            dialect.data_type_of(&field(DataType::Time, 0).precision(3, 0).not_null()),
            "datetime(3)"
        );
        assert_eq!(dialect.data_type_of(&field(DataType::Bytes, 16)), "binary(16)");
        assert_eq!(dialect.data_type_of(&field(DataType::Bytes, 65536)), "blob");
        assert_eq!(
            dialect.data_type_of(&field(DataType::Custom("CLOB".into()), 0)),
            "CLOB"
        );
    }

    #[test]
    fn binding_upper_cases() {
        let dialect = Dm8Dialect::default();
        let mut stmt = Statement::new(&dialect);
        stmt.sql.push_str("select name from t where a = ");
        stmt.add_var(&Value::from("lower"));
        assert_eq!(stmt.sql, "SELECT NAME FROM T WHERE A = ?");
        assert_eq!(stmt.vars, [Value::from("lower")]);
    }

    #[test]
    fn boolean_operator_detection() {
        assert!(mentions_boolean_operator(&Expression::expr("a = 1 or b = 2", [])));
        assert!(mentions_boolean_operator(&Expression::or([Expression::expr("color = ?", [])])));
        assert!(!mentions_boolean_operator(&Expression::expr("name = ?", [])));
        assert!(!mentions_boolean_operator(&Expression::eq("origin", 1)));
    }
}
