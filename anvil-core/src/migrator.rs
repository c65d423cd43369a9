use crate::{
    AsValue, CheckConstraint, Dialect, Error, ErrorContext, Executor, Expr, Field, ForeignKey,
    Query, Result, Schema, Statement, Table, Value, contains_ignore_ascii_case, reorder_schemas,
    truncate_long,
};
use std::future::Future;

/// Switches of the schema migration.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigratorConfig {
    /// Create indexes with separate statements once the table exists, instead of inline.
    pub create_index_after_create_table: bool,
    /// Leave foreign keys out of the created tables.
    pub disable_foreign_key_constraints: bool,
}

/// Schema management: tables, columns, indexes and constraints.
///
/// Existence checks return `Ok(false)` when the object is missing and an error
/// only when the database could not be queried.
pub trait Migrator: Send {
    fn config(&self) -> &MigratorConfig;

    fn current_database(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Create the tables, referenced tables first.
    fn create_table(&mut self, schemas: &[&Schema]) -> impl Future<Output = Result<()>> + Send;

    /// Drop the tables, referencing tables first.
    fn drop_table(&mut self, schemas: &[&Schema]) -> impl Future<Output = Result<()>> + Send;

    fn has_table(&mut self, schema: &Schema) -> impl Future<Output = Result<bool>> + Send;

    /// Add the column of the field `name` (model or column name).
    fn add_column(&mut self, schema: &Schema, name: &str)
    -> impl Future<Output = Result<()>> + Send;

    /// Change the column of the field `name` to its current definition.
    fn alter_column(
        &mut self,
        schema: &Schema,
        name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn rename_column(
        &mut self,
        schema: &Schema,
        old_name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn drop_column(&mut self, schema: &Schema, name: &str)
    -> impl Future<Output = Result<()>> + Send;

    fn has_column(&mut self, schema: &Schema, name: &str)
    -> impl Future<Output = Result<bool>> + Send;

    /// Create the index called `name`, or the one covering the field `name`.
    fn create_index(&mut self, schema: &Schema, name: &str)
    -> impl Future<Output = Result<()>> + Send;

    fn drop_index(&mut self, schema: &Schema, name: &str)
    -> impl Future<Output = Result<()>> + Send;

    fn has_index(&mut self, schema: &Schema, name: &str)
    -> impl Future<Output = Result<bool>> + Send;

    /// Create the check or foreign key constraint called `name` unless it exists.
    fn create_constraint(
        &mut self,
        schema: &Schema,
        name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn drop_constraint(
        &mut self,
        schema: &Schema,
        name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn has_constraint(
        &mut self,
        schema: &Schema,
        name: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Bring the database up to the schemas: create missing tables, then add
    /// missing columns, constraints and indexes of the existing ones.
    fn auto_migrate(&mut self, schemas: &[&Schema]) -> impl Future<Output = Result<()>> + Send {
        async move {
            let foreign_keys = !self.config().disable_foreign_key_constraints;
            for schema in reorder_schemas(schemas) {
                if !self.has_table(schema).await? {
                    self.create_table(&[schema]).await?;
                    continue;
                }
                for field in &schema.fields {
                    if !self.has_column(schema, &field.db_name).await? {
                        self.add_column(schema, &field.name).await?;
                    }
                }
                let constraints = schema.checks.iter().map(|v| &v.name).chain(
                    schema
                        .foreign_keys
                        .iter()
                        .filter(|_| foreign_keys)
                        .map(|v| &v.name),
                );
                for name in constraints {
                    if !self.has_constraint(schema, name).await? {
                        self.create_constraint(schema, name).await?;
                    }
                }
                for index in &schema.indexes {
                    if !self.has_index(schema, &index.name).await? {
                        self.create_index(schema, &index.name).await?;
                    }
                }
            }
            Ok(())
        }
    }
}

fn lookup_error(name: &str) -> Error {
    Error::msg(format!("failed to look up field with name: {}", name))
}

/// Migrator over the standard `INFORMATION_SCHEMA` views, dialects build on it.
pub struct SchemaMigrator<'m, E: Executor, D: Dialect> {
    pub executor: &'m mut E,
    pub dialect: &'m D,
    pub config: MigratorConfig,
}

impl<'m, E: Executor, D: Dialect> SchemaMigrator<'m, E, D> {
    pub fn new(executor: &'m mut E, dialect: &'m D, config: MigratorConfig) -> Self {
        Self {
            executor,
            dialect,
            config,
        }
    }

    /// Statement whose current table is the one of `schema`.
    pub fn statement<'s>(&'s self, schema: &'s Schema) -> Statement<'s> {
        Statement::new(self.dialect).with_schema(schema)
    }

    /// Raw SQL on the table of `schema`, each `?` takes the next variable.
    pub fn raw(
        &self,
        schema: &Schema,
        sql: &str,
        vars: impl IntoIterator<Item = Value>,
    ) -> Result<Query> {
        let mut stmt = self.statement(schema);
        self.dialect.build_expr(&mut stmt, &Expr::new(sql, vars));
        stmt.finish()
    }

    /// Column type followed by its `NOT NULL`, `UNIQUE` and `DEFAULT` modifiers.
    pub fn full_data_type_of(&self, field: &Field) -> String {
        let mut result = self.dialect.data_type_of(field);
        if field.not_null {
            result.push_str(" NOT NULL");
        }
        if field.unique {
            result.push_str(" UNIQUE");
        }
        if let Some(value) = &field.default_value {
            result.push_str(" DEFAULT ");
            result.push_str(value);
        }
        result
    }

    /// Execute a statement producing no rows.
    pub async fn run(&mut self, query: Query) -> Result<()> {
        log::debug!("{}", self.dialect.explain(&query.sql, &query.values));
        let sql = query.sql.clone();
        self.executor
            .execute(query)
            .await
            .map(|_| ())
            .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
            .inspect_err(|e| log::error!("{:#}", e))
    }

    /// First column of the first row.
    pub async fn fetch_value<T: AsValue + Send>(&mut self, query: Query) -> Result<Option<T>> {
        log::debug!("{}", self.dialect.explain(&query.sql, &query.values));
        let sql = query.sql.clone();
        let row = self
            .executor
            .fetch_one(query)
            .await
            .with_context(|| format!("While fetching `{}`", truncate_long!(sql)))
            .inspect_err(|e| log::error!("{:#}", e))?;
        match row.and_then(|v| v.values.into_vec().into_iter().next()) {
            Some(value) => Option::<T>::try_from_value(value),
            None => Ok(None),
        }
    }

    /// Row count returned by a `SELECT COUNT(*)`, zero when missing.
    pub async fn count(&mut self, query: Query) -> Result<i64> {
        Ok(self.fetch_value::<i64>(query).await?.unwrap_or_default())
    }

    pub fn create_table_query(&self, schema: &Schema) -> Result<Query> {
        let mut stmt = self.statement(schema);
        stmt.sql.push_str("CREATE TABLE ");
        stmt.write_quoted(&Table::current());
        stmt.sql.push_str(" (");
        let mut primary_key_in_type = false;
        for field in &schema.fields {
            let data_type = self.full_data_type_of(field);
            primary_key_in_type |= contains_ignore_ascii_case(&data_type, "PRIMARY KEY");
            stmt.write_quoted(field.db_name.as_str());
            stmt.sql.push(' ');
            stmt.sql.push_str(&data_type);
            stmt.sql.push(',');
        }
        let primary_key = schema
            .primary_fields()
            .map(|f| f.db_name.clone())
            .collect::<Vec<_>>();
        if !primary_key_in_type && !primary_key.is_empty() {
            stmt.sql.push_str("PRIMARY KEY ");
            stmt.write_quoted(primary_key.as_slice());
            stmt.sql.push(',');
        }
        if !self.config.create_index_after_create_table {
            for index in &schema.indexes {
                if !index.class.is_empty() {
                    stmt.sql.push_str(&index.class);
                    stmt.sql.push(' ');
                }
                stmt.sql.push_str("INDEX ");
                stmt.write_quoted(index.name.as_str());
                stmt.sql.push(' ');
                stmt.write_quoted(index.fields.as_slice());
                if !index.option.is_empty() {
                    stmt.sql.push(' ');
                    stmt.sql.push_str(&index.option);
                }
                stmt.sql.push(',');
            }
        }
        if !self.config.disable_foreign_key_constraints {
            for foreign_key in &schema.foreign_keys {
                write_foreign_key(&mut stmt, foreign_key);
                stmt.sql.push(',');
            }
        }
        for check in &schema.checks {
            write_check(&mut stmt, check);
            stmt.sql.push(',');
        }
        if stmt.sql.ends_with(',') {
            stmt.sql.pop();
        }
        stmt.sql.push(')');
        stmt.finish()
    }

    pub fn create_index_query(&self, schema: &Schema, name: &str) -> Result<Query> {
        let Some(index) = schema.lookup_index(name) else {
            return Err(Error::msg(format!(
                "failed to create index with name {}",
                name
            )));
        };
        let mut stmt = self.statement(schema);
        stmt.sql.push_str("CREATE ");
        if !index.class.is_empty() {
            stmt.sql.push_str(&index.class);
            stmt.sql.push(' ');
        }
        stmt.sql.push_str("INDEX ");
        stmt.write_quoted(index.name.as_str());
        stmt.sql.push_str(" ON ");
        stmt.write_quoted(&Table::current());
        stmt.sql.push(' ');
        stmt.write_quoted(index.fields.as_slice());
        if !index.option.is_empty() {
            stmt.sql.push(' ');
            stmt.sql.push_str(&index.option);
        }
        stmt.finish()
    }

    /// `ALTER TABLE ... ADD` of the check or foreign key called `name`.
    pub fn add_constraint_query(&self, schema: &Schema, name: &str) -> Result<Query> {
        let mut stmt = self.statement(schema);
        stmt.sql.push_str("ALTER TABLE ");
        stmt.write_quoted(&Table::current());
        stmt.sql.push_str(" ADD ");
        if let Some(check) = schema.lookup_check(name) {
            write_check(&mut stmt, check);
        } else if let Some(foreign_key) = schema.lookup_foreign_key(name) {
            write_foreign_key(&mut stmt, foreign_key);
        } else {
            return Err(Error::msg(format!(
                "failed to create constraint with name {}",
                name
            )));
        }
        stmt.finish()
    }

    /// `ALTER TABLE "T" <action> "C"`, plus a trailing column type when given.
    pub fn alter_table_query(
        &self,
        schema: &Schema,
        action: &str,
        column: &str,
        data_type: Option<&str>,
    ) -> Result<Query> {
        let mut stmt = self.statement(schema);
        stmt.sql.push_str("ALTER TABLE ");
        stmt.write_quoted(&Table::current());
        stmt.sql.push(' ');
        stmt.sql.push_str(action);
        stmt.sql.push(' ');
        stmt.write_quoted(column);
        if let Some(data_type) = data_type {
            stmt.sql.push(' ');
            stmt.sql.push_str(data_type);
        }
        stmt.finish()
    }

    pub fn rename_column_query(
        &self,
        schema: &Schema,
        old_name: &str,
        new_name: &str,
    ) -> Result<Query> {
        let old_name = schema.lookup_field(old_name).map_or(old_name, |f| f.db_name.as_str());
        let new_name = schema.lookup_field(new_name).map_or(new_name, |f| f.db_name.as_str());
        let mut stmt = self.statement(schema);
        stmt.sql.push_str("ALTER TABLE ");
        stmt.write_quoted(&Table::current());
        stmt.sql.push_str(" RENAME COLUMN ");
        stmt.write_quoted(old_name);
        stmt.sql.push_str(" TO ");
        stmt.write_quoted(new_name);
        stmt.finish()
    }

    /// Column type of the field `name`, which must exist.
    pub fn field_type(&self, schema: &Schema, name: &str) -> Result<(String, String)> {
        let field = schema.lookup_field(name).ok_or_else(|| lookup_error(name))?;
        Ok((field.db_name.clone(), self.full_data_type_of(field)))
    }
}

/// `CONSTRAINT "N" FOREIGN KEY ("C") REFERENCES "T"("C")` with its actions.
pub fn write_foreign_key(stmt: &mut Statement, value: &ForeignKey) {
    stmt.sql.push_str("CONSTRAINT ");
    stmt.write_quoted(value.name.as_str());
    stmt.sql.push_str(" FOREIGN KEY (");
    stmt.write_quoted(value.column.as_str());
    stmt.sql.push_str(") REFERENCES ");
    stmt.write_quoted(value.references.table.as_str());
    stmt.sql.push('(');
    stmt.write_quoted(value.references.column.as_str());
    stmt.sql.push(')');
    if let Some(action) = value.references.on_delete {
        stmt.sql.push_str(" ON DELETE ");
        stmt.sql.push_str(action.as_sql());
    }
    if let Some(action) = value.references.on_update {
        stmt.sql.push_str(" ON UPDATE ");
        stmt.sql.push_str(action.as_sql());
    }
}

/// `CONSTRAINT "N" CHECK (...)`
pub fn write_check(stmt: &mut Statement, value: &CheckConstraint) {
    stmt.sql.push_str("CONSTRAINT ");
    stmt.write_quoted(value.name.as_str());
    stmt.sql.push_str(" CHECK (");
    stmt.sql.push_str(&value.constraint);
    stmt.sql.push(')');
}

impl<'m, E: Executor, D: Dialect> Migrator for SchemaMigrator<'m, E, D> {
    fn config(&self) -> &MigratorConfig {
        &self.config
    }

    async fn current_database(&mut self) -> Result<String> {
        Ok(self
            .fetch_value::<String>("SELECT DATABASE()".into())
            .await?
            .unwrap_or_default())
    }

    async fn create_table(&mut self, schemas: &[&Schema]) -> Result<()> {
        for schema in reorder_schemas(schemas) {
            let query = self.create_table_query(schema)?;
            self.run(query).await?;
            if self.config.create_index_after_create_table {
                for index in &schema.indexes {
                    self.create_index(schema, &index.name).await?;
                }
            }
        }
        Ok(())
    }

    async fn drop_table(&mut self, schemas: &[&Schema]) -> Result<()> {
        for schema in reorder_schemas(schemas).into_iter().rev() {
            let mut stmt = self.statement(schema);
            stmt.sql.push_str("DROP TABLE IF EXISTS ");
            stmt.write_quoted(&Table::current());
            let query = stmt.finish()?;
            self.run(query).await?;
        }
        Ok(())
    }

    async fn has_table(&mut self, schema: &Schema) -> Result<bool> {
        let database = self.current_database().await?;
        let query = self.raw(
            schema,
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND TABLE_TYPE = ?",
            [Value::from(database), schema.table.as_str().into(), "BASE TABLE".into()],
        )?;
        Ok(self.count(query).await? > 0)
    }

    async fn add_column(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let (column, data_type) = self.field_type(schema, name)?;
        let query = self.alter_table_query(schema, "ADD", &column, Some(&data_type))?;
        self.run(query).await
    }

    async fn alter_column(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let (column, data_type) = self.field_type(schema, name)?;
        let data_type = format!("TYPE {}", data_type);
        let query = self.alter_table_query(schema, "ALTER COLUMN", &column, Some(&data_type))?;
        self.run(query).await
    }

    async fn rename_column(&mut self, schema: &Schema, old_name: &str, new_name: &str) -> Result<()> {
        let query = self.rename_column_query(schema, old_name, new_name)?;
        self.run(query).await
    }

    async fn drop_column(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let name = schema.lookup_field(name).map_or(name, |f| f.db_name.as_str());
        let query = self.alter_table_query(schema, "DROP COLUMN", name, None)?;
        self.run(query).await
    }

    async fn has_column(&mut self, schema: &Schema, name: &str) -> Result<bool> {
        let name = schema.lookup_field(name).map_or(name, |f| f.db_name.as_str());
        let database = self.current_database().await?;
        let query = self.raw(
            schema,
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND COLUMN_NAME = ?",
            [Value::from(database), schema.table.as_str().into(), name.into()],
        )?;
        Ok(self.count(query).await? > 0)
    }

    async fn create_index(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let query = self.create_index_query(schema, name)?;
        self.run(query).await
    }

    async fn drop_index(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let name = schema.lookup_index(name).map_or(name, |v| v.name.as_str());
        let mut stmt = self.statement(schema);
        stmt.sql.push_str("DROP INDEX ");
        stmt.write_quoted(name);
        stmt.sql.push_str(" ON ");
        stmt.write_quoted(&Table::current());
        let query = stmt.finish()?;
        self.run(query).await
    }

    async fn has_index(&mut self, schema: &Schema, name: &str) -> Result<bool> {
        let name = schema.lookup_index(name).map_or(name, |v| v.name.as_str());
        let database = self.current_database().await?;
        let query = self.raw(
            schema,
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.STATISTICS WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND INDEX_NAME = ?",
            [Value::from(database), schema.table.as_str().into(), name.into()],
        )?;
        Ok(self.count(query).await? > 0)
    }

    async fn create_constraint(&mut self, schema: &Schema, name: &str) -> Result<()> {
        if self.has_constraint(schema, name).await? {
            return Ok(());
        }
        let query = self.add_constraint_query(schema, name)?;
        self.run(query).await
    }

    async fn drop_constraint(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let query = self.alter_table_query(schema, "DROP CONSTRAINT", name, None)?;
        self.run(query).await
    }

    async fn has_constraint(&mut self, schema: &Schema, name: &str) -> Result<bool> {
        let database = self.current_database().await?;
        let query = self.raw(
            schema,
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS WHERE CONSTRAINT_SCHEMA = ? AND TABLE_NAME = ? AND CONSTRAINT_NAME = ?",
            [Value::from(database), schema.table.as_str().into(), name.into()],
        )?;
        Ok(self.count(query).await? > 0)
    }
}
