use crate::Dm8Dialect;
use anvil_core::{
    CURRENT_TABLE, Column, Dialect, Executor, Field, Migrator, MigratorConfig, Query, Result,
    Schema, SchemaMigrator, Table, Value, reorder_schemas,
};

/// Migrator over the DM8 catalog views (`USER_TABLES`, `USER_INDEXES`, ...).
///
/// Statements shared with standard SQL are rendered by the wrapped [`SchemaMigrator`].
pub struct Dm8Migrator<'m, E: Executor> {
    base: SchemaMigrator<'m, E, Dm8Dialect>,
}

impl<'m, E: Executor> Dm8Migrator<'m, E> {
    pub fn new(executor: &'m mut E, dialect: &'m Dm8Dialect, config: MigratorConfig) -> Self {
        Self {
            base: SchemaMigrator::new(executor, dialect, config),
        }
    }

    /// `COMMENT ON COLUMN "T"."C" IS '...'`
    pub fn comment_query(&self, schema: &Schema, field: &Field) -> Result<Query> {
        let mut stmt = self.base.statement(schema);
        stmt.sql.push_str("COMMENT ON COLUMN ");
        stmt.write_quoted(&Column::qualified(CURRENT_TABLE, field.db_name.as_str()));
        stmt.sql.push_str(" IS ");
        stmt.sql.push_str(
            &self
                .base
                .dialect
                .explain("?", &[Value::from(field.comment.as_str())]),
        );
        stmt.finish()
    }

    pub fn drop_table_query(&self, schema: &Schema) -> Result<Query> {
        let mut stmt = self.base.statement(schema);
        stmt.sql.push_str("DROP TABLE IF EXISTS ");
        stmt.write_quoted(&Table::current());
        stmt.sql.push_str(" CASCADE");
        stmt.finish()
    }

    /// Whether the `SELECT COUNT(*)` catalog query `sql` counts any row.
    async fn count_in_catalog(
        &mut self,
        schema: &Schema,
        sql: &str,
        vars: impl IntoIterator<Item = Value>,
    ) -> Result<bool> {
        let query = self.base.raw(schema, sql, vars)?;
        Ok(self.base.count(query).await? > 0)
    }
}

impl<'m, E: Executor> Migrator for Dm8Migrator<'m, E> {
    fn config(&self) -> &MigratorConfig {
        &self.base.config
    }

    async fn current_database(&mut self) -> Result<String> {
        Ok(self
            .base
            .fetch_value::<String>(
                "SELECT SYS_CONTEXT ('userenv', 'current_schema') FROM DUAL".into(),
            )
            .await?
            .unwrap_or_default())
    }

    async fn create_table(&mut self, schemas: &[&Schema]) -> Result<()> {
        self.base.create_table(schemas).await?;
        for schema in reorder_schemas(schemas) {
            for field in schema.fields.iter().filter(|f| !f.comment.is_empty()) {
                let query = self.comment_query(schema, field)?;
                self.base.run(query).await?;
            }
        }
        Ok(())
    }

    async fn drop_table(&mut self, schemas: &[&Schema]) -> Result<()> {
        if let Err(e) = self.base.run("SET FOREIGN_KEY_CHECKS = 0;".into()).await {
            log::warn!("Could not disable the foreign key checks: {:#}", e);
        }
        let mut result = Ok(());
        for schema in reorder_schemas(schemas).into_iter().rev() {
            let query = match self.drop_table_query(schema) {
                Ok(query) => query,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            };
            if let Err(e) = self.base.run(query).await {
                result = Err(e);
                break;
            }
        }
        if let Err(e) = self.base.run("SET FOREIGN_KEY_CHECKS = 1;".into()).await {
            log::warn!("Could not enable the foreign key checks: {:#}", e);
        }
        result
    }

    async fn has_table(&mut self, schema: &Schema) -> Result<bool> {
        self.count_in_catalog(
            schema,
            "SELECT COUNT(*) FROM USER_TABLES WHERE TABLE_NAME = ?",
            [Value::from(schema.table.as_str())],
        )
        .await
    }

    async fn add_column(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let (column, data_type) = self.base.field_type(schema, name)?;
        let query = self
            .base
            .alter_table_query(schema, "ADD", &column, Some(&data_type))?;
        self.base.run(query).await
    }

    async fn alter_column(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let (column, data_type) = self.base.field_type(schema, name)?;
        let query =
            self.base
                .alter_table_query(schema, "MODIFY COLUMN", &column, Some(&data_type))?;
        self.base.run(query).await
    }

    async fn rename_column(&mut self, schema: &Schema, old_name: &str, new_name: &str) -> Result<()> {
        self.base.rename_column(schema, old_name, new_name).await
    }

    async fn drop_column(&mut self, schema: &Schema, name: &str) -> Result<()> {
        self.base.drop_column(schema, name).await
    }

    async fn has_column(&mut self, schema: &Schema, name: &str) -> Result<bool> {
        let name = schema.lookup_field(name).map_or(name, |f| f.db_name.as_str());
        self.count_in_catalog(
            schema,
            "SELECT COUNT(*) FROM USER_TAB_COLUMNS WHERE TABLE_NAME = ? AND COLUMN_NAME = ?",
            [Value::from(schema.table.as_str()), name.into()],
        )
        .await
    }

    async fn create_index(&mut self, schema: &Schema, name: &str) -> Result<()> {
        self.base.create_index(schema, name).await
    }

    async fn drop_index(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let name = schema.lookup_index(name).map_or(name, |v| v.name.as_str());
        let mut stmt = self.base.statement(schema);
        stmt.sql.push_str("DROP INDEX ");
        stmt.write_quoted(name);
        let query = stmt.finish()?;
        self.base.run(query).await
    }

    async fn has_index(&mut self, schema: &Schema, name: &str) -> Result<bool> {
        let name = schema.lookup_index(name).map_or(name, |v| v.name.as_str());
        self.count_in_catalog(
            schema,
            "SELECT COUNT(*) FROM USER_INDEXES WHERE TABLE_NAME = ? AND INDEX_NAME = ?",
            [Value::from(schema.table.as_str()), name.into()],
        )
        .await
    }

    async fn create_constraint(&mut self, schema: &Schema, name: &str) -> Result<()> {
        if self.has_constraint(schema, name).await? {
            return Ok(());
        }
        let query = self.base.add_constraint_query(schema, name)?;
        self.base.run(query).await
    }

    async fn drop_constraint(&mut self, schema: &Schema, name: &str) -> Result<()> {
        let action = if schema.lookup_check(name).is_some() {
            "DROP CHECK"
        } else {
            "DROP CONSTRAINT"
        };
        let query = self.base.alter_table_query(schema, action, name, None)?;
        self.base.run(query).await
    }

    async fn has_constraint(&mut self, schema: &Schema, name: &str) -> Result<bool> {
        self.count_in_catalog(
            schema,
            "SELECT COUNT(*) FROM USER_CONSTRAINTS WHERE TABLE_NAME = ? AND CONSTRAINT_NAME = ?",
            [Value::from(schema.table.as_str()), name.into()],
        )
        .await
    }
}
