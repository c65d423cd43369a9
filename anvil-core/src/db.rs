use crate::{
    AsValue, Dialect, Driver, ErrorContext, Executor, Migrator, Query, Result, RowsAffected,
    Statement, truncate_long,
};

/// Executor paired with the driver whose dialect renders the statements sent through it.
pub struct Db<E: Executor, D: Driver> {
    pub executor: E,
    pub driver: D,
}

impl<E: Executor, D: Driver> Db<E, D> {
    pub fn new(executor: E, driver: D) -> Self {
        Self { executor, driver }
    }

    pub fn dialect(&self) -> &D::Dialect {
        self.driver.dialect()
    }

    /// Empty statement rendered by the driver's dialect.
    pub fn statement(&self) -> Statement<'_> {
        Statement::new(self.driver.dialect())
    }

    pub async fn exec(&mut self, query: Query) -> Result<RowsAffected> {
        log::debug!("{}", self.dialect().explain(&query.sql, &query.values));
        let sql = query.sql.clone();
        self.executor
            .execute(query)
            .await
            .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
            .inspect_err(|e| log::error!("{:#}", e))
    }

    /// First column of the first row returned.
    pub async fn fetch_value<T: AsValue + Send>(&mut self, query: Query) -> Result<Option<T>> {
        log::debug!("{}", self.dialect().explain(&query.sql, &query.values));
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

    pub async fn save_point(&mut self, name: &str) -> Result<()> {
        let mut sql = String::new();
        self.dialect().write_save_point(&mut sql, name);
        self.exec(sql.into()).await.map(|_| ())
    }

    pub async fn rollback_to(&mut self, name: &str) -> Result<()> {
        let mut sql = String::new();
        self.dialect().write_rollback_to(&mut sql, name);
        self.exec(sql.into()).await.map(|_| ())
    }

    pub fn migrator(&mut self) -> impl Migrator + '_ {
        self.driver.migrator(&mut self.executor)
    }
}
