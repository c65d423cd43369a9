use crate::{Dialect, Executor, GenericDialect, Migrator, MigratorConfig, SchemaMigrator};

/// Entry point of a database backend: its dialect and its migrator.
pub trait Driver: Send + Sync {
    type Dialect: Dialect;

    /// Backend name, also the DSN scheme.
    const NAME: &'static str;

    fn dialect(&self) -> &Self::Dialect;

    /// Migrator issuing its statements through `executor`.
    fn migrator<'m, E: Executor>(&'m self, executor: &'m mut E) -> impl Migrator + 'm;
}

/// Driver emitting standard SQL, migrating through `INFORMATION_SCHEMA`.
#[derive(Default, Debug, Clone)]
pub struct GenericDriver {
    pub dialect: GenericDialect,
    pub config: MigratorConfig,
}

impl Driver for GenericDriver {
    type Dialect = GenericDialect;

    const NAME: &'static str = "generic";

    fn dialect(&self) -> &Self::Dialect {
        &self.dialect
    }

    fn migrator<'m, E: Executor>(&'m self, executor: &'m mut E) -> impl Migrator + 'm {
        SchemaMigrator::new(executor, &self.dialect, self.config)
    }
}
