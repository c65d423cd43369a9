use crate::{Config, DEFAULT_DRIVER_NAME, Dm8Dialect, Dm8Migrator};
use anvil_core::{
    Connection, Db, Driver, ErrorContext, Executor, Migrator, MigratorConfig, Result,
};

/// DM8 backend: the dialect configured from [`Config`] and the catalog based migrator.
#[derive(Default, Debug, Clone)]
pub struct Dm8Driver {
    config: Config,
    dialect: Dm8Dialect,
}

impl Dm8Driver {
    /// Driver for the database at `dsn`, default settings otherwise.
    pub fn open(dsn: impl Into<String>) -> Self {
        Self::new(Config::new(dsn))
    }

    pub fn new(config: Config) -> Self {
        let dialect = Dm8Dialect::new(config.default_string_size);
        Self { config, dialect }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn migrator_config(&self) -> MigratorConfig {
        MigratorConfig {
            create_index_after_create_table: true,
            disable_foreign_key_constraints: self.config.disable_foreign_key_constraints,
        }
    }

    /// Check the DSN and open a connection to it through `C`.
    pub async fn initialize<C: Connection>(self) -> Result<Db<C, Self>> {
        let options = self.config.connect_options()?;
        log::debug!(
            "Connecting to DM8 at {}:{} as `{}`",
            options.host,
            options.port,
            options.user
        );
        let connection = C::connect(&self.config.dsn)
            .await
            .with_context(|| {
                format!(
                    "While connecting to DM8 at {}:{} as `{}`",
                    options.host, options.port, options.user
                )
            })
            .inspect_err(|e| log::error!("{:#}", e))?;
        Ok(Db::new(connection, self))
    }

    /// Use an already open connection.
    pub fn with_connection<E: Executor>(self, executor: E) -> Db<E, Self> {
        Db::new(executor, self)
    }
}

impl Driver for Dm8Driver {
    type Dialect = Dm8Dialect;

    const NAME: &'static str = DEFAULT_DRIVER_NAME;

    fn dialect(&self) -> &Self::Dialect {
        &self.dialect
    }

    fn migrator<'m, E: Executor>(&'m self, executor: &'m mut E) -> impl Migrator + 'm {
        Dm8Migrator::new(executor, &self.dialect, self.migrator_config())
    }
}
