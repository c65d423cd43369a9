mod fixtures;
mod recording;
mod suite;

pub use fixtures::*;
pub use recording::*;
pub use suite::*;

use anvil::{Db, Driver, Executor};
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the driver agnostic suite against `db`.
pub async fn execute_tests<E: Executor, D: Driver>(db: &mut Db<E, D>) {
    migration(db).await;
    statements(db).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
