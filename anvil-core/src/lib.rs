mod clause;
mod connection;
mod db;
mod dialect;
mod driver;
mod executor;
mod explain;
mod migrator;
mod query;
mod schema;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use clause::*;
pub use connection::*;
pub use db::*;
pub use dialect::*;
pub use driver::*;
pub use executor::*;
pub use explain::*;
pub use migrator::*;
pub use query::*;
pub use schema::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
