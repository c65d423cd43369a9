//! DM8 (Dameng) dialect for Anvil.
//!
//! [`Dm8Dialect`] renders the clauses and column types, [`Dm8Migrator`] manages
//! the schema through the DM8 catalog views and [`Dm8Driver`] ties them to a
//! [`Config`]. Talking to the server is left to an [`anvil_core::Connection`]
//! supplied by the caller.

mod config;
mod dialect;
mod driver;
mod migrator;
mod namer;

pub use config::*;
pub use dialect::*;
pub use driver::*;
pub use migrator::*;
pub use namer::*;
