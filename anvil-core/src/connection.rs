use crate::{Executor, Result};
use std::future::Future;

/// Executor owning a live session with the database.
pub trait Connection: Executor + Sized {
    /// Establish a connection to the database described by the `url` DSN.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;
}
