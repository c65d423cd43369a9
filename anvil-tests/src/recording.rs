use anvil::{
    Connection, Error, Executor, Query, QueryResult, Result, RowLabeled, RowsAffected, Value,
    stream::{self, Stream},
};
use std::collections::VecDeque;

/// Executor that records every query instead of sending it to a database.
///
/// Queries starting with `SELECT` answer with a single row holding the next
/// queued value, or with no rows when the queue is empty. Any other query
/// affects one row. Queries containing one of the `failing` fragments fail.
#[derive(Default, Debug)]
pub struct RecordingExecutor {
    /// DSN received by [`Connection::connect`].
    pub url: String,
    pub queries: Vec<Query>,
    pub answers: VecDeque<Value>,
    pub failing: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the value returned by the next row producing query.
    pub fn answer(mut self, value: impl Into<Value>) -> Self {
        self.answers.push_back(value.into());
        self
    }

    /// Make every query containing `fragment` fail.
    pub fn fail_on(mut self, fragment: impl Into<String>) -> Self {
        self.failing.push(fragment.into());
        self
    }

    /// SQL of the recorded queries, in execution order.
    pub fn sql(&self) -> Vec<&str> {
        self.queries.iter().map(|v| v.sql.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

impl Executor for RecordingExecutor {
    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let result = if let Some(fragment) = self.failing.iter().find(|v| query.sql.contains(*v))
        {
            vec![Err(Error::msg(format!(
                "Recorded failure on `{}`",
                fragment
            )))]
        } else if query
            .sql
            .trim_start()
            .get(..6)
            .is_some_and(|v| v.eq_ignore_ascii_case("SELECT"))
        {
            self.answers
                .pop_front()
                .map(|value| {
                    Ok(QueryResult::Row(RowLabeled::new(
                        vec!["value".to_string()].into(),
                        vec![value].into_boxed_slice(),
                    )))
                })
                .into_iter()
                .collect()
        } else {
            vec![Ok(QueryResult::Affected(RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            }))]
        };
        log::trace!("Recorded `{}`", query.sql);
        self.queries.push(query);
        stream::iter(result)
    }
}

impl Connection for RecordingExecutor {
    async fn connect(url: &str) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            ..Default::default()
        })
    }
}
