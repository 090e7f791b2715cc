//! Transaction scope handed to [`Database::transaction`] closures.
//!
//! Every statement run through a [`Transaction`] goes to the one connection
//! leased for the transaction, so they all share its `START TRANSACTION`.
//! Commit and rollback are driven by [`Database::transaction`] from the
//! closure's result; there is no way to end the transaction by hand and no
//! nested transaction or savepoint support.
//!
//! [`Database::transaction`]: crate::Database::transaction

use crate::client::{Connection, execute_statement};
use crate::error::{SqlError, SqlResult};
use crate::row::{FromRow, Row};
use std::fmt;

/// Executor bound to a single leased connection with an open transaction.
pub struct Transaction<'a, Conn: Connection> {
    conn: &'a mut Conn,
}

impl<'a, Conn: Connection> Transaction<'a, Conn> {
    pub(crate) fn new(conn: &'a mut Conn) -> Self {
        Self { conn }
    }

    /// Execute a statement inside the transaction.
    pub async fn run<S>(&mut self, statement: &S) -> SqlResult<Vec<Row>>
    where
        S: fmt::Display + Sync + ?Sized,
    {
        let sql = statement.to_string();
        execute_statement(&mut *self.conn, &sql).await
    }

    pub async fn execute_raw(&mut self, sql: &str) -> SqlResult<Vec<Row>> {
        self.run(sql).await
    }

    /// Execute a statement and map all rows.
    pub async fn fetch_all<T, S>(&mut self, statement: &S) -> SqlResult<Vec<T>>
    where
        T: FromRow,
        S: fmt::Display + Sync + ?Sized,
    {
        self.run(statement).await?.iter().map(T::from_row).collect()
    }

    /// Execute a statement and map the first row.
    pub async fn fetch_one<T, S>(&mut self, statement: &S) -> SqlResult<T>
    where
        T: FromRow,
        S: fmt::Display + Sync + ?Sized,
    {
        match self.run(statement).await?.first() {
            Some(row) => T::from_row(row),
            None => Err(SqlError::not_found("query returned no rows")),
        }
    }

    pub(crate) async fn commit(&mut self) -> SqlResult<()> {
        execute_statement(&mut *self.conn, "COMMIT").await.map(|_| ())
    }
}

impl<Conn: Connection> fmt::Debug for Transaction<'_, Conn> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}
