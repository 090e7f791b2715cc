//! Driver traits the execution layer is generic over.
//!
//! sqlchain does not speak the MySQL wire protocol itself. A driver crate (or
//! a test double) implements [`Connector`] to open connections and
//! [`Connection`] to run statement text on one of them; [`Database`] pools
//! the connections and owns the release and transaction protocol.
//!
//! [`Database`]: crate::Database

use crate::error::{DriverError, SqlError, SqlResult};
use crate::row::Row;
use async_trait::async_trait;

/// One open database connection.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Execute a complete statement and return its result rows.
    ///
    /// Statements without a result set return an empty vector.
    async fn execute(&mut self, sql: &str) -> Result<Vec<Row>, DriverError>;
}

/// Factory for [`Connection`]s, owned by the pool.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    /// Open a new connection.
    async fn connect(&self) -> Result<Self::Connection, DriverError>;

    /// Health check run before an idle connection is handed out again.
    ///
    /// Only used with [`ReleaseMode::Recycle`](crate::ReleaseMode::Recycle).
    async fn ping(&self, conn: &mut Self::Connection) -> Result<(), DriverError> {
        let _ = conn;
        Ok(())
    }
}

/// Run `sql` on `conn`, logging the statement text when the driver fails.
pub(crate) async fn execute_statement<Conn: Connection>(
    conn: &mut Conn,
    sql: &str,
) -> SqlResult<Vec<Row>> {
    tracing::trace!(target: "sqlchain.sql", sql, "executing statement");
    match conn.execute(sql).await {
        Ok(rows) => Ok(rows),
        Err(source) => {
            tracing::error!(target: "sqlchain.sql", sql, error = %source, "statement failed");
            Err(SqlError::execution(sql, source))
        }
    }
}
