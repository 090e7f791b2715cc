//! Connection pool and statement execution.

use crate::client::{Connection, Connector, execute_statement};
use crate::config::{DatabaseConfig, PoolConfig, ReleaseMode};
use crate::error::{DriverError, SqlError, SqlResult};
use crate::row::{FromRow, Row};
use crate::transaction::Transaction;
use deadpool::managed::{self, Metrics, Object, RecycleError, RecycleResult};
use futures_util::future::BoxFuture;
use std::fmt;

/// Adapts a [`Connector`] to deadpool's manager interface.
pub(crate) struct ConnectorManager<C> {
    connector: C,
}

impl<C: Connector> managed::Manager for ConnectorManager<C> {
    type Type = C::Connection;
    type Error = DriverError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        self.connector.connect().await
    }

    async fn recycle(&self, conn: &mut Self::Type, _: &Metrics) -> RecycleResult<Self::Error> {
        self.connector
            .ping(conn)
            .await
            .map_err(RecycleError::Backend)
    }
}

type Pool<C> = managed::Pool<ConnectorManager<C>>;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub max_size: usize,
    /// Open connections, idle or leased.
    pub size: usize,
    /// Idle connections ready to be leased.
    pub available: usize,
    /// Callers waiting for a connection.
    pub waiting: usize,
}

/// An owned, bounded connection pool.
///
/// Cloning is cheap and shares the underlying pool.
///
/// ```ignore
/// let db = Database::new(MyConnector::new(url), PoolConfig::new(10))?;
/// let rows = db.run(&select().all().from("users")).await?;
/// ```
pub struct Database<C: Connector> {
    pool: Pool<C>,
    release: ReleaseMode,
}

impl<C: Connector> Clone for Database<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            release: self.release,
        }
    }
}

impl<C: Connector> fmt::Debug for Database<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("status", &self.status())
            .field("release", &self.release)
            .finish()
    }
}

impl<C: Connector> Database<C> {
    pub fn new(connector: C, config: PoolConfig) -> SqlResult<Self> {
        if config.max_size == 0 {
            return Err(SqlError::config("pool max_size must be at least 1"));
        }
        let pool = managed::Pool::builder(ConnectorManager { connector })
            .max_size(config.max_size)
            .build()?;
        Ok(Self {
            pool,
            release: config.release,
        })
    }

    pub fn from_config(connector: C, config: &DatabaseConfig) -> SqlResult<Self> {
        Self::new(connector, config.pool_config())
    }

    /// Execute one statement on a freshly leased connection.
    ///
    /// The connection is released before this returns, on success and on
    /// failure. A failing statement is logged with its text and surfaces as
    /// [`SqlError::Execution`] carrying the driver error.
    pub async fn run<S>(&self, statement: &S) -> SqlResult<Vec<Row>>
    where
        S: fmt::Display + Sync + ?Sized,
    {
        let sql = statement.to_string();
        let mut lease = self.acquire().await?;
        execute_statement(lease.connection()?, &sql).await
    }

    /// Execute plain SQL text.
    pub async fn execute_raw(&self, sql: &str) -> SqlResult<Vec<Row>> {
        self.run(sql).await
    }

    /// Execute a statement and map all rows.
    pub async fn fetch_all<T, S>(&self, statement: &S) -> SqlResult<Vec<T>>
    where
        T: FromRow,
        S: fmt::Display + Sync + ?Sized,
    {
        self.run(statement).await?.iter().map(T::from_row).collect()
    }

    /// Execute a statement and map the first row.
    ///
    /// Returns [`SqlError::NotFound`] when there are no rows.
    pub async fn fetch_one<T, S>(&self, statement: &S) -> SqlResult<T>
    where
        T: FromRow,
        S: fmt::Display + Sync + ?Sized,
    {
        self.fetch_optional(statement)
            .await?
            .ok_or_else(|| SqlError::not_found("query returned no rows"))
    }

    /// Execute a statement and map the first row, if any.
    pub async fn fetch_optional<T, S>(&self, statement: &S) -> SqlResult<Option<T>>
    where
        T: FromRow,
        S: fmt::Display + Sync + ?Sized,
    {
        self.run(statement)
            .await?
            .first()
            .map(T::from_row)
            .transpose()
    }

    /// Run `f` inside `START TRANSACTION` / `COMMIT` on one leased connection.
    ///
    /// If `f` or the `COMMIT` fails, `ROLLBACK` is sent and the original
    /// error is returned. If the rollback fails too, that failure wins as
    /// [`SqlError::Rollback`] and the connection is discarded.
    ///
    /// ```ignore
    /// db.transaction(|tx| {
    ///     Box::pin(async move {
    ///         tx.run(&debit).await?;
    ///         tx.run(&credit).await?;
    ///         Ok::<_, SqlError>(())
    ///     })
    /// })
    /// .await?;
    /// ```
    pub async fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: for<'t> FnOnce(&'t mut Transaction<'_, C::Connection>) -> BoxFuture<'t, Result<T, E>>
            + Send,
        T: Send,
        E: From<SqlError> + fmt::Display + Send,
    {
        let mut lease = self.acquire().await?;

        execute_statement(lease.connection()?, "START TRANSACTION").await?;
        lease.in_transaction = true;

        let outcome = {
            let mut tx = Transaction::new(lease.connection()?);
            match f(&mut tx).await {
                Ok(value) => tx.commit().await.map(|()| value).map_err(E::from),
                Err(err) => Err(err),
            }
        };

        match outcome {
            Ok(value) => {
                lease.in_transaction = false;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(target: "sqlchain.sql", error = %err, "rolling back transaction");
                match lease.connection()?.execute("ROLLBACK").await {
                    Ok(_) => {
                        lease.in_transaction = false;
                        Err(err)
                    }
                    Err(source) => {
                        tracing::error!(
                            target: "sqlchain.sql",
                            error = %source,
                            original = %err,
                            "rollback failed, discarding connection"
                        );
                        Err(E::from(SqlError::Rollback {
                            original: err.to_string(),
                            source,
                        }))
                    }
                }
            }
        }
    }

    pub fn status(&self) -> PoolStatus {
        let status = self.pool.status();
        PoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Shut the pool down: idle connections are dropped and pending or later
    /// acquisitions fail with [`SqlError::Pool`].
    pub fn close(&self) {
        tracing::debug!(target: "sqlchain.pool", "closing pool");
        self.pool.close();
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    async fn acquire(&self) -> SqlResult<Lease<C>> {
        let object = self.pool.get().await?;
        let lease = Lease {
            object: Some(object),
            pool: self.pool.clone(),
            release: self.release,
            in_transaction: false,
        };
        tracing::debug!(
            target: "sqlchain.pool",
            size = lease.pool.status().size,
            "connection leased"
        );
        Ok(lease)
    }
}

/// Exclusive hold on one pooled connection, released exactly once on drop.
struct Lease<C: Connector> {
    object: Option<Object<ConnectorManager<C>>>,
    pool: Pool<C>,
    release: ReleaseMode,
    /// Set between a successful START TRANSACTION and COMMIT/ROLLBACK.
    in_transaction: bool,
}

impl<C: Connector> Lease<C> {
    fn connection(&mut self) -> SqlResult<&mut C::Connection> {
        self.object
            .as_deref_mut()
            .ok_or_else(|| SqlError::Pool("connection already released".to_string()))
    }
}

impl<C: Connector> Drop for Lease<C> {
    fn drop(&mut self) {
        let Some(object) = self.object.take() else {
            return;
        };
        let destroy = self.in_transaction || self.release == ReleaseMode::Destroy;
        if destroy {
            let conn: C::Connection = Object::take(object);
            drop(conn);
        } else {
            drop(object);
        }
        tracing::debug!(
            target: "sqlchain.pool",
            destroyed = destroy,
            size = self.pool.status().size,
            "connection released"
        );
    }
}
