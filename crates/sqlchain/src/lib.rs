//! # sqlchain
//!
//! A composable MySQL query builder with a pooled, transaction-aware
//! execution layer.
//!
//! ## Features
//!
//! - **Escaped by construction**: identifiers are backtick-quoted and
//!   literals escaped before they reach statement text
//! - **Immutable builders**: every chained call returns a new [`Query`], so
//!   partial queries are safe to reuse as sub-queries
//! - **Typed conditions**: [`Condition`] is a tagged tree compiled by an
//!   exhaustive match, with a strict JSON reader for `$or`/`$in`-style objects
//! - **Driver agnostic**: [`Database`] pools any [`Connector`] and guarantees
//!   connection release and rollback on every error path
//!
//! ## Query Builder (qb)
//!
//! ```
//! use sqlchain::{Condition, Record, expr, select, update};
//!
//! let q = select()
//!     .all()
//!     .from("users")
//!     .where_(Condition::new().eq("status", "active").like("email", "%@example.com"))
//!     .limit(10);
//! assert_eq!(
//!     q.to_string(),
//!     "SELECT * FROM `users` WHERE (`status` = 'active' AND `email` LIKE '%@example.com') LIMIT 10"
//! );
//!
//! let q = update()
//!     .table("users")
//!     .set(&Record::new().set("seen_at", expr::now()))
//!     .where_(Condition::new().eq("id", 1));
//! assert_eq!(q.to_string(), "UPDATE `users` SET `seen_at` = now() WHERE `id` = 1");
//! ```
//!
//! ## Execution
//!
//! ```ignore
//! let db = Database::from_config(connector, &DatabaseConfig::from_env()?)?;
//!
//! let users: Vec<User> = db.fetch_all(&select().all().from("users")).await?;
//!
//! db.transaction(|tx| {
//!     Box::pin(async move {
//!         tx.run(&debit).await?;
//!         tx.run(&credit).await?;
//!         Ok::<_, SqlError>(())
//!     })
//! })
//! .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod escape;
pub mod pool;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod transaction;
pub mod value;

pub use client::{Connection, Connector};
pub use config::{DatabaseConfig, PoolConfig, ReleaseMode};
pub use error::{DriverError, SqlError, SqlResult};
pub use pool::{Database, PoolStatus};
pub use row::{FromRow, FromValue, Row};
pub use transaction::Transaction;
pub use value::Value;

// Re-export qb module for easy access
pub use qb::expr;
pub use qb::{
    Condition, Direction, Expression, Field, JoinKind, Operand, OrderItem, Query, Record, Verb,
    delete, insert, select, update,
};
