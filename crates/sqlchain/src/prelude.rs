//! Convenient imports for typical `sqlchain` usage.
//!
//! ```ignore
//! use sqlchain::prelude::*;
//! ```

pub use crate::{
    Condition, Connection, Connector, Database, DatabaseConfig, Direction, Expression, FromRow,
    OrderItem, PoolConfig, Query, Record, ReleaseMode, Row, SqlError, SqlResult, Transaction,
    Value, delete, expr, insert, select, update,
};
