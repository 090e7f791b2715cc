//! Error types for sqlchain

use thiserror::Error;

/// Error type returned by database drivers.
///
/// The execution layer never inspects it; it is carried through unchanged so
/// callers can downcast to the driver's native error.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for sqlchain operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for query construction and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// Malformed condition object (unknown operator, bad payload shape)
    #[error("Condition error: {0}")]
    Condition(String),

    /// A statement failed inside the driver
    #[error("Execution error: {source}")]
    Execution {
        sql: String,
        #[source]
        source: DriverError,
    },

    /// ROLLBACK failed after a transaction error; the connection was discarded
    #[error("Rollback failed: {source} (original error: {original})")]
    Rollback {
        original: String,
        #[source]
        source: DriverError,
    },

    /// Connection pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Column or row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid or missing configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create a condition error
    pub fn condition(message: impl Into<String>) -> Self {
        Self::Condition(message.into())
    }

    /// Create an execution error for a failed statement
    pub fn execution(sql: impl Into<String>, source: DriverError) -> Self {
        Self::Execution {
            sql: sql.into(),
            source,
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }

    /// Check if this is a rollback error
    pub fn is_rollback(&self) -> bool {
        matches!(self, Self::Rollback { .. })
    }

    /// The statement text that failed, if this is an execution error.
    pub fn statement(&self) -> Option<&str> {
        match self {
            Self::Execution { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// The underlying driver error, if any.
    pub fn driver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Execution { source, .. } | Self::Rollback { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl<E: std::fmt::Display> From<deadpool::managed::PoolError<E>> for SqlError {
    fn from(err: deadpool::managed::PoolError<E>) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<deadpool::managed::BuildError> for SqlError {
    fn from(err: deadpool::managed::BuildError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_keeps_statement_and_source() {
        let err = SqlError::execution("SELECT 1", "boom".into());
        assert!(err.is_execution());
        assert_eq!(err.statement(), Some("SELECT 1"));
        assert_eq!(err.driver_error().map(|e| e.to_string()), Some("boom".to_string()));
        assert_eq!(err.to_string(), "Execution error: boom");
    }

    #[test]
    fn rollback_error_mentions_original() {
        let err = SqlError::Rollback {
            original: "deadlock".into(),
            source: "connection reset".into(),
        };
        assert!(err.is_rollback());
        assert_eq!(
            err.to_string(),
            "Rollback failed: connection reset (original error: deadlock)"
        );
    }
}
