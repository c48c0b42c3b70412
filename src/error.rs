//! Error model shared by every engine operation.
//!
//! Driver failures are wrapped with the table (or procedure) they concern so
//! the caller can show a readable message and let the user retry. Nothing is
//! retried or swallowed here.

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The connection could not be established or is no longer usable.
    #[error("connection error: {message}")]
    Connection { message: String },

    /// A catalog (`information_schema`) query failed.
    #[error("schema query failed for `{table}`: {message}")]
    SchemaQueryFailed { table: String, message: String },

    #[error("read failed for `{table}`: {message}")]
    ReadFailed { table: String, message: String },

    /// `target` is a table name, or a procedure name for procedure calls.
    #[error("write failed for `{target}`: {message}")]
    WriteFailed { target: String, message: String },

    #[error("table `{0}` does not exist in the current schema")]
    UnknownTable(String),

    #[error("column `{column}` does not exist in table `{table}`")]
    UnknownColumn { table: String, column: String },

    #[error("procedure `{0}` does not exist in the current schema")]
    UnknownProcedure(String),

    #[error("invalid input for `{target}`: {message}")]
    InvalidInput { target: String, message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Stable, serializable classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConnectionError,
    SchemaQueryFailed,
    ReadFailed,
    WriteFailed,
    UnknownTable,
    UnknownColumn,
    UnknownProcedure,
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConnectionError => "connection_error",
            ErrorKind::SchemaQueryFailed => "schema_query_failed",
            ErrorKind::ReadFailed => "read_failed",
            ErrorKind::WriteFailed => "write_failed",
            ErrorKind::UnknownTable => "unknown_table",
            ErrorKind::UnknownColumn => "unknown_column",
            ErrorKind::UnknownProcedure => "unknown_procedure",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Connection { .. } => ErrorKind::ConnectionError,
            EngineError::SchemaQueryFailed { .. } => ErrorKind::SchemaQueryFailed,
            EngineError::ReadFailed { .. } => ErrorKind::ReadFailed,
            EngineError::WriteFailed { .. } => ErrorKind::WriteFailed,
            EngineError::UnknownTable(_) => ErrorKind::UnknownTable,
            EngineError::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            EngineError::UnknownProcedure(_) => ErrorKind::UnknownProcedure,
            EngineError::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn connection(err: impl std::fmt::Display) -> Self {
        EngineError::Connection {
            message: err.to_string(),
        }
    }

    pub fn schema(table: &str, err: sqlx::Error) -> Self {
        classify(err, |message| EngineError::SchemaQueryFailed {
            table: table.to_string(),
            message,
        })
    }

    pub fn read(table: &str, err: sqlx::Error) -> Self {
        classify(err, |message| EngineError::ReadFailed {
            table: table.to_string(),
            message,
        })
    }

    pub fn write(target: &str, err: sqlx::Error) -> Self {
        classify(err, |message| EngineError::WriteFailed {
            target: target.to_string(),
            message,
        })
    }

    pub fn invalid_input(target: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            target: target.to_string(),
            message: message.into(),
        }
    }
}

/// Transport-level driver failures are fatal to the connection whatever the
/// operation was; everything else is attributed to the operation.
fn classify(err: sqlx::Error, otherwise: impl FnOnce(String) -> EngineError) -> EngineError {
    if is_connection_failure(&err) {
        EngineError::connection(err)
    } else {
        otherwise(err.to_string())
    }
}

pub fn is_connection_failure(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::WorkerCrashed
    )
}
