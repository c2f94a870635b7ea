use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to open database: {path}: {message}")]
    Connection { path: PathBuf, message: String },

    /// Engine diagnostic, passed through untouched for display.
    #[error("{0}")]
    Query(String),

    #[error("{0}")]
    Validation(String),

    #[error("a query is already running")]
    QueryInFlight,

    #[error("session is closed")]
    SessionClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<duckdb::Error> for AppError {
    fn from(e: duckdb::Error) -> Self {
        AppError::Query(e.to_string())
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Connection { .. } => "CONNECTION_ERROR",
            AppError::Query(_) => "QUERY_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::QueryInFlight => "QUERY_IN_FLIGHT",
            AppError::SessionClosed => "SESSION_CLOSED",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Connection-kind errors end the session; nothing else can be issued on it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Connection { .. } | AppError::SessionClosed)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_displays_engine_text_verbatim() {
        let msg = "Catalog Error: Table with name nope does not exist!";
        let e = AppError::Query(msg.to_string());
        assert_eq!(e.to_string(), msg);
        assert_eq!(e.code(), "QUERY_ERROR");
        assert!(!e.is_fatal());
    }

    #[test]
    fn connection_errors_are_fatal() {
        let e = AppError::Connection {
            path: PathBuf::from("/tmp/x.duckdb"),
            message: "not a valid DuckDB database file".into(),
        };
        assert!(e.is_fatal());
        assert!(AppError::SessionClosed.is_fatal());
        assert!(e.to_string().contains("not a valid DuckDB database file"));
    }
}
