//! Typed failures for the data-access layer and the recipe client. Store
//! errors keep the underlying `rusqlite::Error` as their source so callers can
//! log the engine message verbatim.

use std::path::PathBuf;

use rusqlite::Error as SqlError;
use thiserror::Error;

/// Result alias used by every store operation.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file is missing or the engine refused to open it. Fatal
    /// for everything that depends on the connection holder.
    #[error("failed to open database at {}: {message}", .path.display())]
    Connection {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<SqlError>,
    },

    /// The holder was closed before the operation ran.
    #[error("database connection is closed")]
    Closed,

    /// A fixed query failed to compile. Our statements are static, so this
    /// points at a broken schema rather than bad input.
    #[error("failed to prepare {context}")]
    Prepare {
        context: &'static str,
        #[source]
        source: SqlError,
    },

    /// Parameter arity or type mismatch while binding.
    #[error("failed to bind parameters for {context}")]
    Bind {
        context: &'static str,
        #[source]
        source: SqlError,
    },

    /// The statement ran but did not complete.
    #[error("failed to {context}")]
    Exec {
        context: &'static str,
        #[source]
        source: SqlError,
    },

    /// Rejected before any SQL ran.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    pub(crate) fn connection(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        StoreError::Connection {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn rejected(path: impl Into<PathBuf>, source: SqlError) -> Self {
        StoreError::Connection {
            path: path.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn prepare(context: &'static str, source: SqlError) -> Self {
        StoreError::Prepare { context, source }
    }

    /// Classify a failure raised after preparation. Binding problems surface
    /// from rusqlite as dedicated variants; everything else happened while
    /// stepping the statement.
    pub(crate) fn exec(context: &'static str, source: SqlError) -> Self {
        match source {
            SqlError::InvalidParameterCount(..)
            | SqlError::InvalidParameterName(_)
            | SqlError::ToSqlConversionFailure(_) => StoreError::Bind { context, source },
            source => StoreError::Exec { context, source },
        }
    }
}

#[derive(Debug, Error)]
pub enum RecipeError {
    /// Transport failure or a non-success HTTP status.
    #[error("recipe request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not have the expected `hits[].recipe` shape.
    #[error("unexpected recipe response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Caught before sending anything: bad base URL or missing credentials.
    #[error("recipe API is misconfigured: {0}")]
    Config(String),
}
