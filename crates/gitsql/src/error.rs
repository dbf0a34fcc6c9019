//! Error types for gitsql.

use thiserror::Error;

/// Result type for gitsql operations.
pub type Result<T> = std::result::Result<T, GitsqlError>;

#[derive(Error, Debug)]
pub enum GitsqlError {
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Failed to open repository {path}: {source}")]
    RepositoryOpen {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to resolve history tip: {0}")]
    HistoryResolution(#[source] git2::Error),

    #[error("Failed to compute diff statistics: {0}")]
    DiffComputation(#[source] git2::Error),

    #[error("Invalid table declaration: {0}")]
    SchemaDeclaration(String),

    #[error("Cursor used after close")]
    CursorClosed,

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Unknown preset query: {0}")]
    UnknownPreset(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<GitsqlError> for rusqlite::Error {
    /// Virtual table callbacks can only report `rusqlite::Error`; SQL errors
    /// pass through, everything else becomes a module error carrying the message.
    fn from(err: GitsqlError) -> Self {
        match err {
            GitsqlError::Sql(e) => e,
            other => rusqlite::Error::ModuleError(other.to_string()),
        }
    }
}
