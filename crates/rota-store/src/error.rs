use thiserror::Error;

/// Errors that can occur at the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry with this name already exists (names are unique).
    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    /// No entry with the given id.
    #[error("entry not found: {id}")]
    NotFound { id: i64 },

    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Reading or writing the JSON document file failed.
    #[error("document I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON document on disk is not valid.
    #[error("document corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A persisted date column holds something that is not ISO-8601.
    #[error("unparseable date in store: {0}")]
    BadDate(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
