use thiserror::Error;

/// Errors that can occur during a scheduling operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `users` and `dates` lists have different lengths.
    #[error("length mismatch between users and dates: {users} vs {dates}")]
    LengthMismatch { users: usize, dates: usize },

    /// A frontend user reference could not be parsed into an id.
    #[error("invalid user reference: {0}")]
    BadUserRef(String),

    /// A date string was not in MM/DD/YYYY format.
    #[error("invalid date: {0}")]
    DateParse(String),

    /// A new user's name is blank or absent.
    #[error("user's name is empty")]
    EmptyName,

    /// The requested entry does not exist.
    #[error("user with id {id} not found")]
    NotFound { id: i64 },

    /// The store answered in a way its invariants forbid.
    #[error("inconsistent store state: {0}")]
    Inconsistent(&'static str),

    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] rota_store::StoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
