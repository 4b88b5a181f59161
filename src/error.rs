use thiserror::Error;

/// Errors raised by the contact store
#[derive(Debug, Error)]
pub enum ContactError {
    /// The database could not be reached, rejected the credentials, or failed to close
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A primitive was called before `connect` or after `close`
    #[error("database connection is not open")]
    NotConnected,

    /// Malformed statement or constraint violation
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// The operation needs a client that has already been saved
    #[error("cannot {0}: client has not been saved yet")]
    State(&'static str),
}

impl ContactError {
    /// True when the store rejected a row because of a unique constraint (duplicate email)
    pub fn is_unique_violation(&self) -> bool {
        match self {
            ContactError::Query(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
