use thiserror::Error;

/// Failures raised by a [`DocumentStore`](crate::database::DocumentStore) or an accessor on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not encode or decode document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("document {path}/{id} does not exist")]
    NotFound { path: String, id: String },

    #[error("invalid collection path {0:?}")]
    InvalidPath(String),

    #[error("document {path}/{id} is not a JSON object")]
    Malformed { path: String, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Cross-field problems found in a form payload before it is submitted.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Missing { field: &'static str },

    #[error("question {question}: correct option {index} is out of bounds for {options} options")]
    CorrectOptionOutOfBounds {
        question: usize,
        index: i64,
        options: usize,
    },

    #[error("question {question} needs at least two options")]
    TooFewOptions { question: usize },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("access denied: {email} has role {role}")]
    NotAuthorized { email: String, role: String },

    #[error("role lookup failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage path {0:?}")]
    InvalidPath(String),

    #[error("no file stored at {0:?}")]
    NotFound(String),
}
