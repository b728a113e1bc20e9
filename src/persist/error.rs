//! Persistence error types
//!
//! - **`SledError`**: errors from the embedded sled database
//! - **`DecodeError`** / **`EncodeError`**: bincode failures on stored values
//! - **`Poisoned`**: the in-memory store's lock was poisoned by a panic

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding stored value: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding value: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    #[error("Store lock poisoned")]
    Poisoned,
}
