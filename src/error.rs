//! Error handling for the Bible study service
//!
//! Backend failures are `StoreError`; everything the services can raise is
//! wrapped in `BibleError`. Most read paths never surface these to users:
//! the search dispatcher and the Strong's resolver degrade to empty results
//! or raw-identifier fallbacks and only log the error.

use thiserror::Error;

/// Errors raised by a backend store
#[derive(Error, Debug)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid backend row in '{table}': {message}")]
    Decode { table: String, message: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn decode(table: &str, message: impl Into<String>) -> Self {
        StoreError::Decode {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

/// Main error type for the service layer
#[derive(Error, Debug)]
pub enum BibleError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid Strong's number '{0}'")]
    InvalidStrongsNumber(String),

    #[error("Invalid verse key '{0}': expected <Book>.<Chapter>.<Verse>")]
    InvalidVerseKey(String),

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BibleError {
    pub fn not_found(what: impl Into<String>) -> Self {
        BibleError::NotFound { what: what.into() }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for service operations
pub type BibleResult<T> = Result<T, BibleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = BibleError::InvalidStrongsNumber("X".to_string());
        assert_eq!(err.to_string(), "Invalid Strong's number 'X'");

        let err: BibleError = StoreError::decode("books", "unknown testament 'mid'").into();
        assert_eq!(
            err.to_string(),
            "Store error: Invalid backend row in 'books': unknown testament 'mid'"
        );
        assert_eq!(
            BibleError::not_found("Lexicon entry H85").to_string(),
            "Lexicon entry H85 not found"
        );
    }
}
