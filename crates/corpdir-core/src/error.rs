//! Error types for the company directory.

use thiserror::Error;

/// Result type alias using the directory's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for directory operations.
///
/// Duplicate language registrations never reach this type: the registry
/// resolves them against the unique constraint and carries on.
#[derive(Error, Debug)]
pub enum Error {
    /// Store operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Company, tag or tag group not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Structurally empty or malformed input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bulk import file could not be read
    #[error("Import error: {0}")]
    Import(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a unique-constraint violation reported by the store.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("company 'Acme'".to_string());
        assert_eq!(err.to_string(), "Not found: company 'Acme'");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("names must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: names must not be empty");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("PORT is not a number".to_string());
        assert_eq!(err.to_string(), "Configuration error: PORT is not a number");
    }

    #[test]
    fn test_error_display_import() {
        let err = Error::Import("row 3: missing column".to_string());
        assert_eq!(err.to_string(), "Import error: row 3: missing column");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        let err = Error::Database(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation());
        assert!(!Error::NotFound("x".to_string()).is_unique_violation());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
