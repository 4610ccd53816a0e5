//! Domain errors for the migration commands.

use thiserror::Error;

use super::models::ConnectionProperty;

/// Connection settings could not be turned into a usable descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing {0} in the environment variables")]
    MissingField(ConnectionProperty),

    #[error("Database connection settings are invalid or results in malformed connection URL: {0}")]
    InvalidUrl(String),
}

/// Command arguments rejected before any runner call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("--times must be greater than 0")]
    InvalidRevertCount,
}

/// Failures reported by the migration runner or connection client.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Migration {migration} failed: {message}")]
    Execution { migration: String, message: String },

    #[error("Unable to find migration: {0}")]
    MigrationNotFound(String),

    #[error("Migration was not executed: {0}")]
    NotExecuted(String),

    #[error("Invalid migration file {path}: {reason}")]
    InvalidMigrationFile { path: String, reason: String },

    #[error("Failed to read migrations: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RunnerError {
    fn from(err: sqlx::Error) -> Self {
        RunnerError::Database(err.to_string())
    }
}

/// Domain-level errors that can occur while running a migration command.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Runner(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ConfigurationError::MissingField(ConnectionProperty::Host);
        assert_eq!(err.to_string(), "Missing DB_HOST in the environment variables");
    }

    #[test]
    fn test_invalid_url_message() {
        let err = ConfigurationError::InvalidUrl("sqlite://x".to_string());
        assert_eq!(
            err.to_string(),
            "Database connection settings are invalid or results in malformed connection URL: sqlite://x"
        );
    }

    #[test]
    fn test_domain_error_is_transparent() {
        let err: DomainError = ValidationError::InvalidRevertCount.into();
        assert_eq!(err.to_string(), "--times must be greater than 0");
    }
}
