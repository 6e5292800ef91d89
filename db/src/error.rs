//! Error types for the Tally data layer.

use thiserror::Error;

/// All possible errors from credential resolution, pool setup, and migrations.
#[derive(Debug, Error)]
pub enum Error {
    // Credential errors
    #[error("secret \"{name}\" not found in Secrets Manager, check the secret name and AWS region")]
    SecretNotFound { name: String },

    #[error("access denied to secret \"{name}\", check IAM permissions for Secrets Manager")]
    AccessDenied { name: String },

    #[error("malformed secret payload: {0}")]
    MalformedSecret(String),

    #[error("incomplete credentials: missing or empty field '{field}'")]
    IncompleteCredentials { field: &'static str },

    #[error("secrets manager request failed: {0}")]
    SecretStore(String),

    // Connection errors
    #[error("failed to initialize database connection: {0}")]
    ConnectionInitFailed(#[source] sqlx::Error),

    #[error("database pool not initialized, call initialize() first")]
    NotInitialized,

    // Migration errors
    #[error("migration {file} failed: {source}")]
    MigrationFailed {
        file: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to read migrations directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for data-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::SecretNotFound {
            name: "rds-db-credentials".into(),
        };
        assert!(err.to_string().contains("\"rds-db-credentials\" not found"));

        let err = Error::IncompleteCredentials { field: "password" };
        assert_eq!(
            err.to_string(),
            "incomplete credentials: missing or empty field 'password'"
        );

        let err = Error::NotInitialized;
        assert!(err.to_string().contains("call initialize() first"));
    }
}
