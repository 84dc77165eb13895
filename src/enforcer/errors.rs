//! # Enforcement Errors

use thiserror::Error;

/// Result type for enforcement operations
pub type EnforceResult<T> = Result<T, EnforceError>;

/// Error category, so callers can branch without matching every variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected before any I/O
    Configuration,
    /// Server unreachable, authentication or authorization failed
    Connectivity,
    /// Server refused the administrative command
    ServerRejection,
}

/// Enforcement errors. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnforceError {
    #[error("Invalid APP_MODE={0}. Expected TEST or PROD.")]
    InvalidMode(String),

    #[error("MONGO_URI not provided. Set MONGO_URI or pass --uri.")]
    MissingConnectionString,

    /// Rendered `SchemaError`, code included
    #[error("{0}")]
    MalformedSchema(String),

    #[error("Failed to connect to {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    #[error("Not authorized to run {command} on {namespace}: {message}")]
    Unauthorized {
        command: String,
        namespace: String,
        message: String,
    },

    #[error("Server rejected {command} on {namespace}: {message}")]
    Rejected {
        command: String,
        namespace: String,
        message: String,
    },
}

impl EnforceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnforceError::InvalidMode(_)
            | EnforceError::MissingConnectionString
            | EnforceError::MalformedSchema(_) => ErrorKind::Configuration,
            EnforceError::Connection { .. } | EnforceError::Unauthorized { .. } => {
                ErrorKind::Connectivity
            }
            EnforceError::Rejected { .. } => ErrorKind::ServerRejection,
        }
    }

    /// Stable error code for scripts
    pub fn code(&self) -> &'static str {
        match self {
            EnforceError::InvalidMode(_) => "COLLGUARD_INVALID_MODE",
            EnforceError::MissingConnectionString => "COLLGUARD_MISSING_URI",
            EnforceError::MalformedSchema(_) => "COLLGUARD_MALFORMED_SCHEMA",
            EnforceError::Connection { .. } => "COLLGUARD_CONNECTION_FAILED",
            EnforceError::Unauthorized { .. } => "COLLGUARD_UNAUTHORIZED",
            EnforceError::Rejected { .. } => "COLLGUARD_COMMAND_REJECTED",
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
