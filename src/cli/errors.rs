//! CLI-specific error types
//!
//! Every CLI error ends the run with a non-zero exit status.

use std::fmt;
use std::io;

use crate::enforcer::EnforceError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Settings file could not be read or parsed
    SettingsError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Enforcement failed; carries the enforcer's code
    Enforce(&'static str),
    /// Document rejected by the local validator
    DocumentRejected,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SettingsError => "COLLGUARD_CLI_SETTINGS_ERROR",
            Self::IoError => "COLLGUARD_CLI_IO_ERROR",
            Self::Enforce(code) => code,
            Self::DocumentRejected => "COLLGUARD_CLI_DOCUMENT_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn settings_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SettingsError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn document_rejected(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DocumentRejected, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<EnforceError> for CliError {
    fn from(e: EnforceError) -> Self {
        Self::new(CliErrorCode::Enforce(e.code()), e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::document_rejected(e.message())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
