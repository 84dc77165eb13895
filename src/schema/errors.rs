//! Schema error types
//!
//! Error codes:
//! - COLLGUARD_SCHEMA_MALFORMED
//! - COLLGUARD_SCHEMA_VALIDATION_FAILED
//! - COLLGUARD_SCHEMA_INPUT_INVALID
//! - COLLGUARD_SCHEMA_HASH_MISMATCH

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema definition is structurally invalid
    SchemaMalformed,
    /// Document violates schema
    SchemaValidationFailed,
    /// Input could not be read as a document
    SchemaInputInvalid,
    /// Stored `doc_hash` does not match the document content
    SchemaHashMismatch,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaMalformed => "COLLGUARD_SCHEMA_MALFORMED",
            SchemaErrorCode::SchemaValidationFailed => "COLLGUARD_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::SchemaInputInvalid => "COLLGUARD_SCHEMA_INPUT_INVALID",
            SchemaErrorCode::SchemaHashMismatch => "COLLGUARD_SCHEMA_HASH_MISMATCH",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "uc.3")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema_name: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an error for a structurally invalid schema definition
    pub fn malformed(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = schema_name.into();
        Self {
            code: SchemaErrorCode::SchemaMalformed,
            message: format!("Malformed schema '{}': {}", name, reason.into()),
            schema_name: Some(name),
            details: None,
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(schema_name: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::SchemaValidationFailed,
            message: format!("Document validation failed: {}", details),
            schema_name: Some(schema_name.into()),
            details: Some(details),
        }
    }

    /// Create an error for a document whose `doc_hash` is stale
    pub fn hash_mismatch(schema_name: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::SchemaHashMismatch,
            message: format!("doc_hash mismatch: computed {}, stored {}", details.expected, details.actual),
            schema_name: Some(schema_name.into()),
            details: Some(details),
        }
    }

    /// Create an error for input that is not a document
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SchemaInputInvalid,
            message: format!("Invalid document input: {}", reason.into()),
            schema_name: None,
            details: None,
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
