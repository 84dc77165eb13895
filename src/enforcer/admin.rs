//! Database administration seam
//!
//! The enforcer only needs four server interactions: connect + ping, list
//! collection names, run an administrative command and read one
//! collection's options. Everything else in the driver stays behind these
//! traits.

use mongodb::bson::Document;
use thiserror::Error;

use super::config::{ValidationAction, ValidationLevel, ValidationPolicy};

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

/// Failure reported by an admin implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// Server unreachable or the client could not be built
    #[error("{0}")]
    Connection(String),

    /// Credentials lack the privilege for the command
    #[error("{0}")]
    Unauthorized(String),

    /// Server executed and refused the command
    #[error("{0}")]
    Command(String),
}

/// Opens an admin handle on one database
pub trait Connector {
    type Admin: CollectionAdmin;

    /// Builds a client for `uri`, selects `database` and verifies the server
    /// answers.
    fn connect(&self, uri: &str, database: &str) -> AdminResult<Self::Admin>;
}

/// Administrative operations on the selected database
pub trait CollectionAdmin {
    fn list_collection_names(&self) -> AdminResult<Vec<String>>;

    /// Runs a database command and returns the server reply
    fn run_command(&self, command: Document) -> AdminResult<Document>;

    /// Reads the options of one collection, `None` if it does not exist
    fn collection_state(&self, name: &str) -> AdminResult<Option<CollectionState>>;
}

/// Validation options of a collection as stored by the server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    pub validator: Option<Document>,
    pub validation_level: Option<String>,
    pub validation_action: Option<String>,
}

impl CollectionState {
    /// Reads the validation fields out of a `listCollections` options document
    pub fn from_options(options: &Document) -> Self {
        Self {
            validator: options.get_document("validator").ok().cloned(),
            validation_level: options.get_str("validationLevel").ok().map(String::from),
            validation_action: options.get_str("validationAction").ok().map(String::from),
        }
    }

    /// Level and action in effect. Absent options mean the server defaults
    /// (`strict`, `error`).
    pub fn policy(&self) -> Option<ValidationPolicy> {
        let level = match self.validation_level.as_deref() {
            Some(value) => ValidationLevel::from_option(value)?,
            None => ValidationLevel::Strict,
        };
        let action = match self.validation_action.as_deref() {
            Some(value) => ValidationAction::from_option(value)?,
            None => ValidationAction::Error,
        };
        Some(ValidationPolicy { level, action })
    }
}

/// The two commands the enforcer may issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `create`: new collection with the validator attached
    Create,
    /// `collMod`: replace the validator of an existing collection
    Modify,
}

impl CommandKind {
    pub fn command_name(&self) -> &'static str {
        match self {
            CommandKind::Create => "create",
            CommandKind::Modify => "collMod",
        }
    }
}

/// Builds the `create` or `collMod` command document.
///
/// The command name must be the first key.
pub fn command_document(
    kind: CommandKind,
    collection: &str,
    validator: Document,
    policy: ValidationPolicy,
) -> Document {
    let mut command = Document::new();
    command.insert(kind.command_name(), collection);
    command.insert("validator", validator);
    command.insert("validationLevel", policy.level.as_str());
    command.insert("validationAction", policy.action.as_str());
    command
}
