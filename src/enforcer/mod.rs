//! Schema enforcer
//!
//! Ensures one collection exists with the schema's validator attached, using
//! validation level `strict` and validation action `error`.
//!
//! # Flow
//!
//! 1. Resolve the mode (`TEST` | `PROD`) and the connection string; both are
//!    checked before any client is built
//! 2. Connect and select the mode's database
//! 3. List collection names
//! 4. `collMod` if the collection exists, `create` otherwise
//! 5. Report which branch was taken
//!
//! Running twice with the same schema leaves the same validator in place.
//! Stored documents are never touched.

mod admin;
mod config;
mod enforce;
mod errors;
mod memory;
mod mode;
mod mongo;

pub use admin::{
    command_document, AdminError, AdminResult, CollectionAdmin, CollectionState, CommandKind,
    Connector,
};
pub use config::{
    redact_uri, Banner, EnforcerConfig, Target, ValidationAction, ValidationLevel,
    ValidationPolicy,
};
pub use enforce::{enforce, enforce_target, inspect, EnforcementReport, InspectionReport, Outcome};
pub use errors::{EnforceError, EnforceResult, ErrorKind};
pub use memory::{MemoryAdmin, MemoryServer};
pub use mode::AppMode;
pub use mongo::{state_from_list_reply, MongoAdmin, MongoConnector};
