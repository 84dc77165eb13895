//! Schema definitions for collguard
//!
//! A schema is declared once in Rust, rendered to a `$jsonSchema` validator
//! for the server, and can check documents locally with the same rules.
//!
//! # Design Principles
//!
//! - Field declaration order is preserved in the rendered validator
//! - Type matching is exact, no coercion
//! - Undeclared fields are rejected unless explicitly allowed

mod errors;
mod filt_records;
mod fingerprint;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use filt_records::{filt_records_schema, FILT_RECORDS};
pub use fingerprint::{
    fingerprint, fingerprint_fields, verify_doc_hash, BOOKKEEPING_FIELDS, HASH_FIELD,
};
pub use types::{bson_type_name, BsonType, FieldDef, Schema};
pub use validator::{document_from_json, SchemaValidator};
