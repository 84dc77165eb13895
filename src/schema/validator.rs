//! Local document validation
//!
//! Mirrors the server-side `$jsonSchema` rules for the keywords this crate
//! emits:
//! - No undeclared fields when `additionalProperties` is false
//! - All required fields are present
//! - Each value's BSON type is one of the declared types
//! - Each array element matches `items`
//!
//! The server remains the authority. This exists so a record can be checked
//! before it is written.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{bson_type_name, FieldDef, Schema};

/// Validator that checks documents against one schema.
///
/// Validation does not mutate documents and is deterministic: fields are
/// checked in declaration order and the first violation is reported.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates a document against the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` with code `COLLGUARD_SCHEMA_VALIDATION_FAILED`
    /// naming the offending field.
    pub fn validate_document(&self, document: &Document) -> SchemaResult<()> {
        if !self.schema.additional_properties {
            for key in document.keys() {
                if self.schema.get(key).is_none() {
                    return Err(self.failure(ValidationDetails::extra_field(key.as_str())));
                }
            }
        }

        for (name, def) in &self.schema.fields {
            match document.get(name) {
                Some(value) => self.validate_value(name, value, def)?,
                None if self.schema.is_required(name) => {
                    return Err(self.failure(ValidationDetails::missing_field(name.as_str())));
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Parses a JSON value and validates it.
    pub fn validate_json(&self, value: &Value) -> SchemaResult<Document> {
        let document = document_from_json(value)?;
        self.validate_document(&document)?;
        Ok(document)
    }

    fn validate_value(&self, field_path: &str, value: &Bson, def: &FieldDef) -> SchemaResult<()> {
        if !def.bson_types.iter().any(|t| t.matches(value)) {
            return Err(self.failure(ValidationDetails::type_mismatch(
                field_path,
                def.type_list(),
                bson_type_name(value),
            )));
        }

        if let (Some(items), Bson::Array(elements)) = (def.items, value) {
            for (i, element) in elements.iter().enumerate() {
                if !items.matches(element) {
                    return Err(self.failure(ValidationDetails::type_mismatch(
                        format!("{}.{}", field_path, i),
                        items.as_str(),
                        bson_type_name(element),
                    )));
                }
            }
        }

        Ok(())
    }

    fn failure(&self, details: ValidationDetails) -> SchemaError {
        SchemaError::validation_failed(&self.schema.name, details)
    }
}

/// Converts a plain JSON object into a BSON document.
///
/// Integers that fit in 32 bits become `int`, other integers become `long`,
/// and everything else numeric becomes `double`, the same mapping the
/// driver applies to native values.
pub fn document_from_json(value: &Value) -> SchemaResult<Document> {
    match json_to_bson(value) {
        Bson::Document(document) => Ok(document),
        other => Err(SchemaError::invalid_input(format!(
            "expected a JSON object, got {}",
            bson_type_name(&other)
        ))),
    }
}

fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => match i32::try_from(i) {
                Ok(small) => Bson::Int32(small),
                Err(_) => Bson::Int64(i),
            },
            None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => {
            let mut document = Document::new();
            for (key, item) in map {
                document.insert(key.clone(), json_to_bson(item));
            }
            Bson::Document(document)
        }
    }
}
