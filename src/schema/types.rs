//! Schema type definitions
//!
//! Supported BSON types:
//! - int: 32-bit signed integer
//! - long: 64-bit signed integer
//! - double: 64-bit floating point
//! - string: UTF-8 string
//! - bool: Boolean
//! - array: Array, optionally with a single element type
//! - object: Embedded document
//! - null: Explicit null

use std::collections::HashSet;
use std::fmt;

use mongodb::bson::{doc, Bson, Document};

use super::errors::{SchemaError, SchemaResult};

/// BSON type aliases as accepted by `$jsonSchema`'s `bsonType` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType {
    Int,
    Long,
    Double,
    String,
    Bool,
    Array,
    Object,
    Null,
}

impl BsonType {
    /// Returns the alias used by the server
    pub fn as_str(&self) -> &'static str {
        match self {
            BsonType::Int => "int",
            BsonType::Long => "long",
            BsonType::Double => "double",
            BsonType::String => "string",
            BsonType::Bool => "bool",
            BsonType::Array => "array",
            BsonType::Object => "object",
            BsonType::Null => "null",
        }
    }

    /// Returns true if the value has exactly this BSON type
    pub fn matches(&self, value: &Bson) -> bool {
        matches!(
            (self, value),
            (BsonType::Int, Bson::Int32(_))
                | (BsonType::Long, Bson::Int64(_))
                | (BsonType::Double, Bson::Double(_))
                | (BsonType::String, Bson::String(_))
                | (BsonType::Bool, Bson::Boolean(_))
                | (BsonType::Array, Bson::Array(_))
                | (BsonType::Object, Bson::Document(_))
                | (BsonType::Null, Bson::Null)
        )
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the server alias for the type of any BSON value
pub fn bson_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::Double(_) => "double",
        Bson::Decimal128(_) => "decimal",
        Bson::String(_) => "string",
        Bson::Boolean(_) => "bool",
        Bson::Array(_) => "array",
        Bson::Document(_) => "object",
        Bson::Null => "null",
        Bson::ObjectId(_) => "objectId",
        Bson::DateTime(_) => "date",
        Bson::Timestamp(_) => "timestamp",
        Bson::Binary(_) => "binData",
        Bson::RegularExpression(_) => "regex",
        _ => "unsupported",
    }
}

/// Field definition: the set of allowed types plus an optional element type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Allowed BSON types, in declaration order
    pub bson_types: Vec<BsonType>,
    /// Element type for array values
    pub items: Option<BsonType>,
}

impl FieldDef {
    /// A field accepting exactly one type
    pub fn of(bson_type: BsonType) -> Self {
        Self {
            bson_types: vec![bson_type],
            items: None,
        }
    }

    /// A field accepting any of several types
    pub fn any_of(bson_types: &[BsonType]) -> Self {
        Self {
            bson_types: bson_types.to_vec(),
            items: None,
        }
    }

    /// A string field
    pub fn string() -> Self {
        Self::of(BsonType::String)
    }

    /// An integer field accepting both 32-bit and 64-bit representations
    pub fn integer() -> Self {
        Self::any_of(&[BsonType::Int, BsonType::Long])
    }

    /// An array whose elements all have `element_type`
    pub fn array_of(element_type: BsonType) -> Self {
        Self::of(BsonType::Array).with_items(element_type)
    }

    /// An array of `element_type`, or null
    pub fn nullable_array_of(element_type: BsonType) -> Self {
        Self::any_of(&[BsonType::Array, BsonType::Null]).with_items(element_type)
    }

    /// Sets the array element type
    pub fn with_items(mut self, element_type: BsonType) -> Self {
        self.items = Some(element_type);
        self
    }

    /// Returns true if `bson_type` is one of the allowed types
    pub fn accepts(&self, bson_type: BsonType) -> bool {
        self.bson_types.contains(&bson_type)
    }

    /// Human-readable list of allowed types, e.g. `int|long`
    pub fn type_list(&self) -> String {
        self.bson_types
            .iter()
            .map(BsonType::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Renders this field as a `$jsonSchema` property
    pub fn to_property(&self) -> Document {
        let bson_type = match self.bson_types.as_slice() {
            [single] => Bson::String(single.as_str().to_string()),
            many => Bson::Array(
                many.iter()
                    .map(|t| Bson::String(t.as_str().to_string()))
                    .collect(),
            ),
        };

        let mut property = doc! { "bsonType": bson_type };
        if let Some(items) = self.items {
            property.insert("items", doc! { "bsonType": items.as_str() });
        }
        property
    }
}

/// Complete schema definition for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Collection the schema is written for
    pub name: String,
    /// Field definitions, in declaration order
    pub fields: Vec<(String, FieldDef)>,
    /// Names of fields that must be present
    pub required: Vec<String>,
    /// Whether fields beyond the declared set are allowed
    pub additional_properties: bool,
}

impl Schema {
    /// Create a schema that allows no undeclared fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }

    /// Declare an optional field
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    /// Declare a required field
    pub fn required_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.fields.push((name, def));
        self
    }

    /// Allow or forbid undeclared fields
    pub fn allow_additional(mut self, allow: bool) -> Self {
        self.additional_properties = allow;
        self
    }

    /// Looks up a field definition by name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, def)| def)
    }

    /// Returns true if the field must be present
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> SchemaResult<()> {
        if self.get("_id").is_none() {
            return Err(SchemaError::malformed(&self.name, "schema must define an '_id' field"));
        }

        let mut seen = HashSet::new();
        for (name, def) in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::malformed(
                    &self.name,
                    format!("field '{}' is declared more than once", name),
                ));
            }
            if def.bson_types.is_empty() {
                return Err(SchemaError::malformed(
                    &self.name,
                    format!("field '{}' must allow at least one type", name),
                ));
            }
            if def.items.is_some() && !def.accepts(BsonType::Array) {
                return Err(SchemaError::malformed(
                    &self.name,
                    format!("field '{}' declares items but does not accept arrays", name),
                ));
            }
        }

        for name in &self.required {
            if self.get(name).is_none() {
                return Err(SchemaError::malformed(
                    &self.name,
                    format!("required field '{}' is not declared", name),
                ));
            }
        }

        Ok(())
    }

    /// Renders the `$jsonSchema` body
    pub fn to_json_schema(&self) -> Document {
        let mut properties = Document::new();
        for (name, def) in &self.fields {
            properties.insert(name.clone(), def.to_property());
        }

        doc! {
            "bsonType": "object",
            "required": self.required.clone(),
            "properties": properties,
            "additionalProperties": self.additional_properties,
        }
    }

    /// Renders the full validator document passed to `create` / `collMod`
    pub fn validator(&self) -> Document {
        doc! { "$jsonSchema": self.to_json_schema() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn sample_schema() -> Schema {
        Schema::new("posts")
            .required_field("_id", FieldDef::integer())
            .required_field("title", FieldDef::string())
            .field("tags", FieldDef::array_of(BsonType::String))
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_schema_missing_id_field() {
        let schema = Schema::new("posts").required_field("title", FieldDef::string());
        let err = schema.validate_structure().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaMalformed);
        assert_eq!(err.schema_name(), Some("posts"));
        assert!(err.message().contains("_id"));
    }

    #[test]
    fn test_required_field_must_be_declared() {
        let mut schema = sample_schema();
        schema.required.push("author".into());
        let err = schema.validate_structure().unwrap_err();
        assert!(err.message().contains("author"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = sample_schema().field("title", FieldDef::string());
        assert!(schema.validate_structure().unwrap_err().message().contains("more than once"));
    }

    #[test]
    fn test_items_require_array_type() {
        let schema = sample_schema().field("bad", FieldDef::string().with_items(BsonType::Int));
        assert!(schema.validate_structure().unwrap_err().message().contains("bad"));
    }

    #[test]
    fn test_single_type_renders_as_string() {
        let property = FieldDef::string().to_property();
        assert_eq!(property.get_str("bsonType").unwrap(), "string");
        assert!(!property.contains_key("items"));
    }

    #[test]
    fn test_multi_type_renders_as_array() {
        let property = FieldDef::nullable_array_of(BsonType::String).to_property();
        let types = property.get_array("bsonType").unwrap();
        assert_eq!(types, &vec![Bson::from("array"), Bson::from("null")]);
        let items = property.get_document("items").unwrap();
        assert_eq!(items.get_str("bsonType").unwrap(), "string");
    }

    #[test]
    fn test_json_schema_shape() {
        let body = sample_schema().to_json_schema();
        assert_eq!(body.get_str("bsonType").unwrap(), "object");
        assert!(!body.get_bool("additionalProperties").unwrap());
        assert_eq!(
            body.get_array("required").unwrap(),
            &vec![Bson::from("_id"), Bson::from("title")]
        );

        let properties = body.get_document("properties").unwrap();
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["_id", "title", "tags"]);
    }

    #[test]
    fn test_validator_wraps_json_schema() {
        let schema = sample_schema();
        let validator = schema.validator();
        assert_eq!(
            validator.get_document("$jsonSchema").unwrap(),
            &schema.to_json_schema()
        );
    }

    #[test]
    fn test_type_matching_is_exact() {
        assert!(BsonType::Int.matches(&Bson::Int32(1)));
        assert!(!BsonType::Int.matches(&Bson::Int64(1)));
        assert!(!BsonType::Long.matches(&Bson::Double(1.0)));
        assert!(BsonType::Null.matches(&Bson::Null));
        assert_eq!(bson_type_name(&Bson::Double(1.5)), "double");
    }

    #[test]
    fn test_type_list() {
        assert_eq!(FieldDef::integer().type_list(), "int|long");
    }
}
