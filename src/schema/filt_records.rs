//! Embedded schema for `FILT_RECORDS` fetal-monitoring records

use super::types::{BsonType, FieldDef, Schema};

/// Name of the collection the schema is enforced on
pub const FILT_RECORDS: &str = "FILT_RECORDS";

/// Builds the `FILT_RECORDS` schema.
///
/// Every field is required and no undeclared field is allowed. `fmov` may be
/// null when the monitor recorded no fetal movement channel.
pub fn filt_records_schema() -> Schema {
    Schema::new(FILT_RECORDS)
        .required_field("_id", FieldDef::integer())
        .required_field("mobile", FieldDef::string())
        .required_field("start_test_ts", FieldDef::string())
        .required_field("measurement_date", FieldDef::string())
        .required_field("uc", FieldDef::array_of(BsonType::String))
        .required_field("fhr", FieldDef::array_of(BsonType::String))
        .required_field("fmov", FieldDef::nullable_array_of(BsonType::String))
        .required_field("gest_age", FieldDef::integer())
        .required_field("origin", FieldDef::string())
        .required_field("sql_utime", FieldDef::string())
        .required_field("ctime", FieldDef::string())
        .required_field("utime", FieldDef::string())
        .required_field("doc_hash", FieldDef::string())
        .allow_additional(false)
}
