//! Content fingerprint stored in `doc_hash`
//!
//! SHA-1 over the record's content fields, rendered as key-sorted JSON with
//! four-space indentation and `\uXXXX` escapes for every non-ASCII
//! character. Writers that upsert records compute the same digest, so a
//! record whose stored `doc_hash` disagrees was edited after it was hashed.

use std::io;

use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{bson_type_name, Schema};

/// Field holding the stored fingerprint
pub const HASH_FIELD: &str = "doc_hash";

/// Identity and bookkeeping fields, never part of the fingerprint
pub const BOOKKEEPING_FIELDS: [&str; 4] = ["_id", HASH_FIELD, "ctime", "utime"];

/// Declared fields that contribute to the fingerprint, in declaration order
pub fn fingerprint_fields(schema: &Schema) -> Vec<&str> {
    schema
        .fields
        .iter()
        .map(|(name, _)| name.as_str())
        .filter(|name| !BOOKKEEPING_FIELDS.contains(name))
        .collect()
}

/// Computes the fingerprint of `document` over `fields`.
///
/// Fields absent from the document are skipped.
pub fn fingerprint(document: &Document, fields: &[&str]) -> SchemaResult<String> {
    let mut content = Map::new();
    for name in fields {
        if let Some(value) = document.get(*name) {
            content.insert((*name).to_string(), value.clone().into_relaxed_extjson());
        }
    }

    let mut blob = Vec::with_capacity(512);
    let mut serializer = serde_json::Serializer::with_formatter(&mut blob, AsciiPretty::new());
    sorted(Value::Object(content))
        .serialize(&mut serializer)
        .map_err(|e| SchemaError::invalid_input(format!("failed to render fingerprint: {}", e)))?;

    let mut hasher = Sha1::new();
    hasher.update(&blob);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Recomputes the fingerprint and compares it with the stored `doc_hash`.
///
/// Returns the digest when they agree.
pub fn verify_doc_hash(schema: &Schema, document: &Document) -> SchemaResult<String> {
    let digest = fingerprint(document, &fingerprint_fields(schema))?;

    let stored = match document.get(HASH_FIELD) {
        Some(Bson::String(stored)) if *stored == digest => return Ok(digest),
        Some(Bson::String(stored)) => stored.clone(),
        Some(other) => bson_type_name(other).to_string(),
        None => "missing".to_string(),
    };

    Err(SchemaError::hash_mismatch(
        &schema.name,
        ValidationDetails::new(HASH_FIELD, digest, stored),
    ))
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

/// Four-space pretty printer that escapes non-ASCII as UTF-16 `\uXXXX`
struct AsciiPretty<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiPretty<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl Formatter for AsciiPretty<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}
