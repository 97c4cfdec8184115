//! The closed catalog of field types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::value::{Digest, Value};
use crate::container::{CardValue, Cell, ColumnFormat};
use crate::error::SchemaError;

/// Canonical timestamp layout for datetime fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Abstract field type.
///
/// Each variant maps to one container column format and one value
/// predicate. Unknown type names are rejected by [`TypeDescriptor::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Int16,
    Int32,
    Int64,
    Float32,
    Sha1,
    Str,
    DateTime,
}

impl TypeDescriptor {
    /// Every catalog entry.
    pub const ALL: [TypeDescriptor; 7] = [
        TypeDescriptor::Int16,
        TypeDescriptor::Int32,
        TypeDescriptor::Int64,
        TypeDescriptor::Float32,
        TypeDescriptor::Sha1,
        TypeDescriptor::Str,
        TypeDescriptor::DateTime,
    ];

    /// Catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Int16 => "int16",
            TypeDescriptor::Int32 => "int32",
            TypeDescriptor::Int64 => "int64",
            TypeDescriptor::Float32 => "float32",
            TypeDescriptor::Sha1 => "sha1",
            TypeDescriptor::Str => "str",
            TypeDescriptor::DateTime => "datetime",
        }
    }

    /// Looks up a catalog entry by name.
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| SchemaError::UnknownType {
                type_name: name.to_string(),
            })
    }

    /// Container column format used to store values of this type.
    pub fn container_format(&self) -> ColumnFormat {
        match self {
            TypeDescriptor::Int16 => ColumnFormat::Int16,
            TypeDescriptor::Int32 => ColumnFormat::Int32,
            TypeDescriptor::Int64 => ColumnFormat::Int64,
            TypeDescriptor::Float32 => ColumnFormat::Float32,
            TypeDescriptor::Sha1 | TypeDescriptor::Str => ColumnFormat::Ascii(64),
            TypeDescriptor::DateTime => ColumnFormat::Ascii(86),
        }
    }

    /// Infers the type of a stored column that no schema declares.
    pub fn for_format(format: ColumnFormat) -> Self {
        match format {
            ColumnFormat::Int16 => TypeDescriptor::Int16,
            ColumnFormat::Int32 => TypeDescriptor::Int32,
            ColumnFormat::Int64 => TypeDescriptor::Int64,
            ColumnFormat::Float32 => TypeDescriptor::Float32,
            ColumnFormat::Ascii(_) => TypeDescriptor::Str,
        }
    }

    /// Name of the Rust type values of this type are held as.
    pub fn runtime_type(&self) -> &'static str {
        match self {
            TypeDescriptor::Int16 => "i16",
            TypeDescriptor::Int32 => "i32",
            TypeDescriptor::Int64 => "i64",
            TypeDescriptor::Float32 => "f32",
            TypeDescriptor::Sha1 => "Digest",
            TypeDescriptor::Str => "String",
            TypeDescriptor::DateTime => "NaiveDateTime",
        }
    }

    /// Returns true if `value` is acceptable for this type.
    ///
    /// Digests may also be given as 40-character hex strings and datetimes
    /// as canonical timestamp strings, which is how both come back from disk.
    pub fn is_instance(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeDescriptor::Int16, Value::Int(v)) => i16::try_from(*v).is_ok(),
            (TypeDescriptor::Int32, Value::Int(v)) => i32::try_from(*v).is_ok(),
            (TypeDescriptor::Int64, Value::Int(_)) => true,
            (TypeDescriptor::Float32, Value::Float(v)) => {
                v.is_finite() && v.abs() <= f64::from(f32::MAX)
            }
            (TypeDescriptor::Sha1, Value::Digest(_)) => true,
            (TypeDescriptor::Sha1, Value::Str(s)) => Digest::from_hex(s).is_some(),
            (TypeDescriptor::Str, Value::Str(_)) => true,
            (TypeDescriptor::DateTime, Value::Timestamp(_)) => true,
            (TypeDescriptor::DateTime, Value::Str(s)) => {
                NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).is_ok()
            }
            _ => false,
        }
    }

    /// Canonical string form of a value.
    pub fn serialize(&self, value: &Value) -> String {
        match (self, value) {
            (_, Value::Digest(d)) => d.to_hex(),
            (_, Value::Timestamp(t)) => t.format(TIMESTAMP_FORMAT).to_string(),
            (TypeDescriptor::Sha1, Value::Str(s)) => s.to_ascii_lowercase(),
            (_, other) => other.to_string(),
        }
    }

    /// Canonicalizes an input value at construction time.
    ///
    /// Only datetime values change: they are stored as their canonical string.
    pub fn wash(&self, value: Value) -> Value {
        match (self, value) {
            (TypeDescriptor::DateTime, Value::Timestamp(t)) => {
                Value::Str(t.format(TIMESTAMP_FORMAT).to_string())
            }
            (_, value) => value,
        }
    }

    /// Lifts a value read from storage into the richest form for this type.
    ///
    /// Input the type cannot interpret is returned untouched so that
    /// validation reports it.
    pub fn deserialize(&self, raw: Value) -> Value {
        match (self, raw) {
            (TypeDescriptor::Sha1, Value::Str(s)) => match Digest::from_hex(&s) {
                Some(d) => Value::Digest(d),
                None => Value::Str(s),
            },
            (TypeDescriptor::Float32, Value::Int(v)) => Value::Float(v as f64),
            (_, raw) => raw,
        }
    }

    /// Header card representation of an optional value; unset is the empty string.
    pub(crate) fn to_card_value(&self, value: Option<&Value>) -> CardValue {
        match value {
            None => CardValue::Str(String::new()),
            Some(Value::Int(v)) => CardValue::Int(*v),
            Some(Value::Float(v)) => CardValue::Float(*v),
            Some(other) => CardValue::Str(self.serialize(other)),
        }
    }

    /// Table cell representation of a value.
    pub(crate) fn to_cell(&self, value: &Value) -> Cell {
        match value {
            Value::Int(v) => Cell::Int(*v),
            Value::Float(v) => Cell::Float(*v),
            other => Cell::Str(self.serialize(other)),
        }
    }

    /// Value read back from a header card.
    pub(crate) fn from_card_value(&self, raw: &CardValue) -> Value {
        let value = match raw {
            CardValue::Int(v) => Value::Int(*v),
            CardValue::Float(v) => Value::Float(*v),
            CardValue::Str(s) => Value::Str(s.clone()),
            CardValue::Logical(b) => Value::Str(if *b { "T" } else { "F" }.to_string()),
        };
        self.deserialize(value)
    }

    /// Value read back from a table cell.
    pub(crate) fn from_cell(&self, cell: &Cell) -> Value {
        let value = match cell {
            Cell::Int(v) => Value::Int(*v),
            Cell::Float(v) => Value::Float(*v),
            Cell::Str(s) => Value::Str(s.clone()),
        };
        self.deserialize(value)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeDescriptor {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
