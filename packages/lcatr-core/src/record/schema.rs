//! Static record schema declarations.

use serde::Serialize;

use super::builder::RecordBuilder;
use super::Record;
use crate::types::TypeDescriptor;

/// Shape of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Header-only record; always the first record of a file
    Primary,
    /// Binary table record
    Table,
    /// Binary table of (path, SHA-1) pairs checked against disk
    FileRefs,
}

/// Declaration of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Keyword (at most 8 characters)
    pub name: &'static str,
    pub ty: TypeDescriptor,
    /// Short comment written next to the value
    pub comment: &'static str,
    /// Longer human-readable description
    pub description: &'static str,
}

impl FieldDef {
    pub const fn new(
        name: &'static str,
        ty: TypeDescriptor,
        comment: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            comment,
            description,
        }
    }
}

/// Declaration of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: TypeDescriptor,
    pub description: &'static str,
}

impl ColumnDef {
    pub const fn new(name: &'static str, ty: TypeDescriptor, description: &'static str) -> Self {
        Self {
            name,
            ty,
            description,
        }
    }
}

/// Fields every record carries ahead of its declared ones.
pub static BASELINE_FIELDS: [FieldDef; 2] = [
    FieldDef::new(
        "EXTNAME",
        TypeDescriptor::Str,
        "FITS name of the HDU",
        "Canonical name of the record type",
    ),
    FieldDef::new(
        "EXTVER",
        TypeDescriptor::Int16,
        "Version of the HDU",
        "Version of the schema used by this record",
    ),
];

/// A record type: canonical name, required fields, and required columns.
///
/// Schemas are declared as `static` items and referenced by records and
/// the registry for the life of the program.
#[derive(Debug, PartialEq)]
pub struct RecordSchema {
    /// Canonical name, stored as `EXTNAME`
    pub name: &'static str,
    pub kind: RecordKind,
    /// Required fields beyond the baseline
    pub fields: &'static [FieldDef],
    /// Required columns (empty for primary records)
    pub columns: &'static [ColumnDef],
    /// Field values applied before any caller-supplied keyword
    pub presets: &'static [(&'static str, &'static str)],
}

impl RecordSchema {
    pub const fn primary(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            name,
            kind: RecordKind::Primary,
            fields,
            columns: &[],
            presets: &[],
        }
    }

    pub const fn table(name: &'static str, columns: &'static [ColumnDef]) -> Self {
        Self {
            name,
            kind: RecordKind::Table,
            fields: &[],
            columns,
            presets: &[],
        }
    }

    pub fn is_tabular(&self) -> bool {
        self.kind != RecordKind::Primary
    }

    /// Baseline fields followed by the declared ones.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        BASELINE_FIELDS.iter().chain(self.fields.iter())
    }

    /// Lower-cased name used as the registry key.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// A record with baseline fields and presets filled in and nothing else.
    pub fn instantiate(&'static self) -> Record {
        self.builder().build()
    }

    /// Starts building a record of this type.
    pub fn builder(&'static self) -> RecordBuilder {
        RecordBuilder::new(self)
    }
}
