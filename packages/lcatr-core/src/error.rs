//! Schema and validation error types.

use thiserror::Error;

use crate::container::ContainerError;

/// Schema, record, and file validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A field or column lacks one of its descriptive parts or its value
    #[error("Field '{field}' not fully formed: missing {missing}")]
    IncompleteField { field: String, missing: &'static str },

    /// A value does not satisfy its field's type descriptor
    #[error("Field '{field}': type '{expected}' not compatible with {got}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        got: String,
    },

    /// Required field absent or unset
    #[error("{record}: required field '{field}' not set")]
    MissingField { record: String, field: String },

    /// Required field set to the empty string
    #[error("{record}: required field '{field}' is empty string")]
    EmptyField { record: String, field: String },

    /// Tabular record without rows
    #[error("Table record '{record}': no table data")]
    EmptyTable { record: String },

    /// Container-level structural verification failed
    #[error("Record '{record}/{name}': verify failed: {source}")]
    ContainerFormat {
        record: String,
        name: String,
        #[source]
        source: ContainerError,
    },

    /// Header field not declared by the record's schema
    #[error("Record '{record}': no field '{field}'")]
    FieldNotFound { record: String, field: String },

    /// Column referenced by name or 1-based index does not exist
    #[error("Record '{record}': no column {column}")]
    ColumnNotFound { record: String, column: String },

    /// Operation needs a file-reference record
    #[error("Record '{record}' does not hold file references")]
    NotFileReference { record: String },

    /// Referenced file could not be located or read
    #[error("Failed to take SHA1 of '{path}': {message}")]
    HashComputation { path: String, message: String },

    /// Referenced file content no longer matches its stored hash
    #[error("{record}: SHA1 hash mismatch for '{path}': {computed} != {stored}")]
    HashMismatch {
        record: String,
        path: String,
        computed: String,
        stored: String,
    },

    /// Stored record type has no registered schema
    #[error("No known schema for record '{name}'")]
    UnknownSchema { name: String },

    /// Field type name outside the type catalog
    #[error("Unknown field type '{type_name}'")]
    UnknownType { type_name: String },

    /// Schema name registered twice
    #[error("Schema '{name}' already registered")]
    DuplicateSchema { name: String },

    /// File does not hold the records its file schema declares
    #[error("File schema '{file}': {message}")]
    CompositionMismatch { file: String, message: String },

    /// Whole-file container failure (read, write, or structure)
    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl SchemaError {
    /// Returns true for errors caused by referenced-file integrity checks.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            SchemaError::HashMismatch { .. } | SchemaError::HashComputation { .. }
        )
    }
}
