//! Container-level error types.

use thiserror::Error;

/// Errors raised by the container layer: structure, encoding, and I/O.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContainerError {
    /// A mandatory structural keyword is absent
    #[error("Missing mandatory keyword '{keyword}'")]
    MissingKeyword { keyword: String },

    /// A keyword is malformed or carries an unexpected value
    #[error("Keyword '{keyword}' invalid: {message}")]
    InvalidKeyword { keyword: String, message: String },

    /// A table cell does not fit its column format
    #[error("Column '{column}' row {row}: {message}")]
    InvalidCell {
        column: String,
        row: usize,
        message: String,
    },

    /// Columns of one table disagree on the row count
    #[error("Column '{column}' has {len} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        len: usize,
        expected: usize,
    },

    /// Column format code outside the supported subset
    #[error("Unsupported column format '{0}'")]
    UnsupportedFormat(String),

    /// Unit ordering or composition is wrong
    #[error("Structure error: {0}")]
    Structure(String),

    /// Byte stream could not be decoded
    #[error("Decode error at byte {offset}: {message}")]
    Decode { offset: usize, message: String },

    /// Stored data checksum disagrees with the data read
    #[error("Data checksum mismatch in unit {index}: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        index: usize,
        stored: u32,
        computed: u32,
    },

    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Disk full while writing
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// Any other I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}
