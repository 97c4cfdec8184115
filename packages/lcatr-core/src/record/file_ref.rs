//! File-reference records: (path, SHA-1) pairs checked against disk.

use super::schema::{ColumnDef, FieldDef, RecordKind, RecordSchema};
use super::Record;
use crate::error::SchemaError;
use crate::locator::FileLocator;
use crate::types::{Digest, TypeDescriptor, Value};

const NAME_COLUMN: &str = "FileName";
const HASH_COLUMN: &str = "SHA1Hash";

pub const FILE_REF_FIELDS: &[FieldDef] = &[FieldDef::new(
    "FILEDESC",
    TypeDescriptor::Str,
    "File collection description",
    "Description of the collection of referenced files",
)];

pub const FILE_REF_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new(
        NAME_COLUMN,
        TypeDescriptor::Str,
        "A file path relative to $CCDTEST_ROOT",
    ),
    ColumnDef::new(
        HASH_COLUMN,
        TypeDescriptor::Sha1,
        "A SHA1 digest of the file contents",
    ),
];

/// Declares a file-reference record type.
pub const fn file_refs(
    name: &'static str,
    presets: &'static [(&'static str, &'static str)],
) -> RecordSchema {
    RecordSchema {
        name,
        kind: RecordKind::FileRefs,
        fields: FILE_REF_FIELDS,
        columns: FILE_REF_COLUMNS,
        presets,
    }
}

impl Record {
    fn require_file_refs(&self) -> Result<(), SchemaError> {
        if self.kind() == RecordKind::FileRefs {
            Ok(())
        } else {
            Err(SchemaError::NotFileReference {
                record: self.name().to_string(),
            })
        }
    }

    /// Referenced paths, one per row.
    pub fn file_names(&self) -> Result<Vec<&str>, SchemaError> {
        self.require_file_refs()?;
        let column = self.column(NAME_COLUMN)?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.as_str().ok_or_else(|| SchemaError::TypeMismatch {
                    field: format!("{}[{}]", NAME_COLUMN, row),
                    expected: TypeDescriptor::Str.name(),
                    got: value.kind().to_string(),
                })
            })
            .collect()
    }

    /// Recomputes the hash of every referenced file and overwrites the
    /// hash column with the results.
    pub fn generate(&mut self, locator: &FileLocator) -> Result<(), SchemaError> {
        let hashes = self
            .file_names()?
            .into_iter()
            .map(|name| locator.digest(name))
            .collect::<Result<Vec<Digest>, _>>()?;
        tracing::info!(
            "Record {}: generated {} file hashes",
            self.name(),
            hashes.len()
        );
        self.set_column_array(HASH_COLUMN, hashes)
    }

    /// Compares every stored hash with the current file contents.
    pub(crate) fn verify_hashes(&self, locator: &FileLocator) -> Result<(), SchemaError> {
        let names = self.file_names()?;
        let hashes = &self.column(HASH_COLUMN)?.values;
        for (name, stored) in names.into_iter().zip(hashes) {
            let computed = locator.digest(name)?.to_hex();
            let stored = match stored {
                Value::Digest(d) => d.to_hex(),
                other => TypeDescriptor::Sha1.serialize(other),
            };
            if computed != stored {
                tracing::warn!(
                    "Record {}: hash mismatch for '{}': {} != {}",
                    self.name(),
                    name,
                    computed,
                    stored
                );
                return Err(SchemaError::HashMismatch {
                    record: self.name().to_string(),
                    path: name.to_string(),
                    computed,
                    stored,
                });
            }
        }
        Ok(())
    }
}
