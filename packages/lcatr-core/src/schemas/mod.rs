//! Built-in file schemas, one per test type.

pub mod coldspot;
mod gnc;
mod limsmeta;
mod ptc;

use crate::error::SchemaError;
use crate::record::{FieldDef, Record, RecordSchema};
use crate::result_file::ResultFile;
use crate::types::TypeDescriptor;

pub use gnc::{COLD_SPOT, GAINS, GAIN_NOISE_COLD_SPOT, GNC_INPUT_FILES, GNC_PRIMARY, NOISES};
pub use limsmeta::{AUXILIARY_FILES, LIMS_META, LIMS_META_PRIMARY, RESULT_FILES, SOFTWARE_TABLE};
pub use ptc::{
    PHOTON_TRANSFER_CURVE, PTC_AMP_TABLE, PTC_COLD_SPOT_TABLE, PTC_INPUT_FILES, PTC_PRIMARY,
};

/// Header fields every test-result primary record requires.
pub(crate) const TEST_PRIMARY_FIELDS: &[FieldDef] = &[
    FieldDef::new(
        "TESTNAME",
        TypeDescriptor::Str,
        "Canonical Test Name",
        "Canonical name for the test result",
    ),
    FieldDef::new(
        "DATE-OBS",
        TypeDescriptor::DateTime,
        "Timestamp",
        "Time stamp of when test is run",
    ),
    FieldDef::new(
        "USERNAME",
        TypeDescriptor::Str,
        "User name",
        "Name of operator/analyzer performing test",
    ),
];

/// Expected composition of one kind of result file.
#[derive(Debug, PartialEq)]
pub struct FileSchema {
    pub name: &'static str,
    /// Primary schema first, then the tabular records in file order
    pub records: &'static [&'static RecordSchema],
}

impl FileSchema {
    /// Schema of the first record.
    pub fn primary(&self) -> Option<&'static RecordSchema> {
        self.records.first().copied()
    }

    pub fn secondaries(&self) -> &'static [&'static RecordSchema] {
        self.records.get(1..).unwrap_or_default()
    }

    /// A file holding one fresh record per declared schema.
    pub fn instantiate(&self) -> ResultFile {
        ResultFile::new(self.records.iter().map(|schema| schema.instantiate()).collect())
    }

    /// Checks that `file` holds exactly the declared records in order.
    pub fn check_composition(&self, file: &ResultFile) -> Result<(), SchemaError> {
        let mismatch = |message: String| SchemaError::CompositionMismatch {
            file: self.name.to_string(),
            message,
        };
        if file.records().len() != self.records.len() {
            return Err(mismatch(format!(
                "expected {} records, found {}",
                self.records.len(),
                file.records().len()
            )));
        }
        for (i, (record, schema)) in file.records().iter().zip(self.records).enumerate() {
            if !std::ptr::eq(record.schema(), *schema) {
                return Err(mismatch(format!(
                    "record {} is '{}', expected '{}'",
                    i,
                    record.name(),
                    schema.name
                )));
            }
        }
        Ok(())
    }

    /// Looks a declared record schema up by case-insensitive name.
    pub fn record_schema(&self, name: &str) -> Option<&'static RecordSchema> {
        self.records
            .iter()
            .copied()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Fresh record of one declared schema, by name.
    pub fn new_record(&self, name: &str) -> Option<Record> {
        self.record_schema(name).map(RecordSchema::instantiate)
    }
}

/// Every built-in file schema.
pub static BUILTIN_FILE_SCHEMAS: [&FileSchema; 3] =
    [&LIMS_META, &PHOTON_TRANSFER_CURVE, &GAIN_NOISE_COLD_SPOT];

#[cfg(test)]
mod tests;
