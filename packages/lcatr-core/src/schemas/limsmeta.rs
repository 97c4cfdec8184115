//! LIMS metadata file: test identity, software provenance, and the
//! result and auxiliary files a test produced.

use super::{FileSchema, TEST_PRIMARY_FIELDS};
use crate::record::{file_refs, ColumnDef, RecordSchema};
use crate::types::TypeDescriptor;

pub static LIMS_META_PRIMARY: RecordSchema =
    RecordSchema::primary("LimsMeta", TEST_PRIMARY_FIELDS);

pub static SOFTWARE_TABLE: RecordSchema = RecordSchema::table(
    "SoftwareTable",
    &[
        ColumnDef::new("CommitHash", TypeDescriptor::Sha1, "Git commit hash of the software"),
        ColumnDef::new("CommitTag", TypeDescriptor::Str, "Git tag of the commit"),
        ColumnDef::new("RepoURL", TypeDescriptor::Str, "URL of the software repository"),
        ColumnDef::new("ProgPath", TypeDescriptor::Str, "Path of the program that was run"),
        ColumnDef::new("CmdLine", TypeDescriptor::Str, "Command line used to run the program"),
        ColumnDef::new("ExitCode", TypeDescriptor::Int16, "Exit code of the program"),
    ],
);

pub static RESULT_FILES: RecordSchema = file_refs(
    "ResultFiles",
    &[("FILEDESC", "Files produced by the test")],
);

pub static AUXILIARY_FILES: RecordSchema = file_refs(
    "AuxiliaryFiles",
    &[("FILEDESC", "Auxiliary files used by the test")],
);

pub static LIMS_META: FileSchema = FileSchema {
    name: "LimsMeta",
    records: &[
        &LIMS_META_PRIMARY,
        &SOFTWARE_TABLE,
        &RESULT_FILES,
        &AUXILIARY_FILES,
    ],
};
