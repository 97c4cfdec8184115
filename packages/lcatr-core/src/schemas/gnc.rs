//! Gain, noise, and cold-spot test results.

use super::{FileSchema, TEST_PRIMARY_FIELDS};
use crate::record::{file_refs, ColumnDef, RecordSchema};
use crate::types::TypeDescriptor;

pub static GNC_PRIMARY: RecordSchema =
    RecordSchema::primary("GainNoiseColdSpot", TEST_PRIMARY_FIELDS);

pub static GNC_INPUT_FILES: RecordSchema = file_refs("FileRefs", &[]);

pub static GAINS: RecordSchema = RecordSchema::table(
    "Gains",
    &[
        ColumnDef::new("LinGains", TypeDescriptor::Float32, "Per-amplifier linear gain"),
        ColumnDef::new("MedGains", TypeDescriptor::Float32, "Per-amplifier median gain"),
    ],
);

pub static NOISES: RecordSchema = RecordSchema::table(
    "Noises",
    &[
        ColumnDef::new("OvScNois", TypeDescriptor::Float32, "Per-amplifier overscan noise"),
        ColumnDef::new("SdevNois", TypeDescriptor::Float32, "Per-amplifier standard deviation noise"),
    ],
);

pub static COLD_SPOT: RecordSchema =
    RecordSchema::table("ColdSpot", super::coldspot::COLD_SPOT_COLUMNS);

pub static GAIN_NOISE_COLD_SPOT: FileSchema = FileSchema {
    name: "GainNoiseColdSpot",
    records: &[&GNC_PRIMARY, &GNC_INPUT_FILES, &GAINS, &NOISES, &COLD_SPOT],
};
