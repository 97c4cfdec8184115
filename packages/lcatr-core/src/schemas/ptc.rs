//! Photon transfer curve (linearity) analysis results.

use super::{FileSchema, TEST_PRIMARY_FIELDS};
use crate::record::{file_refs, ColumnDef, RecordSchema};
use crate::types::TypeDescriptor;

const fn per_amp(name: &'static str, description: &'static str) -> ColumnDef {
    ColumnDef::new(name, TypeDescriptor::Float32, description)
}

pub static PTC_PRIMARY: RecordSchema = RecordSchema::primary("PtcPrimary", TEST_PRIMARY_FIELDS);

pub static PTC_INPUT_FILES: RecordSchema = file_refs(
    "PtcInputFiles",
    &[("FILEDESC", "Input files for the PTC analysis")],
);

pub static PTC_AMP_TABLE: RecordSchema = RecordSchema::table(
    "PtcAmpTable",
    &[
        per_amp("LinearGain", "Linear gain measurement"),
        per_amp("MedianGain", "Gain from median method"),
        per_amp("OverScanNoise", "Noise from overscan method"),
        per_amp("StdDevNoise", "Noise from standard deviation"),
        per_amp("FullWell", "Point at which the gain curve blows up"),
        per_amp("LinearRangeMin", "Min where response is in linear range"),
        per_amp("LinearRangeMax", "Max where response is in linear range"),
        per_amp("PRNUTotalWhite", "Total photo response nonuniformity, white light"),
        per_amp("PRNUTotalMid", "Total photo response nonuniformity, mid range"),
        per_amp("PRNUCorrectedWhite", "Corrected photo response nonuniformity, white light"),
        per_amp("PRNUCorrectedMid", "Corrected photo response nonuniformity, mid range"),
        per_amp("LinRangeMin", "Minimum ADU in which CCD stays within linear specs"),
        per_amp("LinRangeMax", "Maximum ADU in which CCD stays within linear specs"),
        per_amp("LinearResponse", "Maximum deviation from linear response in full range"),
    ],
);

pub static PTC_COLD_SPOT_TABLE: RecordSchema =
    RecordSchema::table("PtcColdSpotTable", super::coldspot::COLD_SPOT_COLUMNS);

pub static PHOTON_TRANSFER_CURVE: FileSchema = FileSchema {
    name: "PhotonTransferCurve",
    records: &[
        &PTC_PRIMARY,
        &PTC_INPUT_FILES,
        &PTC_AMP_TABLE,
        &PTC_COLD_SPOT_TABLE,
    ],
};
