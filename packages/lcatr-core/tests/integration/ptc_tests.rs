//! Photon transfer curve file tests.

use ntest::timeout;
use tempfile::tempdir;

use lcatr_core::schemas::coldspot::{flatten, ColdSpotGroup};
use lcatr_core::schemas::{
    PHOTON_TRANSFER_CURVE, PTC_AMP_TABLE, PTC_COLD_SPOT_TABLE, PTC_INPUT_FILES, PTC_PRIMARY,
};
use lcatr_core::{ResultFile, SchemaError, SchemaRegistry};

use super::helpers::{locator_for, test_time, write_inputs};

fn amp_table() -> lcatr_core::Record {
    let mut builder = PTC_AMP_TABLE.builder();
    for (i, column) in PTC_AMP_TABLE.columns.iter().enumerate() {
        let base = i as f32;
        builder = builder.column(column.name, (0..16).map(|amp| base + amp as f32 * 0.5));
    }
    builder.build()
}

#[timeout(1000)]
#[test]
fn test_ptc_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let files = write_inputs(dir.path(), &["ptc_000.fits", "ptc_001.fits"]);
    let locator = locator_for(dir.path());

    let mut file = PHOTON_TRANSFER_CURVE.instantiate();
    *file.record_mut("PtcPrimary").unwrap() = PTC_PRIMARY
        .builder()
        .set("testname", "ptc")
        .set("date-obs", test_time())
        .set("username", "ccdtester")
        .build();
    let inputs = file.record_mut("PtcInputFiles").unwrap();
    inputs.set_column_array("FileName", files.iter().map(String::as_str))?;
    inputs.generate(&locator)?;
    *file.record_mut("PtcAmpTable").unwrap() = amp_table();
    let spots = flatten(&[ColdSpotGroup {
        amp: 7,
        pixel_count: 9,
        spots: vec![(3, 4)],
    }]);
    *file.record_mut("PtcColdSpotTable").unwrap() = spots.fill(PTC_COLD_SPOT_TABLE.builder()).build();

    file.validate_all_with(&locator)?;
    let path = dir.path().join("ptc.fits");
    file.write(&path)?;

    let read = ResultFile::read(&path, &SchemaRegistry::with_builtin()?)?;
    PHOTON_TRANSFER_CURVE.check_composition(&read)?;
    read.validate_all_with(&locator)?;
    assert_eq!(read.record("ptcamptable").unwrap().rows(), 16);
    assert_eq!(
        read.record("PtcInputFiles")
            .unwrap()
            .field_value("FILEDESC")
            .and_then(|v| v.as_str()),
        Some("Input files for the PTC analysis")
    );
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_ptc_amp_table_missing_column() {
    let mut builder = PTC_AMP_TABLE.builder();
    for column in PTC_AMP_TABLE.columns.iter().skip(1) {
        builder = builder.column(column.name, [1.0f32]);
    }
    let record = builder.build();
    assert!(matches!(
        record.validate(),
        Err(SchemaError::ContainerFormat { .. })
    ));
}

#[timeout(1000)]
#[test]
fn test_ptc_input_files_need_rows() {
    let record = PTC_INPUT_FILES.instantiate();
    assert_eq!(
        record.validate().unwrap_err(),
        SchemaError::EmptyTable {
            record: "PtcInputFiles".to_string()
        }
    );
}
