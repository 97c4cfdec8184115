//! Gain/noise/cold-spot file tests.

use ntest::timeout;
use tempfile::tempdir;

use lcatr_core::schemas::coldspot::{flatten, ColdSpotGroup};
use lcatr_core::schemas::{
    COLD_SPOT, GAINS, GAIN_NOISE_COLD_SPOT, GNC_INPUT_FILES, GNC_PRIMARY, NOISES,
};
use lcatr_core::{FileLocator, Record, ResultFile, SchemaError, SchemaRegistry};

use super::helpers::{locator_for, test_time, write_inputs};

fn gnc_file(files: &[String], locator: &FileLocator) -> ResultFile {
    let primary = GNC_PRIMARY
        .builder()
        .set("testname", "gain_noise")
        .set("date_obs", test_time())
        .set("username", "ccdtester")
        .build();
    let mut inputs = GNC_INPUT_FILES
        .builder()
        .set("filedesc", "Bias and flat pairs")
        .column("filename", files.iter().map(String::as_str))
        .build();
    inputs.generate(locator).unwrap();
    let gains = GAINS
        .builder()
        .column("LinGains", [4.8f32, 4.9, 5.0, 5.1])
        .column("MedGains", [4.7f32, 4.8, 5.0, 5.2])
        .build();
    let noises = NOISES
        .builder()
        .column("OvScNois", [6.1f32, 6.0, 5.9, 6.3])
        .column("SdevNois", [6.5f32, 6.4, 6.2, 6.6])
        .build();
    let spots = flatten(&[
        ColdSpotGroup {
            amp: 2,
            pixel_count: 12,
            spots: vec![(210, 1500), (44, 80)],
        },
        ColdSpotGroup {
            amp: 4,
            pixel_count: 3,
            spots: vec![(512, 1024)],
        },
    ]);
    let cold = spots.fill(COLD_SPOT.builder()).build();
    ResultFile::new(vec![primary, inputs, gains, noises, cold])
}

#[timeout(1000)]
#[test]
fn test_gnc_primary_required_fields() {
    let fresh: Record = GNC_PRIMARY.instantiate();
    assert_eq!(
        fresh.validate().unwrap_err(),
        SchemaError::MissingField {
            record: "GainNoiseColdSpot".to_string(),
            field: "TESTNAME".to_string()
        }
    );

    let filled = GNC_PRIMARY
        .builder()
        .set("testname", "gain_noise")
        .set("date_obs", test_time())
        .set("username", "ccdtester")
        .build();
    assert!(filled.validate().is_ok());
}

#[timeout(1000)]
#[test]
fn test_gnc_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let files = write_inputs(dir.path(), &["bias.fits", "flat_a.fits", "flat_b.fits"]);
    let locator = locator_for(dir.path());
    let file = gnc_file(&files, &locator);

    GAIN_NOISE_COLD_SPOT.check_composition(&file)?;
    file.validate_all_with(&locator)?;

    let path = dir.path().join("gnc_result.fits");
    file.write(&path)?;

    let registry = SchemaRegistry::with_builtin()?;
    let read = ResultFile::read(&path, &registry)?;
    assert_eq!(read, file);
    GAIN_NOISE_COLD_SPOT.check_composition(&read)?;
    read.validate_all_with(&locator)?;

    let cold = read.record("coldspot").unwrap();
    assert_eq!(cold.rows(), 3);
    assert_eq!(cold.column("PixCount")?.values[0].as_int(), Some(6));
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_gnc_tampered_input_detected_after_read() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &["bias.fits", "flat_a.fits"]);
    let locator = locator_for(dir.path());
    let path = dir.path().join("gnc_result.fits");
    gnc_file(&files, &locator).write(&path).unwrap();

    std::fs::write(dir.path().join("flat_a.fits"), b"overwritten").unwrap();

    let registry = SchemaRegistry::with_builtin().unwrap();
    let read = ResultFile::read(&path, &registry).unwrap();
    match read.validate_all_with(&locator) {
        Err(SchemaError::HashMismatch { record, path, .. }) => {
            assert_eq!(record, "FileRefs");
            assert_eq!(path, "flat_a.fits");
        }
        other => panic!("expected hash mismatch, got {:?}", other),
    }
}

#[timeout(1000)]
#[test]
fn test_validate_all_stops_at_first_failure() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &["bias.fits"]);
    let locator = locator_for(dir.path());
    let mut file = gnc_file(&files, &locator);

    file.record_mut("Gains")
        .unwrap()
        .set_column_array("MedGains", Vec::<f32>::new())
        .unwrap();
    file.record_mut("Noises")
        .unwrap()
        .set_column_array("SdevNois", Vec::<f32>::new())
        .unwrap();

    assert!(matches!(
        file.validate_all_with(&locator),
        Err(SchemaError::ContainerFormat { ref record, .. }) if record == "Gains"
    ));
}
