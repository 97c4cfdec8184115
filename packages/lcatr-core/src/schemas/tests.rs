use super::coldspot::{flatten, ColdSpotGroup};
use super::*;
use crate::types::Value;
use ntest::timeout;

#[timeout(1000)]
#[test]
fn test_file_schema_shape() {
    for file in BUILTIN_FILE_SCHEMAS {
        let primary = file.primary().unwrap();
        assert!(!primary.is_tabular(), "{} primary is tabular", file.name);
        assert!(file.secondaries().iter().all(|s| s.is_tabular()));
        assert_eq!(file.secondaries().len() + 1, file.records.len());
    }
    assert_eq!(GAIN_NOISE_COLD_SPOT.primary().unwrap().name, "GainNoiseColdSpot");
    assert_eq!(PTC_AMP_TABLE.columns.len(), 14);
}

#[timeout(1000)]
#[test]
fn test_instantiate_and_composition() {
    let file = PHOTON_TRANSFER_CURVE.instantiate();
    assert_eq!(file.len(), 4);
    assert!(PHOTON_TRANSFER_CURVE.check_composition(&file).is_ok());
    assert_eq!(
        file.record("ptcinputfiles").unwrap().field_value("FILEDESC"),
        Some(&Value::from("Input files for the PTC analysis"))
    );

    let err = LIMS_META.check_composition(&file).unwrap_err();
    assert!(matches!(err, SchemaError::CompositionMismatch { ref file, .. } if file == "LimsMeta"));

    let mut reordered = GAIN_NOISE_COLD_SPOT.instantiate();
    reordered.records_mut().swap(2, 3);
    let err = GAIN_NOISE_COLD_SPOT.check_composition(&reordered).unwrap_err();
    assert!(err.to_string().contains("record 2 is 'Noises'"));
}

#[timeout(1000)]
#[test]
fn test_new_record_by_name() {
    let record = LIMS_META.new_record("softwaretable").unwrap();
    assert!(std::ptr::eq(record.schema(), &SOFTWARE_TABLE));
    assert!(LIMS_META.new_record("Gains").is_none());
}

#[timeout(1000)]
#[test]
fn test_flatten_cold_spots() {
    let groups = vec![
        ColdSpotGroup {
            amp: 1,
            pixel_count: 10,
            spots: vec![(5, 6), (100, 200), (7, 7)],
        },
        ColdSpotGroup {
            amp: 2,
            pixel_count: 4,
            spots: vec![],
        },
        ColdSpotGroup {
            amp: 3,
            pixel_count: 4,
            spots: vec![(1, 2)],
        },
    ];
    let columns = flatten(&groups);
    assert_eq!(columns.len(), 4);
    assert_eq!(columns.amp_num, vec![1, 1, 1, 3]);
    assert_eq!(columns.pix_count, vec![3, 3, 3, 4]);
    assert_eq!(columns.spot_x, vec![5, 100, 7, 1]);
    assert_eq!(columns.spot_y, vec![6, 200, 7, 2]);

    let record = columns.fill(COLD_SPOT.builder()).build();
    assert_eq!(record.rows(), 4);
    assert!(record
        .validate_with(&crate::locator::FileLocator::default())
        .is_ok());
}
