//! LIMS metadata file tests.

use ntest::timeout;
use tempfile::tempdir;

use lcatr_core::container::{CardValue, Cell, ColumnFormat, ContainerError, Hdu, HduList, TableColumn};
use lcatr_core::schemas::{AUXILIARY_FILES, LIMS_META, LIMS_META_PRIMARY, RESULT_FILES, SOFTWARE_TABLE};
use lcatr_core::{Digest, ResultFile, SchemaError, SchemaRegistry, Value};

use super::helpers::{locator_for, test_time, write_inputs};

fn software_record() -> lcatr_core::Record {
    SOFTWARE_TABLE
        .builder()
        .column("CommitHash", [Digest::of_bytes(b"commit 1")])
        .column("CommitTag", ["v0.3"])
        .column("RepoURL", ["https://example.org/ccdtest.git"])
        .column("ProgPath", ["bin/analyze_ptc"])
        .column("CmdLine", ["analyze_ptc --amp all"])
        .column("ExitCode", [0i16])
        .build()
}

#[timeout(1000)]
#[test]
fn test_lims_meta_round_trip_preserves_extra_cards() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let outputs = write_inputs(dir.path(), &["ptc.fits", "ptc.png"]);
    let aux = write_inputs(dir.path(), &["station.cfg"]);
    let locator = locator_for(dir.path());

    let primary = LIMS_META_PRIMARY
        .builder()
        .set("TESTNAME", "ptc")
        .set("DATE-OBS", test_time())
        .set("username", "operator")
        .build();
    let mut results = RESULT_FILES
        .builder()
        .column("FileName", outputs.iter().map(String::as_str))
        .build();
    results.generate(&locator)?;
    let mut auxiliary = AUXILIARY_FILES
        .builder()
        .column("FileName", aux.iter().map(String::as_str))
        .build();
    auxiliary.generate(&locator)?;

    let file = ResultFile::new(vec![primary, software_record(), results, auxiliary]);
    LIMS_META.check_composition(&file)?;
    file.validate_all_with(&locator)?;

    let path = dir.path().join("limsmeta.fits");
    file.write(&path)?;

    // a station tool annotates the primary header after the fact
    let mut hdus = HduList::read(&path)?.into_vec();
    hdus[0]
        .header_mut()
        .update("STATION", CardValue::Str("BNL-2".to_string()), "test station");
    HduList::new(hdus).write(&path)?;

    let registry = SchemaRegistry::with_builtin()?;
    let read = ResultFile::read(&path, &registry)?;
    read.validate_all_with(&locator)?;

    let primary = read.primary().unwrap();
    assert_eq!(primary.extra_cards().len(), 1);
    assert_eq!(primary.extra_cards()[0].keyword, "STATION");
    assert_eq!(
        read.record("SoftwareTable").unwrap().column("CommitHash")?.values[0],
        Value::Digest(Digest::of_bytes(b"commit 1"))
    );

    let rewritten = dir.path().join("limsmeta_copy.fits");
    read.write(&rewritten)?;
    assert_eq!(std::fs::read(&path)?, std::fs::read(&rewritten)?);
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_software_table_rejects_bad_commit_hash() {
    let mut record = software_record();
    record
        .set_column_array("CommitHash", ["not-a-hash"])
        .unwrap();
    assert!(matches!(
        record.validate(),
        Err(SchemaError::TypeMismatch { ref field, expected: "sha1", .. }) if field == "CommitHash[0]"
    ));
}

#[timeout(1000)]
#[test]
fn test_read_rejects_unknown_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("unknown.fits");

    let mut hdus = LIMS_META.instantiate().to_hdu_list().unwrap().into_vec();
    hdus[1]
        .header_mut()
        .set("EXTNAME", CardValue::Str("Mystery".to_string()));
    HduList::new(hdus).write(&path).unwrap();

    let registry = SchemaRegistry::with_builtin().unwrap();
    assert_eq!(
        ResultFile::read(&path, &registry).unwrap_err(),
        SchemaError::UnknownSchema {
            name: "Mystery".to_string()
        }
    );
}

#[timeout(1000)]
#[test]
fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    let registry = SchemaRegistry::with_builtin().unwrap();
    let err = ResultFile::read(&dir.path().join("absent.fits"), &registry).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::Container(ContainerError::NotFound(_))
    ));
}

fn primary_header() -> lcatr_core::container::Header {
    LIMS_META_PRIMARY
        .builder()
        .set("TESTNAME", "ptc")
        .set("DATE-OBS", test_time())
        .set("username", "operator")
        .build()
        .to_hdu()
        .unwrap()
        .header()
        .clone()
}

fn payload() -> Vec<TableColumn> {
    vec![TableColumn::new(
        "Payload",
        ColumnFormat::Int32,
        vec![Cell::Int(11), Cell::Int(12)],
    )]
}

#[timeout(1000)]
#[test]
fn test_read_rejects_table_stored_as_first_unit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table_first.fits");
    let table = Hdu::bintable(primary_header(), payload()).unwrap();
    HduList::new(vec![table]).write(&path).unwrap();

    let registry = SchemaRegistry::with_builtin().unwrap();
    assert!(matches!(
        ResultFile::read(&path, &registry),
        Err(SchemaError::Container(ContainerError::Structure(_)))
    ));
}

#[timeout(1000)]
#[test]
fn test_read_rejects_table_named_as_primary_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("misnamed_table.fits");
    let hdus = vec![
        Hdu::primary(primary_header()),
        Hdu::bintable(primary_header(), payload()).unwrap(),
    ];
    HduList::new(hdus).write(&path).unwrap();

    let registry = SchemaRegistry::with_builtin().unwrap();
    assert!(matches!(
        ResultFile::read(&path, &registry),
        Err(SchemaError::ContainerFormat { ref record, .. }) if record == "LimsMeta"
    ));
}
