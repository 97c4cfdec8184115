//! Properties that hold for every registered schema.

use ntest::timeout;

use lcatr_core::record::RecordKind;
use lcatr_core::{FileLocator, SchemaError, SchemaRegistry, TypeDescriptor};

#[timeout(1000)]
#[test]
fn test_every_fresh_record_fails_validation() {
    let registry = SchemaRegistry::with_builtin().unwrap();
    for schema in registry.schemas() {
        let err = schema
            .instantiate()
            .validate_with(&FileLocator::default())
            .unwrap_err();
        match schema.kind {
            RecordKind::Primary => assert!(
                matches!(err, SchemaError::MissingField { ref field, .. } if field == "TESTNAME"),
                "{}: {}",
                schema.name,
                err
            ),
            RecordKind::Table => assert!(
                matches!(err, SchemaError::EmptyTable { .. }),
                "{}: {}",
                schema.name,
                err
            ),
            RecordKind::FileRefs => assert!(
                matches!(
                    err,
                    SchemaError::MissingField { .. } | SchemaError::EmptyTable { .. }
                ),
                "{}: {}",
                schema.name,
                err
            ),
        }
    }
}

#[timeout(1000)]
#[test]
fn test_every_schema_fits_the_container() {
    let registry = SchemaRegistry::with_builtin().unwrap();
    for schema in registry.schemas() {
        for field in schema.required_fields() {
            assert!(field.name.len() <= 8, "{}: {}", schema.name, field.name);
        }
        let hdu = schema.instantiate().to_hdu().unwrap();
        assert!(hdu.verify().is_ok(), "{}", schema.name);
    }
}

#[timeout(1000)]
#[test]
fn test_type_catalog_is_closed() {
    for name in ["int16", "int32", "int64", "float32", "sha1", "str", "datetime"] {
        assert_eq!(TypeDescriptor::from_name(name).unwrap().name(), name);
    }
    assert!(matches!(
        TypeDescriptor::from_name("complex64"),
        Err(SchemaError::UnknownType { .. })
    ));
}
