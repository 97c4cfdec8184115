//! Required-field and table checks.

use super::Record;
use crate::error::SchemaError;

/// Every required field is present, set, non-empty, and well typed.
pub(crate) fn check_fields(record: &Record) -> Result<(), SchemaError> {
    for def in record.schema().required_fields() {
        let field = record.field(def.name);
        let value = field.and_then(|f| f.value.as_ref());
        match value {
            None => {
                return Err(SchemaError::MissingField {
                    record: record.name().to_string(),
                    field: def.name.to_string(),
                })
            }
            Some(v) if v.is_empty_str() => {
                return Err(SchemaError::EmptyField {
                    record: record.name().to_string(),
                    field: def.name.to_string(),
                })
            }
            Some(_) => {}
        }
        if let Some(field) = field {
            field.validate()?;
        }
    }
    Ok(())
}

/// Every required column is present, the table has rows, and every
/// column's entries fit its type.
pub(crate) fn check_table(record: &Record) -> Result<(), SchemaError> {
    for def in record.schema().columns {
        if record.columns().iter().all(|c| !c.is_named(def.name)) {
            return Err(SchemaError::MissingField {
                record: record.name().to_string(),
                field: def.name.to_string(),
            });
        }
    }
    if record.rows() == 0 {
        return Err(SchemaError::EmptyTable {
            record: record.name().to_string(),
        });
    }
    record.columns().iter().try_for_each(|c| c.validate())
}
