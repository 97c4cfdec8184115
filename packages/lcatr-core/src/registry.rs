//! Name-keyed lookup from stored units to record schemas.

use std::collections::HashMap;

use crate::container::{ContainerError, Hdu, HduKind};
use crate::error::SchemaError;
use crate::record::{Record, RecordSchema};
use crate::schemas::{FileSchema, BUILTIN_FILE_SCHEMAS};

/// Registry of record schemas keyed by lower-cased canonical name.
///
/// Maps the `EXTNAME` of a stored unit back to the schema that can
/// validate it. Populated explicitly; lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, &'static RecordSchema>,
    files: Vec<&'static FileSchema>,
}

impl SchemaRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in file schema.
    pub fn with_builtin() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        register_builtin_schemas(&mut registry)?;
        Ok(registry)
    }

    /// Registers a record schema.
    ///
    /// # Arguments
    /// * `schema` - Schema to register
    ///
    /// # Returns
    /// `Ok(())` if successful or if this exact schema is already registered,
    /// `Err(SchemaError::DuplicateSchema)` if another schema holds the name.
    pub fn register(&mut self, schema: &'static RecordSchema) -> Result<(), SchemaError> {
        match self.schemas.get(&schema.key()) {
            Some(existing) if std::ptr::eq(*existing, schema) => Ok(()),
            Some(_) => Err(SchemaError::DuplicateSchema {
                name: schema.name.to_string(),
            }),
            None => {
                tracing::debug!("Registering record schema '{}'", schema.name);
                self.schemas.insert(schema.key(), schema);
                Ok(())
            }
        }
    }

    /// Registers a file schema and every record schema it declares.
    pub fn register_file_schema(&mut self, file: &'static FileSchema) -> Result<(), SchemaError> {
        for schema in file.records {
            self.register(*schema)?;
        }
        if !self.files.iter().any(|f| std::ptr::eq(*f, file)) {
            self.files.push(file);
        }
        Ok(())
    }

    /// Retrieves a schema by case-insensitive name.
    pub fn resolve(&self, name: &str) -> Result<&'static RecordSchema, SchemaError> {
        self.schemas
            .get(&name.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| SchemaError::UnknownSchema {
                name: name.to_string(),
            })
    }

    /// Checks if a schema name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Canonical names of every registered schema, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.schemas.values().map(|s| s.name).collect();
        names.sort_unstable();
        names
    }

    pub fn schemas(&self) -> impl Iterator<Item = &'static RecordSchema> + '_ {
        self.schemas.values().copied()
    }

    pub fn file_schemas(&self) -> &[&'static FileSchema] {
        &self.files
    }

    /// Turns a generic stored unit into a typed record of the schema its
    /// `EXTNAME` names.
    ///
    /// The unit's kind must match the schema: tables for tabular schemas,
    /// header-only units for primary ones.
    pub fn reify(&self, hdu: Hdu) -> Result<Record, SchemaError> {
        let name = hdu.name().ok_or_else(|| SchemaError::UnknownSchema {
            name: String::new(),
        })?;
        let schema = self.resolve(name)?;
        let stored_as_table = hdu.kind() == HduKind::BinTable;
        if stored_as_table != schema.is_tabular() {
            let expected = if schema.is_tabular() {
                "a binary table"
            } else {
                "a primary unit"
            };
            return Err(SchemaError::ContainerFormat {
                record: schema.name.to_string(),
                name: name.to_string(),
                source: ContainerError::Structure(format!("stored unit is not {}", expected)),
            });
        }
        let mut record = Record::empty(schema);
        record.adopt(hdu);
        Ok(record)
    }

    /// The registered file schema whose primary record is named `primary`.
    pub fn file_schema_for(&self, primary: &str) -> Option<&'static FileSchema> {
        self.files.iter().copied().find(|f| {
            f.primary()
                .is_some_and(|p| p.name.eq_ignore_ascii_case(primary))
        })
    }
}

/// Registers every built-in file schema and its record schemas.
pub fn register_builtin_schemas(registry: &mut SchemaRegistry) -> Result<(), SchemaError> {
    for file in BUILTIN_FILE_SCHEMAS {
        registry.register_file_schema(file)?;
    }
    Ok(())
}
