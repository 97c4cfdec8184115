//! A whole result file: an ordered collection of typed records.

use std::path::Path;

use crate::container::HduList;
use crate::error::SchemaError;
use crate::locator::FileLocator;
use crate::record::Record;
use crate::registry::SchemaRegistry;

/// Primary record followed by tabular records, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFile {
    records: Vec<Record>,
}

impl ResultFile {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn primary(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Finds a record by case-insensitive canonical name.
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    pub fn record_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records
            .iter_mut()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derives the container units of every record.
    pub fn to_hdu_list(&self) -> Result<HduList, SchemaError> {
        let hdus = self
            .records
            .iter()
            .map(|record| {
                record
                    .to_hdu()
                    .map_err(|source| SchemaError::ContainerFormat {
                        record: record.name().to_string(),
                        name: record.instance_name().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(HduList::new(hdus))
    }

    /// Validates the file using the environment-configured file search path.
    pub fn validate_all(&self) -> Result<(), SchemaError> {
        self.validate_all_with(&FileLocator::from_env())
    }

    /// Validates the file structure, then every record in order.
    ///
    /// Stops at the first failure.
    pub fn validate_all_with(&self, locator: &FileLocator) -> Result<(), SchemaError> {
        self.to_hdu_list()?.verify_structure()?;
        for record in &self.records {
            record.validate_with(locator)?;
        }
        Ok(())
    }

    /// Writes the file, replacing any existing one atomically.
    ///
    /// No validation is performed; call [`ResultFile::validate_all`] first.
    pub fn write(&self, path: &Path) -> Result<(), SchemaError> {
        self.to_hdu_list()?.write(path)?;
        tracing::info!("Wrote {} records to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Reads a file, turning every unit into a typed record.
    ///
    /// The stored units must already form a valid file layout: a leading
    /// primary followed by binary tables.
    pub fn read(path: &Path, registry: &SchemaRegistry) -> Result<Self, SchemaError> {
        let hdus = HduList::read(path)?;
        hdus.verify_structure()?;
        let records = hdus
            .into_iter()
            .map(|hdu| registry.reify(hdu))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!("Read {} records from {}", records.len(), path.display());
        Ok(Self { records })
    }
}

impl<'a> IntoIterator for &'a ResultFile {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
