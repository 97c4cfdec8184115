//! Keyword-driven record construction.

use super::field::keywordify;
use super::schema::RecordSchema;
use super::Record;
use crate::types::Value;

/// Builds a [`Record`] from caller-supplied keywords.
///
/// Keywords match field and column names ignoring case, with `-` and `_`
/// interchangeable (`date_obs` sets `DATE-OBS`). The `version` and `extver`
/// keywords both set `EXTVER`. Keywords that match nothing are ignored.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
    version: i16,
}

impl RecordBuilder {
    pub(crate) fn new(schema: &'static RecordSchema) -> Self {
        let mut record = Record::empty(schema);
        for (key, value) in schema.presets {
            if let Some(field) = record.field_mut(key) {
                field.set(*value);
            }
        }
        Self { record, version: 0 }
    }

    /// Sets a field, or a column to a single entry.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if matches!(keywordify(key).as_str(), "version" | "extver") {
            match value.as_int().and_then(|v| i16::try_from(v).ok()) {
                Some(version) => self.version = version,
                None => tracing::debug!("Ignoring non-int16 version '{}'", value),
            }
            return self;
        }
        if let Some(field) = self.record.field_mut(key) {
            field.value = Some(field.ty.wash(value));
        } else if let Some(column) = self.record.columns.iter_mut().find(|c| c.is_named(key)) {
            column.values = vec![column.ty.wash(value)];
        } else {
            tracing::debug!(
                "Record {}: ignoring unknown keyword '{}'",
                self.record.name(),
                key
            );
        }
        self
    }

    /// Sets a column's whole array.
    pub fn column<V: Into<Value>>(mut self, key: &str, values: impl IntoIterator<Item = V>) -> Self {
        match self.record.columns.iter_mut().find(|c| c.is_named(key)) {
            Some(column) => {
                let ty = column.ty;
                column.values = values.into_iter().map(|v| ty.wash(v.into())).collect();
            }
            None => tracing::debug!(
                "Record {}: ignoring unknown column '{}'",
                self.record.name(),
                key
            ),
        }
        self
    }

    /// Schema version stored as `EXTVER` (default 0).
    pub fn version(mut self, version: i16) -> Self {
        self.version = version;
        self
    }

    pub fn build(mut self) -> Record {
        let name = self.record.name();
        let version = self.version;
        if let Some(field) = self.record.field_mut("EXTNAME") {
            field.set(name);
        }
        if let Some(field) = self.record.field_mut("EXTVER") {
            field.set(version);
        }
        self.record
    }
}
