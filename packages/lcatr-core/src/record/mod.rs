//! Typed records: one schema-checked header/data unit.

mod builder;
mod field;
mod file_ref;
mod schema;
mod summary;
mod validation;

use crate::container::{is_structural, Card, ContainerError, Hdu, Header, TableColumn};
use crate::error::SchemaError;
use crate::locator::FileLocator;
use crate::types::{TypeDescriptor, Value};

pub use builder::RecordBuilder;
pub use field::{keywordify, Column, Field};
pub use file_ref::{file_refs, FILE_REF_COLUMNS, FILE_REF_FIELDS};
pub use schema::{ColumnDef, FieldDef, RecordKind, RecordSchema, BASELINE_FIELDS};
pub use summary::{ColumnSummary, FieldSummary, RecordSummary};

/// Column reference: case-insensitive name or 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl std::fmt::Display for ColumnRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "'{}'", name),
            ColumnRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// An instance of a [`RecordSchema`].
///
/// The record owns its fields and columns; the container unit is derived
/// from them on demand by [`Record::to_hdu`], so it can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: &'static RecordSchema,
    fields: Vec<Field>,
    columns: Vec<Column>,
    /// Header cards read back that no field declares
    extra_cards: Vec<Card>,
}

impl Record {
    /// Record with every declared field and column present and unset.
    pub(crate) fn empty(schema: &'static RecordSchema) -> Self {
        Self {
            schema,
            fields: schema.required_fields().map(Field::from_def).collect(),
            columns: schema.columns.iter().map(Column::from_def).collect(),
            extra_cards: Vec::new(),
        }
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    /// Canonical schema name.
    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    /// The stored `EXTNAME`, which may differ in case from the schema name.
    pub fn instance_name(&self) -> &str {
        self.field_value("EXTNAME")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Schema version from `EXTVER`.
    pub fn version(&self) -> Option<i16> {
        self.field_value("EXTVER")
            .and_then(Value::as_int)
            .and_then(|v| i16::try_from(v).ok())
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by keyword, ignoring case and `-`/`_`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_named(name))
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.is_named(name))
    }

    pub fn field_value(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(|f| f.value.as_ref())
    }

    /// Sets a declared field; datetime values are stored in canonical form.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), SchemaError> {
        let record = self.schema.name;
        let field = self
            .field_mut(name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                record: record.to_string(),
                field: name.to_string(),
            })?;
        field.value = Some(field.ty.wash(value.into()));
        Ok(())
    }

    /// Header cards not declared by the schema, in stored order.
    pub fn extra_cards(&self) -> &[Card] {
        &self.extra_cards
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn column_position(&self, column: ColumnRef<'_>) -> Result<usize, SchemaError> {
        let found = match column {
            ColumnRef::Name(name) => self.columns.iter().position(|c| c.is_named(name)),
            ColumnRef::Index(index) => index.checked_sub(1).filter(|i| *i < self.columns.len()),
        };
        found.ok_or_else(|| SchemaError::ColumnNotFound {
            record: self.schema.name.to_string(),
            column: column.to_string(),
        })
    }

    /// Looks a column up by name or 1-based index.
    pub fn column<'a>(&self, column: impl Into<ColumnRef<'a>>) -> Result<&Column, SchemaError> {
        let i = self.column_position(column.into())?;
        Ok(&self.columns[i])
    }

    /// Replaces the array of exactly one column.
    pub fn set_column_array<'a, V: Into<Value>>(
        &mut self,
        column: impl Into<ColumnRef<'a>>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<(), SchemaError> {
        let i = self.column_position(column.into())?;
        self.columns[i].set(values);
        Ok(())
    }

    /// Appends one entry to exactly one column.
    pub fn append_column_value<'a>(
        &mut self,
        column: impl Into<ColumnRef<'a>>,
        value: impl Into<Value>,
    ) -> Result<(), SchemaError> {
        let i = self.column_position(column.into())?;
        self.columns[i].push(value);
        Ok(())
    }

    /// Number of table rows (length of the first column).
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Derives the container unit for the current field and column state.
    pub fn to_hdu(&self) -> Result<Hdu, ContainerError> {
        let mut header = Header::new();
        for field in &self.fields {
            header.update(
                &field.name,
                field.ty.to_card_value(field.value.as_ref()),
                &field.comment,
            );
        }
        for card in &self.extra_cards {
            header.push(card.clone());
        }
        if !self.schema.is_tabular() {
            return Ok(Hdu::primary(header));
        }
        let columns = self
            .columns
            .iter()
            .map(|column| {
                TableColumn::new(
                    &column.name,
                    column.ty.container_format(),
                    column.values.iter().map(|v| column.ty.to_cell(v)).collect(),
                )
            })
            .collect();
        Hdu::bintable(header, columns)
    }

    /// Replaces field and column state with the content of a stored unit.
    ///
    /// Declared fields and columns take the stored values; undeclared
    /// columns are kept with a type inferred from their format, and
    /// undeclared header cards are kept verbatim.
    pub fn adopt(&mut self, hdu: Hdu) {
        let (header, table) = hdu.into_parts();
        self.extra_cards.clear();
        for card in header.cards() {
            if is_structural(&card.keyword) {
                continue;
            }
            match self.fields.iter_mut().find(|f| f.name == card.keyword) {
                Some(field) => {
                    field.value = Some(field.ty.from_card_value(&card.value));
                    if !card.comment.is_empty() {
                        field.comment = card.comment.clone();
                    }
                }
                None => self.extra_cards.push(card.clone()),
            }
        }

        for column in &mut self.columns {
            column.values.clear();
        }
        let Some(table) = table else {
            return;
        };
        for stored in table.into_columns() {
            let position = self
                .columns
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(&stored.name));
            let column = match position {
                Some(i) => &mut self.columns[i],
                None => {
                    tracing::debug!(
                        "Record {}: keeping undeclared column '{}'",
                        self.schema.name,
                        stored.name
                    );
                    self.columns.push(Column::new(
                        &stored.name,
                        TypeDescriptor::for_format(stored.format),
                        "Undeclared stored column",
                    ));
                    let last = self.columns.len() - 1;
                    &mut self.columns[last]
                }
            };
            let ty = column.ty;
            column.values = stored.cells.iter().map(|cell| ty.from_cell(cell)).collect();
        }
    }

    /// Validates the record, resolving referenced files through the
    /// environment-configured search path.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_with(&FileLocator::from_env())
    }

    /// Validates the record.
    ///
    /// Order: container structure of the derived unit, required fields,
    /// then for tables the required columns and their contents, and for
    /// file references the stored hashes against the files on disk.
    pub fn validate_with(&self, locator: &FileLocator) -> Result<(), SchemaError> {
        let container_error = |source: ContainerError| SchemaError::ContainerFormat {
            record: self.schema.name.to_string(),
            name: self.instance_name().to_string(),
            source,
        };
        self.to_hdu()
            .and_then(|hdu| hdu.verify())
            .map_err(container_error)?;

        validation::check_fields(self)?;
        if self.schema.is_tabular() {
            validation::check_table(self)?;
        }
        if self.schema.kind == RecordKind::FileRefs {
            self.verify_hashes(locator)?;
        }
        Ok(())
    }
}
