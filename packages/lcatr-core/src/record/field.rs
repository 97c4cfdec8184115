//! Header fields and table columns.

use super::schema::{ColumnDef, FieldDef};
use crate::error::SchemaError;
use crate::types::{TypeDescriptor, Value};

/// Canonical form of a caller-supplied keyword: `-` becomes `_`, lower case.
pub fn keywordify(key: &str) -> String {
    key.trim().replace('-', "_").to_ascii_lowercase()
}

/// A named, typed, described scalar stored in the record header.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Upper-case keyword
    pub name: String,
    pub ty: TypeDescriptor,
    pub comment: String,
    pub description: String,
    /// Unset until assigned
    pub value: Option<Value>,
}

impl Field {
    pub fn new(name: &str, ty: TypeDescriptor, comment: &str, description: &str) -> Self {
        Self {
            name: name.trim().to_ascii_uppercase(),
            ty,
            comment: comment.to_string(),
            description: description.to_string(),
            value: None,
        }
    }

    pub fn from_def(def: &FieldDef) -> Self {
        Self::new(def.name, def.ty, def.comment, def.description)
    }

    /// Overwrites the value without checking it.
    pub fn set(&mut self, value: impl Into<Value>) {
        self.value = Some(value.into());
    }

    /// Returns true if `key` names this field, ignoring case and `-`/`_`.
    pub fn is_named(&self, key: &str) -> bool {
        keywordify(&self.name) == keywordify(key)
    }

    /// Checks that the field is fully formed and its value fits the type.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let missing = if self.name.is_empty() {
            Some("name")
        } else if self.comment.is_empty() {
            Some("comment")
        } else if self.description.is_empty() {
            Some("description")
        } else {
            None
        };
        if let Some(missing) = missing {
            return Err(SchemaError::IncompleteField {
                field: self.name.clone(),
                missing,
            });
        }
        let value = self.value.as_ref().ok_or_else(|| SchemaError::IncompleteField {
            field: self.name.clone(),
            missing: "value",
        })?;
        check_instance(&self.name, self.ty, value)
    }
}

/// A named, typed, described array stored as one table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: TypeDescriptor,
    pub description: String,
    /// One entry per table row
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: &str, ty: TypeDescriptor, description: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ty,
            description: description.to_string(),
            values: Vec::new(),
        }
    }

    pub fn from_def(def: &ColumnDef) -> Self {
        Self::new(def.name, def.ty, def.description)
    }

    /// Replaces the whole array without checking it.
    pub fn set<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) {
        self.values = values.into_iter().map(Into::into).collect();
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_named(&self, key: &str) -> bool {
        keywordify(&self.name) == keywordify(key)
    }

    /// Checks the descriptive part and every element.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let missing = if self.name.is_empty() {
            Some("name")
        } else if self.description.is_empty() {
            Some("description")
        } else if self.values.is_empty() {
            Some("value")
        } else {
            None
        };
        if let Some(missing) = missing {
            return Err(SchemaError::IncompleteField {
                field: self.name.clone(),
                missing,
            });
        }
        self.values
            .iter()
            .enumerate()
            .try_for_each(|(row, value)| {
                check_instance(&format!("{}[{}]", self.name, row), self.ty, value)
            })
    }
}

fn check_instance(name: &str, ty: TypeDescriptor, value: &Value) -> Result<(), SchemaError> {
    if ty.is_instance(value) {
        Ok(())
    } else {
        Err(SchemaError::TypeMismatch {
            field: name.to_string(),
            expected: ty.name(),
            got: format!("{} '{}'", value.kind(), value),
        })
    }
}
