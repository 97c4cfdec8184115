//! Serializable record summaries for reports.

use serde::Serialize;

use super::schema::RecordKind;
use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub value: Option<String>,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub format: String,
}

/// Schema name, shape, and field values of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub name: String,
    pub kind: RecordKind,
    pub version: Option<i16>,
    pub rows: usize,
    pub fields: Vec<FieldSummary>,
    pub columns: Vec<ColumnSummary>,
    /// Validation outcome, when the record was checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Record {
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            name: self.name().to_string(),
            kind: self.kind(),
            version: self.version(),
            rows: self.rows(),
            fields: self
                .fields()
                .iter()
                .map(|f| FieldSummary {
                    name: f.name.clone(),
                    ty: f.ty.name(),
                    value: f.value.as_ref().map(|v| f.ty.serialize(v)),
                    comment: f.comment.clone(),
                })
                .collect(),
            columns: self
                .columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    ty: c.ty.name(),
                    format: c.ty.container_format().tform(),
                })
                .collect(),
            error: None,
        }
    }
}
