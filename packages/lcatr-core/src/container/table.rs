//! Binary table payloads.

use std::fmt;
use std::str::FromStr;

use super::error::ContainerError;

/// Binary column format (`TFORMn`), restricted to single-element cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnFormat {
    /// `I`: 16-bit big-endian integer
    Int16,
    /// `J`: 32-bit big-endian integer
    Int32,
    /// `K`: 64-bit big-endian integer
    Int64,
    /// `E`: 32-bit IEEE float
    Float32,
    /// `Aw`: fixed-width ASCII string
    Ascii(usize),
}

impl ColumnFormat {
    /// Width of one cell in bytes.
    pub fn width(&self) -> usize {
        match self {
            ColumnFormat::Int16 => 2,
            ColumnFormat::Int32 => 4,
            ColumnFormat::Int64 => 8,
            ColumnFormat::Float32 => 4,
            ColumnFormat::Ascii(w) => *w,
        }
    }

    /// The `TFORMn` code.
    pub fn tform(&self) -> String {
        match self {
            ColumnFormat::Int16 => "I".to_string(),
            ColumnFormat::Int32 => "J".to_string(),
            ColumnFormat::Int64 => "K".to_string(),
            ColumnFormat::Float32 => "E".to_string(),
            ColumnFormat::Ascii(w) => format!("A{}", w),
        }
    }

    /// Checks that a cell can be stored in this format.
    pub fn check_cell(&self, cell: &Cell) -> Result<(), String> {
        match (self, cell) {
            (ColumnFormat::Int16, Cell::Int(v)) => i16::try_from(*v)
                .map(|_| ())
                .map_err(|_| format!("{} out of range for I", v)),
            (ColumnFormat::Int32, Cell::Int(v)) => i32::try_from(*v)
                .map(|_| ())
                .map_err(|_| format!("{} out of range for J", v)),
            (ColumnFormat::Int64, Cell::Int(_)) => Ok(()),
            (ColumnFormat::Float32, Cell::Float(_) | Cell::Int(_)) => Ok(()),
            (ColumnFormat::Ascii(w), Cell::Str(s)) => {
                if !s.is_ascii() {
                    Err("non-ASCII string".to_string())
                } else if s.len() > *w {
                    Err(format!("string of {} bytes exceeds A{}", s.len(), w))
                } else {
                    Ok(())
                }
            }
            (format, cell) => Err(format!("{} cell in {} column", cell.kind(), format)),
        }
    }
}

impl fmt::Display for ColumnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tform())
    }
}

impl FromStr for ColumnFormat {
    type Err = ContainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        match code {
            "I" | "1I" => Ok(ColumnFormat::Int16),
            "J" | "1J" => Ok(ColumnFormat::Int32),
            "K" | "1K" => Ok(ColumnFormat::Int64),
            "E" | "1E" => Ok(ColumnFormat::Float32),
            _ => {
                // rAw and Aw both describe a w-character string
                let (repeat, rest) = code.split_at(code.find('A').unwrap_or(code.len()));
                let width = match (repeat, rest.strip_prefix('A')) {
                    ("", Some(w)) if !w.is_empty() => w.parse::<usize>().ok(),
                    (r, Some("")) => r.parse::<usize>().ok(),
                    _ => None,
                };
                match width {
                    Some(w) if w > 0 => Ok(ColumnFormat::Ascii(w)),
                    _ => Err(ContainerError::UnsupportedFormat(code.to_string())),
                }
            }
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    fn kind(&self) -> &'static str {
        match self {
            Cell::Int(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Str(_) => "string",
        }
    }
}

/// A named, formatted table column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    /// Column name (`TTYPEn`)
    pub name: String,
    /// Column format (`TFORMn`)
    pub format: ColumnFormat,
    /// Cells, one per row
    pub cells: Vec<Cell>,
}

impl TableColumn {
    pub fn new(name: &str, format: ColumnFormat, cells: Vec<Cell>) -> Self {
        Self {
            name: name.to_string(),
            format,
            cells,
        }
    }
}

/// Binary table: equal-length columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinTable {
    columns: Vec<TableColumn>,
}

impl BinTable {
    /// Creates a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<TableColumn>) -> Result<Self, ContainerError> {
        let table = Self { columns };
        table.check_row_counts()?;
        Ok(table)
    }

    pub(crate) fn check_row_counts(&self) -> Result<(), ContainerError> {
        let expected = self.rows();
        for column in &self.columns {
            if column.cells.len() != expected {
                return Err(ContainerError::RaggedColumn {
                    column: column.name.clone(),
                    len: column.cells.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Number of rows (length of the first column).
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// Bytes per row (`NAXIS1`).
    pub fn row_width(&self) -> usize {
        self.columns.iter().map(|c| c.format.width()).sum()
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Finds a column by case-insensitive name.
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Mutable column access; row counts are rechecked by `Hdu::verify`.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut TableColumn> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn into_columns(self) -> Vec<TableColumn> {
        self.columns
    }
}
