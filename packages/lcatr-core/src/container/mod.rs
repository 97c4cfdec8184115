//! Container layer: a FITS-flavoured block format.
//!
//! A file is an ordered list of units ([`Hdu`]). The first unit is a
//! header-only primary; every further unit is a binary table extension.
//! This layer knows nothing about record schemas; it provides header and
//! column access, structural verification, and whole-file read/write.

mod card;
mod codec;
mod error;
mod io_utils;
mod table;


use std::path::Path;

pub use card::{normalize_keyword, Card, CardValue, Header, KEYWORD_LEN};
pub use codec::{decode, encode, BLOCK_SIZE, CARD_SIZE};
pub use error::ContainerError;
pub use table::{BinTable, Cell, ColumnFormat, TableColumn};

/// Keyword holding the CRC-32 of a unit's data bytes.
pub const DATACRC: &str = "DATACRC";

/// Returns true for keywords the container layer owns and rebuilds itself.
pub fn is_structural(keyword: &str) -> bool {
    let keyword = normalize_keyword(keyword);
    const FIXED: &[&str] = &[
        "SIMPLE", "XTENSION", "BITPIX", "NAXIS", "NAXIS1", "NAXIS2", "EXTEND", "PCOUNT",
        "GCOUNT", "TFIELDS", DATACRC, "END",
    ];
    if FIXED.contains(&keyword.as_str()) {
        return true;
    }
    ["TTYPE", "TFORM"].iter().any(|prefix| {
        keyword
            .strip_prefix(prefix)
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Kind of unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HduKind {
    Primary,
    BinTable,
}

/// One header/data unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hdu {
    header: Header,
    table: Option<BinTable>,
}

impl Hdu {
    /// Creates a header-only primary unit.
    ///
    /// Structural keywords in `header` are replaced by the mandatory
    /// primary prologue; every other card keeps its order.
    pub fn primary(header: Header) -> Self {
        let mut cards = vec![
            Card::new("SIMPLE", CardValue::Logical(true), "conforms to FITS standard"),
            Card::new("BITPIX", CardValue::Int(8), "array data type"),
            Card::new("NAXIS", CardValue::Int(0), "number of array dimensions"),
            Card::new("EXTEND", CardValue::Logical(true), ""),
        ];
        cards.extend(header.iter().filter(|c| !is_structural(&c.keyword)).cloned());
        Self {
            header: Header::from_cards(cards),
            table: None,
        }
    }

    /// Builds a fresh binary table unit from typed columns plus a header.
    pub fn bintable(header: Header, columns: Vec<TableColumn>) -> Result<Self, ContainerError> {
        let table = BinTable::new(columns)?;
        let mut cards = vec![
            Card::new("XTENSION", CardValue::Str("BINTABLE".to_string()), "binary table extension"),
            Card::new("BITPIX", CardValue::Int(8), "array data type"),
            Card::new("NAXIS", CardValue::Int(2), "number of array dimensions"),
            Card::new("NAXIS1", CardValue::Int(table.row_width() as i64), "length of dimension 1"),
            Card::new("NAXIS2", CardValue::Int(table.rows() as i64), "length of dimension 2"),
            Card::new("PCOUNT", CardValue::Int(0), "number of group parameters"),
            Card::new("GCOUNT", CardValue::Int(1), "number of groups"),
            Card::new("TFIELDS", CardValue::Int(table.columns().len() as i64), "number of table fields"),
        ];
        for (i, column) in table.columns().iter().enumerate() {
            let n = i + 1;
            cards.push(Card::new(&format!("TTYPE{}", n), CardValue::Str(column.name.clone()), ""));
            cards.push(Card::new(&format!("TFORM{}", n), CardValue::Str(column.format.tform()), ""));
        }
        cards.extend(header.iter().filter(|c| !is_structural(&c.keyword)).cloned());
        Ok(Self {
            header: Header::from_cards(cards),
            table: Some(table),
        })
    }

    /// Assembles a unit from already-structured parts without rebuilding
    /// the prologue. Used by the decoder.
    pub(crate) fn from_parts(header: Header, table: Option<BinTable>) -> Self {
        Self { header, table }
    }

    pub fn kind(&self) -> HduKind {
        if self.table.is_some() {
            HduKind::BinTable
        } else {
            HduKind::Primary
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn table(&self) -> Option<&BinTable> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut BinTable> {
        self.table.as_mut()
    }

    /// Splits the unit into its header and table.
    pub fn into_parts(self) -> (Header, Option<BinTable>) {
        (self.header, self.table)
    }

    /// The `EXTNAME` value, if present.
    pub fn name(&self) -> Option<&str> {
        self.header.get_str("EXTNAME")
    }

    /// Number of table rows (0 for a primary unit).
    pub fn rows(&self) -> usize {
        self.table.as_ref().map_or(0, BinTable::rows)
    }

    /// Structural self-check of keywords, prologue, and table layout.
    pub fn verify(&self) -> Result<(), ContainerError> {
        verify_keywords(&self.header)?;
        match &self.table {
            None => verify_primary(&self.header),
            Some(table) => verify_bintable(&self.header, table),
        }
    }
}

fn expect_card(header: &Header, index: usize, keyword: &str, value: &CardValue) -> Result<(), ContainerError> {
    match header.cards().get(index) {
        Some(card) if card.keyword == keyword => {
            if &card.value == value {
                Ok(())
            } else {
                Err(ContainerError::InvalidKeyword {
                    keyword: keyword.to_string(),
                    message: format!("expected {}, found {}", value, card.value),
                })
            }
        }
        Some(card) => Err(ContainerError::InvalidKeyword {
            keyword: card.keyword.clone(),
            message: format!("expected '{}' at position {}", keyword, index + 1),
        }),
        None => Err(ContainerError::MissingKeyword {
            keyword: keyword.to_string(),
        }),
    }
}

fn verify_keywords(header: &Header) -> Result<(), ContainerError> {
    let mut seen = std::collections::HashSet::new();
    for card in header {
        let kw = &card.keyword;
        if kw.is_empty() || kw.len() > KEYWORD_LEN {
            return Err(ContainerError::InvalidKeyword {
                keyword: kw.clone(),
                message: format!("keyword must be 1 to {} characters", KEYWORD_LEN),
            });
        }
        if !kw
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
        {
            return Err(ContainerError::InvalidKeyword {
                keyword: kw.clone(),
                message: "keyword may only hold A-Z, 0-9, '-' and '_'".to_string(),
            });
        }
        if !seen.insert(kw.as_str()) {
            return Err(ContainerError::InvalidKeyword {
                keyword: kw.clone(),
                message: "duplicate keyword".to_string(),
            });
        }
        if let CardValue::Str(s) = &card.value {
            if !s.bytes().all(|b| (0x20..0x7f).contains(&b)) {
                return Err(ContainerError::InvalidKeyword {
                    keyword: kw.clone(),
                    message: "string value must be printable ASCII".to_string(),
                });
            }
        }
        codec::format_card(card)?;
    }
    Ok(())
}

fn verify_primary(header: &Header) -> Result<(), ContainerError> {
    expect_card(header, 0, "SIMPLE", &CardValue::Logical(true))?;
    expect_card(header, 1, "BITPIX", &CardValue::Int(8))?;
    expect_card(header, 2, "NAXIS", &CardValue::Int(0))
}

fn verify_bintable(header: &Header, table: &BinTable) -> Result<(), ContainerError> {
    table.check_row_counts()?;
    let prologue = [
        ("XTENSION", CardValue::Str("BINTABLE".to_string())),
        ("BITPIX", CardValue::Int(8)),
        ("NAXIS", CardValue::Int(2)),
        ("NAXIS1", CardValue::Int(table.row_width() as i64)),
        ("NAXIS2", CardValue::Int(table.rows() as i64)),
        ("PCOUNT", CardValue::Int(0)),
        ("GCOUNT", CardValue::Int(1)),
        ("TFIELDS", CardValue::Int(table.columns().len() as i64)),
    ];
    for (i, (keyword, value)) in prologue.iter().enumerate() {
        expect_card(header, i, keyword, value)?;
    }
    for (i, column) in table.columns().iter().enumerate() {
        let n = i + 1;
        let ttype = format!("TTYPE{}", n);
        let tform = format!("TFORM{}", n);
        match header.get_str(&ttype) {
            Some(name) if name == column.name => {}
            Some(name) => {
                return Err(ContainerError::InvalidKeyword {
                    keyword: ttype,
                    message: format!("names '{}', column is '{}'", name, column.name),
                })
            }
            None => return Err(ContainerError::MissingKeyword { keyword: ttype }),
        }
        match header.get_str(&tform) {
            Some(code) if code.parse::<ColumnFormat>()? == column.format => {}
            Some(code) => {
                return Err(ContainerError::InvalidKeyword {
                    keyword: tform,
                    message: format!("declares '{}', column is '{}'", code, column.format),
                })
            }
            None => return Err(ContainerError::MissingKeyword { keyword: tform }),
        }
        for (row, cell) in column.cells.iter().enumerate() {
            column
                .format
                .check_cell(cell)
                .map_err(|message| ContainerError::InvalidCell {
                    column: column.name.clone(),
                    row,
                    message,
                })?;
        }
    }
    Ok(())
}

/// Ordered list of units making up one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HduList {
    hdus: Vec<Hdu>,
}

impl HduList {
    pub fn new(hdus: Vec<Hdu>) -> Self {
        Self { hdus }
    }

    pub fn push(&mut self, hdu: Hdu) {
        self.hdus.push(hdu);
    }

    pub fn get(&self, index: usize) -> Option<&Hdu> {
        self.hdus.get(index)
    }

    /// Finds a unit by case-insensitive `EXTNAME`.
    pub fn by_name(&self, name: &str) -> Option<&Hdu> {
        self.hdus
            .iter()
            .find(|h| h.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hdu> {
        self.hdus.iter()
    }

    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }

    pub fn into_vec(self) -> Vec<Hdu> {
        self.hdus
    }

    /// Whole-file structural check: one leading primary, tables after it,
    /// and every unit individually valid.
    pub fn verify(&self) -> Result<(), ContainerError> {
        self.verify_structure()?;
        self.hdus.iter().try_for_each(Hdu::verify)
    }

    /// Checks unit kinds only: one leading primary, tables after it.
    pub fn verify_structure(&self) -> Result<(), ContainerError> {
        let first = self
            .hdus
            .first()
            .ok_or_else(|| ContainerError::Structure("file holds no units".to_string()))?;
        if first.kind() != HduKind::Primary {
            return Err(ContainerError::Structure(
                "first unit must be a primary unit".to_string(),
            ));
        }
        for (i, hdu) in self.hdus.iter().enumerate().skip(1) {
            if hdu.kind() != HduKind::BinTable {
                return Err(ContainerError::Structure(format!(
                    "unit {} must be a binary table extension",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Reads a whole file.
    pub fn read(path: &Path) -> Result<Self, ContainerError> {
        let bytes = std::fs::read(path)
            .map_err(|e| io_utils::classify_io_error(e, &path.display().to_string()))?;
        let hdus = decode(&bytes)?;
        tracing::debug!("Read {} units from {}", hdus.len(), path.display());
        Ok(Self { hdus })
    }

    /// Writes a whole file, replacing any existing one atomically.
    pub fn write(&self, path: &Path) -> Result<(), ContainerError> {
        let mut bytes = Vec::new();
        for hdu in &self.hdus {
            encode(hdu, &mut bytes)?;
        }
        io_utils::write_atomic(path, &bytes)?;
        tracing::debug!(
            "Wrote {} units ({} bytes) to {}",
            self.hdus.len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HduList {
    type Item = &'a Hdu;
    type IntoIter = std::slice::Iter<'a, Hdu>;

    fn into_iter(self) -> Self::IntoIter {
        self.hdus.iter()
    }
}

impl IntoIterator for HduList {
    type Item = Hdu;
    type IntoIter = std::vec::IntoIter<Hdu>;

    fn into_iter(self) -> Self::IntoIter {
        self.hdus.into_iter()
    }
}
