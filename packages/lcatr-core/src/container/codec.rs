//! Byte-level encoding of units: 80-byte cards in 2880-byte blocks,
//! big-endian table rows.
//!
//! Trailing spaces in string card values and ASCII cells are padding and
//! are dropped on decode, so `"a.fits  "` reads back as `"a.fits"`.
//! Leading spaces are kept.

use crc32fast::Hasher;

use super::card::{Card, CardValue, Header, KEYWORD_LEN};
use super::error::ContainerError;
use super::table::{BinTable, Cell, ColumnFormat, TableColumn};
use super::{Hdu, DATACRC};

/// Size of one header card image.
pub const CARD_SIZE: usize = 80;

/// Size of one logical block.
pub const BLOCK_SIZE: usize = 2880;

/// Highest column count a table header may declare.
const MAX_FIELDS: usize = 999;

/// Column where fixed-format numeric values end.
const VALUE_END: usize = 30;

fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

fn format_float(v: f64) -> String {
    let s = format!("{:E}", v);
    match s.split_once('E') {
        Some((mantissa, exp)) if !mantissa.contains('.') => format!("{}.0E{}", mantissa, exp),
        _ => s,
    }
}

/// Renders one card as an 80-character image.
pub(crate) fn format_card(card: &Card) -> Result<String, ContainerError> {
    if card.keyword.len() > KEYWORD_LEN {
        return Err(ContainerError::InvalidKeyword {
            keyword: card.keyword.clone(),
            message: format!("keyword longer than {} characters", KEYWORD_LEN),
        });
    }
    let mut image = format!("{:<width$}= ", card.keyword, width = KEYWORD_LEN);
    let value = match &card.value {
        CardValue::Str(s) => format!("'{:<8}'", s.replace('\'', "''")),
        CardValue::Logical(b) => format!("{:>20}", if *b { "T" } else { "F" }),
        CardValue::Int(v) => format!("{:>20}", v),
        CardValue::Float(v) => format!("{:>20}", format_float(*v)),
    };
    image.push_str(&value);
    if image.len() > CARD_SIZE {
        return Err(ContainerError::InvalidKeyword {
            keyword: card.keyword.clone(),
            message: "value does not fit in one card".to_string(),
        });
    }
    if !card.comment.is_empty() {
        if image.len() < VALUE_END {
            image.push_str(&" ".repeat(VALUE_END - image.len()));
        }
        image.push_str(" / ");
        image.push_str(&card.comment);
    }
    // comments past the card end are truncated
    image.truncate(CARD_SIZE);
    Ok(format!("{:<width$}", image, width = CARD_SIZE))
}

fn encode_cell(format: ColumnFormat, cell: &Cell, out: &mut Vec<u8>) -> Result<(), String> {
    format.check_cell(cell)?;
    match (format, cell) {
        (ColumnFormat::Int16, Cell::Int(v)) => out.extend_from_slice(&(*v as i16).to_be_bytes()),
        (ColumnFormat::Int32, Cell::Int(v)) => out.extend_from_slice(&(*v as i32).to_be_bytes()),
        (ColumnFormat::Int64, Cell::Int(v)) => out.extend_from_slice(&v.to_be_bytes()),
        (ColumnFormat::Float32, Cell::Float(v)) => out.extend_from_slice(&(*v as f32).to_be_bytes()),
        (ColumnFormat::Float32, Cell::Int(v)) => out.extend_from_slice(&(*v as f32).to_be_bytes()),
        (ColumnFormat::Ascii(w), Cell::Str(s)) => {
            out.extend_from_slice(s.as_bytes());
            out.extend(std::iter::repeat_n(b' ', w - s.len()));
        }
        _ => unreachable!("check_cell accepted an unsupported pairing"),
    }
    Ok(())
}

fn encode_table(table: &BinTable) -> Result<Vec<u8>, ContainerError> {
    let mut data = Vec::with_capacity(table.row_width() * table.rows());
    for row in 0..table.rows() {
        for column in table.columns() {
            encode_cell(column.format, &column.cells[row], &mut data).map_err(|message| {
                ContainerError::InvalidCell {
                    column: column.name.clone(),
                    row,
                    message,
                }
            })?;
        }
    }
    Ok(data)
}

/// Appends the encoded unit to `out`.
pub fn encode(hdu: &Hdu, out: &mut Vec<u8>) -> Result<(), ContainerError> {
    let data = match hdu.table() {
        Some(table) => encode_table(table)?,
        None => Vec::new(),
    };
    let mut hasher = Hasher::new();
    hasher.update(&data);
    let crc = hasher.finalize();

    let start = out.len();
    for card in hdu.header().iter().filter(|c| c.keyword != DATACRC) {
        out.extend_from_slice(format_card(card)?.as_bytes());
    }
    let crc_card = Card::new(DATACRC, CardValue::Int(i64::from(crc)), "CRC-32 of data unit");
    out.extend_from_slice(format_card(&crc_card)?.as_bytes());
    out.extend_from_slice(format!("{:<width$}", "END", width = CARD_SIZE).as_bytes());
    out.resize(start + padded_len(out.len() - start), b' ');

    if !data.is_empty() {
        let data_start = out.len();
        out.extend_from_slice(&data);
        out.resize(data_start + padded_len(data.len()), 0);
    }
    Ok(())
}

fn decode_error(offset: usize, message: impl Into<String>) -> ContainerError {
    ContainerError::Decode {
        offset,
        message: message.into(),
    }
}

enum Parsed {
    Card(Card),
    Commentary,
    End,
}

fn parse_value(text: &str, offset: usize) -> Result<(CardValue, String), ContainerError> {
    let trimmed = text.trim_start();
    if let Some(body) = trimmed.strip_prefix('\'') {
        let mut value = String::new();
        let mut chars = body.char_indices().peekable();
        let mut end = None;
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    value.push('\'');
                    chars.next();
                } else {
                    end = Some(i + 1);
                    break;
                }
            } else {
                value.push(c);
            }
        }
        let end = end.ok_or_else(|| decode_error(offset, "unterminated string value"))?;
        let comment = body[end..]
            .trim_start()
            .strip_prefix('/')
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        return Ok((CardValue::Str(value.trim_end().to_string()), comment));
    }

    let (raw, comment) = match trimmed.split_once('/') {
        Some((v, c)) => (v.trim(), c.trim().to_string()),
        None => (trimmed.trim(), String::new()),
    };
    let value = match raw {
        "T" => CardValue::Logical(true),
        "F" => CardValue::Logical(false),
        _ => {
            if let Ok(v) = raw.parse::<i64>() {
                CardValue::Int(v)
            } else if let Ok(v) = raw.replace('D', "E").parse::<f64>() {
                CardValue::Float(v)
            } else {
                return Err(decode_error(offset, format!("unparseable value '{}'", raw)));
            }
        }
    };
    Ok((value, comment))
}

fn parse_card(image: &[u8], offset: usize) -> Result<Parsed, ContainerError> {
    if !image.iter().all(|b| (0x20..0x7f).contains(b)) {
        return Err(decode_error(offset, "header holds non-printable bytes"));
    }
    // all bytes are printable ASCII, so the image is valid UTF-8
    let text = std::str::from_utf8(image).map_err(|e| decode_error(offset, e.to_string()))?;
    let keyword = text[..KEYWORD_LEN].trim_end();
    if keyword == "END" {
        return Ok(Parsed::End);
    }
    if &text[KEYWORD_LEN..KEYWORD_LEN + 2] != "= " {
        return Ok(Parsed::Commentary);
    }
    let (value, comment) = parse_value(&text[KEYWORD_LEN + 2..], offset)?;
    Ok(Parsed::Card(Card::new(keyword, value, &comment)))
}

fn header_int(header: &Header, keyword: &str, offset: usize) -> Result<i64, ContainerError> {
    header
        .get_int(keyword)
        .ok_or_else(|| decode_error(offset, format!("missing integer keyword {}", keyword)))
}

/// A non-negative count or size keyword.
fn header_len(header: &Header, keyword: &str, offset: usize) -> Result<usize, ContainerError> {
    let value = header_int(header, keyword, offset)?;
    usize::try_from(value)
        .map_err(|_| decode_error(offset, format!("{} must not be negative, got {}", keyword, value)))
}

fn decode_cell(format: ColumnFormat, bytes: &[u8]) -> Cell {
    match format {
        ColumnFormat::Int16 => Cell::Int(i64::from(i16::from_be_bytes([bytes[0], bytes[1]]))),
        ColumnFormat::Int32 => {
            Cell::Int(i64::from(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
        }
        ColumnFormat::Int64 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[..8]);
            Cell::Int(i64::from_be_bytes(buf))
        }
        ColumnFormat::Float32 => Cell::Float(f64::from(f32::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
        ]))),
        ColumnFormat::Ascii(_) => {
            // characters after a NUL are not significant
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            Cell::Str(String::from_utf8_lossy(&bytes[..end]).trim_end().to_string())
        }
    }
}

fn decode_table(header: &Header, data: &[u8], offset: usize) -> Result<BinTable, ContainerError> {
    let row_width = header_len(header, "NAXIS1", offset)?;
    let rows = header_len(header, "NAXIS2", offset)?;
    let nfields = header_len(header, "TFIELDS", offset)?;
    if nfields > MAX_FIELDS {
        return Err(decode_error(
            offset,
            format!("TFIELDS is {}, at most {} columns are allowed", nfields, MAX_FIELDS),
        ));
    }

    let mut layout = Vec::with_capacity(nfields);
    for n in 1..=nfields {
        let name = header
            .get_str(&format!("TTYPE{}", n))
            .ok_or_else(|| decode_error(offset, format!("missing TTYPE{}", n)))?;
        let format: ColumnFormat = header
            .get_str(&format!("TFORM{}", n))
            .ok_or_else(|| decode_error(offset, format!("missing TFORM{}", n)))?
            .parse()?;
        layout.push(TableColumn::new(name, format, Vec::new()));
    }
    let declared: usize = layout.iter().map(|c| c.format.width()).sum();
    if declared != row_width {
        return Err(decode_error(
            offset,
            format!("NAXIS1 is {} but columns span {} bytes", row_width, declared),
        ));
    }

    for row in data.chunks_exact(row_width.max(1)).take(rows) {
        let mut at = 0;
        for column in layout.iter_mut() {
            let width = column.format.width();
            column.cells.push(decode_cell(column.format, &row[at..at + width]));
            at += width;
        }
    }
    BinTable::new(layout)
}

/// Decodes every unit in `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Vec<Hdu>, ContainerError> {
    let mut hdus = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let unit_start = offset;
        let mut header = Header::new();
        loop {
            let image = bytes
                .get(offset..offset + CARD_SIZE)
                .ok_or_else(|| decode_error(offset, "header ends without END card"))?;
            let parsed = parse_card(image, offset)?;
            offset += CARD_SIZE;
            match parsed {
                Parsed::End => break,
                Parsed::Commentary => {}
                Parsed::Card(card) => header.push(card),
            }
        }
        offset = unit_start + padded_len(offset - unit_start);

        let is_table = header.get_str("XTENSION").is_some();
        let data_len = if is_table {
            header_len(&header, "NAXIS1", offset)?
                .checked_mul(header_len(&header, "NAXIS2", offset)?)
                .ok_or_else(|| decode_error(offset, "data unit size overflows"))?
        } else {
            if header_int(&header, "NAXIS", offset)? != 0 {
                return Err(decode_error(offset, "primary data arrays are not supported"));
            }
            0
        };
        let data = offset
            .checked_add(data_len)
            .and_then(|end| bytes.get(offset..end))
            .ok_or_else(|| decode_error(offset, "data unit is truncated"))?;

        if let Some(stored) = header.remove(DATACRC) {
            let mut hasher = Hasher::new();
            hasher.update(data);
            let computed = hasher.finalize();
            let stored = stored.value.as_int().unwrap_or(-1);
            if stored != i64::from(computed) {
                return Err(ContainerError::ChecksumMismatch {
                    index: hdus.len(),
                    stored: stored as u32,
                    computed,
                });
            }
        }

        let table = if is_table {
            Some(decode_table(&header, data, offset)?)
        } else {
            None
        };
        offset += padded_len(data_len);
        hdus.push(Hdu::from_parts(header, table));
    }
    Ok(hdus)
}
