//! CSV decoding and parsing.
//!
//! Turns the downloaded bytes into a [`RawTable`] of named columns, then
//! projects the dataset columns into [`RawRow`]s. Nothing dataset-specific
//! happens here beyond the column projection.

use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;
use crate::error::{CsvError, CsvResult};
use crate::models::RawRow;

const UTF8_BOM: &str = "\u{feff}";

/// Declared text encoding of the input bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Strict UTF-8; invalid sequences are an error.
    Utf8,
    /// ISO-8859-1.
    Latin1,
    /// ISO-8859-15 (Latin-1 with the euro sign).
    Latin9,
    Windows1252,
    /// Detect with chardet, then decode.
    #[default]
    Auto,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "iso-8859-1",
            TextEncoding::Latin9 => "iso-8859-15",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Auto => "auto",
        }
    }
}

impl std::str::FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf-8" | "utf8" | "ascii" => Ok(TextEncoding::Utf8),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(TextEncoding::Latin1),
            "iso-8859-15" | "latin-9" | "latin9" => Ok(TextEncoding::Latin9),
            "windows-1252" | "cp1252" => Ok(TextEncoding::Windows1252),
            "auto" => Ok(TextEncoding::Auto),
            other => Err(format!("Unsupported encoding: {}", other)),
        }
    }
}

/// Parsed CSV: header plus records padded to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Project every record onto the four dataset columns.
    ///
    /// Empty cells and absent columns both become `None`.
    pub fn raw_rows(&self, columns: &ColumnNames) -> Vec<RawRow> {
        let region = self.column_index(&columns.region);
        let total = self.column_index(&columns.total_national);
        let period = self.column_index(&columns.period);
        let value = self.column_index(&columns.value);

        self.records
            .iter()
            .map(|record| RawRow {
                region_name: cell(record, region),
                total_national: cell(record, total),
                period: cell(record, period),
                value: cell(record, value),
            })
            .collect()
    }
}

fn cell(record: &[String], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .filter(|v| !v.is_empty())
        .cloned()
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => TextEncoding::Utf8,
        "iso-8859-1" | "latin-1" | "latin1" => TextEncoding::Latin1,
        "iso-8859-15" => TextEncoding::Latin9,
        _ => TextEncoding::Windows1252,
    }
}

/// Decode bytes using the declared encoding.
///
/// A leading UTF-8 BOM is dropped.
pub fn decode_content(bytes: &[u8], encoding: TextEncoding) -> CsvResult<(String, TextEncoding)> {
    let encoding = match encoding {
        TextEncoding::Auto => detect_encoding(bytes),
        declared => declared,
    };

    let text = match encoding {
        TextEncoding::Utf8 | TextEncoding::Auto => std::str::from_utf8(bytes)
            .map_err(|e| CsvError::EncodingError(format!("invalid UTF-8: {}", e)))?
            .to_string(),
        // WHATWG decoder for the iso-8859-1 label; same printable range.
        TextEncoding::Latin1 | TextEncoding::Windows1252 => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        TextEncoding::Latin9 => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
    };

    let text = match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    };

    Ok((text, encoding))
}

/// Parse CSV text with an explicit delimiter.
///
/// Ragged lines are tolerated: short rows are padded with empty cells and
/// extra trailing fields are dropped. Blank lines are skipped.
///
/// # Example
/// ```ignore
/// use smokestats::parser::parse_table;
///
/// let table = parse_table("name;age\nAlice;30\nBob", b';').unwrap();
///
/// assert_eq!(table.records.len(), 2);
/// assert_eq!(table.records[1], vec!["Bob", ""]);
/// ```
pub fn parse_table(text: &str, delimiter: u8) -> CsvResult<RawTable> {
    if text.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(String::from)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let width = headers.len();
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(parse_error)?;
        let mut row: Vec<String> = record.iter().take(width).map(String::from).collect();
        row.resize(width, String::new());
        records.push(row);
    }

    Ok(RawTable { headers, records })
}

fn parse_error(e: csv::Error) -> CsvError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    CsvError::ParseError {
        line,
        message: e.to_string(),
    }
}
