use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use roster_model::RawRow;

use crate::error::{IngestError, Result};
use crate::upload::{IngestLimits, UploadFile, check_media_type, decode_text};

/// Parsed upload: header row plus keyed data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl CsvTable {
    /// True when the file held no header (and therefore no data).
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

/// Give blank headers a positional name and suffix repeated ones so every
/// header is a distinct key.
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, header) in raw.iter().enumerate() {
        let base = if header.is_empty() {
            format!("Column {}", idx + 1)
        } else {
            header.clone()
        };
        let mut candidate = base.clone();
        let mut n = 2usize;
        while headers.iter().any(|existing| *existing == candidate) {
            candidate = format!("{base} ({n})");
            n += 1;
        }
        if candidate != *header {
            warn!(original = %header, renamed = %candidate, "renamed header");
        }
        headers.push(candidate);
    }
    headers
}

/// Parse delimited text into headers and rows.
///
/// Whitespace-only lines are skipped; the first remaining line is the header.
/// Empty input yields an empty table rather than an error.
pub fn parse_csv_text(text: &str, limits: &IngestLimits) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers = loop {
        let Some(record) = records.next() else {
            return Ok(CsvTable::default());
        };
        let record = record.map_err(malformed)?;
        if is_blank_line(&record) {
            continue;
        }
        let raw: Vec<String> = record.iter().map(normalize_header).collect();
        break unique_headers(&raw);
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(malformed)?;
        if is_blank_line(&record) {
            continue;
        }
        if rows.len() == limits.max_rows {
            return Err(IngestError::TooManyRows {
                limit: limits.max_rows,
            });
        }
        if record.len() > headers.len() {
            debug!(
                line = record.position().map_or(0, csv::Position::line),
                extra = record.len() - headers.len(),
                "dropping cells beyond header width"
            );
        }
        let mut row = RawRow::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).map(normalize_cell).unwrap_or_default();
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}

/// A whitespace-only physical line. Records with several empty cells (`,,`)
/// are data and are kept.
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|value| value.trim().is_empty())
}

fn malformed(error: csv::Error) -> IngestError {
    IngestError::Malformed {
        line: error.position().map_or(0, csv::Position::line),
        message: error.to_string(),
    }
}

/// Gate, decode, and parse an upload.
///
/// Nothing is parsed unless the media type is CSV and the size is within
/// `limits`.
pub fn ingest_upload(file: &UploadFile, limits: &IngestLimits) -> Result<CsvTable> {
    check_media_type(file)?;
    if file.size() > limits.max_bytes {
        return Err(IngestError::TooLarge {
            size: file.size(),
            limit: limits.max_bytes,
        });
    }
    let text = decode_text(&file.bytes)?;
    let table = parse_csv_text(text, limits)?;
    if table.is_empty() {
        info!(file = %file.file_name, "upload contains no data");
    } else {
        info!(
            file = %file.file_name,
            columns = table.headers.len(),
            rows = table.row_count(),
            "parsed upload"
        );
    }
    Ok(table)
}
