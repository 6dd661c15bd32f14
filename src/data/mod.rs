//! Loaders for the three static dashboard inputs.
//!
//! Each loader parses its file to the expected shape and fails with a
//! [`DataError`] naming the file (and line, for CSV rows) otherwise.

pub mod demographics;
pub mod geo;
pub mod incidents;
pub mod quality;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

pub use demographics::{load_demographics, StateDemographics};
pub use geo::{load_boundaries, Boundaries};
pub use incidents::{load_incidents, Incident, IncidentTable, REQUIRED_INCIDENT_COLUMNS};
pub use quality::{analyze_csv, default_manifest_path, file_sha256, DatasetManifest};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: no header row")]
    Empty { path: String },
    #[error("{path}: missing column `{column}`")]
    MissingColumn { path: String, column: String },
    #[error("{path}:{line}: {reason}")]
    MalformedRow {
        path: String,
        line: usize,
        reason: String,
    },
    #[error("{path}: invalid GeoJSON: {reason}")]
    BadGeoJson { path: String, reason: String },
}

impl DataError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Split one CSV line into fields.
///
/// Handles double-quoted fields (with `""` as an escaped quote) so values such
/// as `"Springfield, IL"` stay a single field. Records spanning several lines
/// are not supported.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Header row of a CSV file with column lookup by name.
#[derive(Debug, Clone)]
pub struct CsvHeader {
    pub columns: Vec<String>,
}

impl CsvHeader {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require(&self, path: &Path, name: &str) -> Result<usize, DataError> {
        self.index_of(name).ok_or_else(|| DataError::MissingColumn {
            path: path.display().to_string(),
            column: name.to_string(),
        })
    }
}

/// A parsed data row together with its 1-based line number in the file.
#[derive(Debug, Clone)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRecord {
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    /// Field at `idx`, treating an empty value as absent.
    pub fn non_empty(&self, idx: Option<usize>) -> Option<String> {
        idx.and_then(|i| self.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Read a whole CSV file: the first non-blank line is the header, the rest
/// are records. Blank lines and `#` comments are skipped.
pub fn read_csv(path: &Path) -> Result<(CsvHeader, Vec<CsvRecord>), DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut header: Option<CsvHeader> = None;
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DataError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if header.is_none() {
            header = Some(CsvHeader {
                columns: split_csv_line(trimmed.trim_start_matches('\u{feff}')),
            });
        } else {
            records.push(CsvRecord {
                line: idx + 1,
                fields: split_csv_line(trimmed),
            });
        }
    }

    let header = header.ok_or_else(|| DataError::Empty {
        path: path.display().to_string(),
    })?;
    Ok((header, records))
}
