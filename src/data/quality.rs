use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{read_csv, DataError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub bad_rows: u64,
    pub columns: Vec<String>,
    pub missing_columns: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

impl DatasetManifest {
    pub fn ok(&self) -> bool {
        self.missing_columns.is_empty() && self.bad_rows == 0
    }
}

/// Fingerprint a CSV input and count rows whose field count disagrees with
/// the header.
pub fn analyze_csv(
    path: &Path,
    required: &[&str],
    now_ts: u64,
) -> Result<DatasetManifest, DataError> {
    let hash = file_sha256(path)?;
    let (header, records) = read_csv(path)?;

    let mut warnings = Vec::new();
    let mut bad_rows = 0u64;
    for rec in &records {
        if rec.fields.len() != header.columns.len() {
            bad_rows += 1;
            warnings.push(format!(
                "bad_row: line {} has {} fields, header has {}",
                rec.line,
                rec.fields.len(),
                header.columns.len()
            ));
        }
    }
    if records.is_empty() {
        warnings.push("no_rows".to_string());
    }

    let missing_columns = required
        .iter()
        .filter(|c| header.index_of(c).is_none())
        .map(|c| c.to_string())
        .collect();

    Ok(DatasetManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        row_count: records.len() as u64,
        bad_rows,
        columns: header.columns,
        missing_columns,
        warnings,
        generated_at_epoch: now_ts,
    })
}

pub fn file_sha256(path: &Path) -> Result<String, DataError> {
    let mut file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| DataError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}
