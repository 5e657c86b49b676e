//! Raw source resolution and loading.
//!
//! A logical table name resolves to an exact `<name>.csv` under the raw
//! directory when one exists; otherwise the first `.csv` entry whose file
//! name contains the logical name case-insensitively is used. Required tables
//! abort the run with [`SourceError::Missing`] when nothing resolves; the
//! optional deliveries table resolves to `None` instead.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::info;
use thiserror::Error;

use crate::{io_utils, schema::TableSpec};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no raw CSV found for '{0}'; place a file for it under the raw directory")]
    Missing(String),
}

/// One raw extract as read from disk: untyped header strings and cell
/// strings, alive only within a single pipeline run.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn resolve(raw_dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let exact = raw_dir.join(format!("{name}.csv"));
    if exact.is_file() {
        return Ok(Some(exact));
    }
    let entries =
        fs::read_dir(raw_dir).with_context(|| format!("Reading raw directory {raw_dir:?}"))?;
    for entry in entries {
        let path = entry.context("Reading raw directory entry")?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lowered = file_name.to_ascii_lowercase();
        if lowered.ends_with(".csv") && lowered.contains(name) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

pub fn load(path: &Path, encoding: &'static Encoding) -> Result<RawTable> {
    let mut reader = io_utils::open_csv_reader(path)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.into_byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} of {path:?}", idx + 2))?;
        rows.push(io_utils::decode_record(&record, encoding)?);
    }
    Ok(RawTable { headers, rows })
}

pub fn load_required(
    raw_dir: &Path,
    spec: &TableSpec,
    encoding: &'static Encoding,
) -> Result<RawTable> {
    match resolve(raw_dir, spec.name)? {
        Some(path) => {
            info!("Resolved '{}' to {:?}", spec.name, path);
            load(&path, encoding)
        }
        None => Err(SourceError::Missing(spec.name.to_string()).into()),
    }
}

pub fn load_optional(
    raw_dir: &Path,
    spec: &TableSpec,
    encoding: &'static Encoding,
) -> Result<Option<RawTable>> {
    match resolve(raw_dir, spec.name)? {
        Some(path) => {
            info!("Resolved '{}' to {:?}", spec.name, path);
            Ok(Some(load(&path, encoding)?))
        }
        None => {
            info!("No raw source for optional table '{}'", spec.name);
            Ok(None)
        }
    }
}
