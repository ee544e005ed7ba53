//! CSV Data Loader Module
//! Parses uploaded CSV bytes into a Polars DataFrame.

use super::Dataset;
use crate::messages;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("CSV has no columns")]
    NoColumns,
}

impl LoaderError {
    /// Message shown to the user for any load failure.
    pub fn user_message(&self) -> &'static str {
        messages::PARSE_ERROR
    }
}

/// Cell texts read as missing, in addition to empty fields.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Strict CSV parser: malformed rows fail the whole upload.
#[derive(Debug, Clone)]
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl DataLoader {
    pub fn new(infer_schema_length: usize) -> Self {
        Self {
            infer_schema_length: infer_schema_length.max(1),
        }
    }

    /// Read a file from disk and parse it.
    pub fn load_path(&self, path: &Path) -> Result<Dataset, LoaderError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path).inspect_err(|e| {
            warn!("Could not read {}: {}", path.display(), e);
        })?;
        self.load_bytes(&name, bytes)
    }

    /// Parse an uploaded byte stream.
    pub fn load_bytes(&self, name: &str, bytes: Vec<u8>) -> Result<Dataset, LoaderError> {
        let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|&t| t.into()).collect());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .inspect_err(|e| warn!("CSV parse failed for {}: {}", name, e))?;

        if df.width() == 0 {
            warn!("CSV {} has no columns", name);
            return Err(LoaderError::NoColumns);
        }

        info!(
            "Loaded {}: {} rows, {} columns",
            name,
            df.height(),
            df.width()
        );
        Ok(Dataset::new(name, df))
    }
}
