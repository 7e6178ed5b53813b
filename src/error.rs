// src/error.rs
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to obtain a complete dataset from the configured source.
///
/// A fetch either yields a whole `Dataset` or one of these; callers never see
/// a partially populated table.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read credentials {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("Google Sheets request failed: {0}")]
    Sheets(String),

    #[error("invalid spreadsheet URL: {0}")]
    InvalidSpreadsheetUrl(String),

    #[error("required column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("source returned no header row")]
    EmptyTable,

    #[error("fetch did not complete within {0:?}")]
    Timeout(Duration),

    #[error("background worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no data source configured: pass --sheet-url or --csv")]
    NoSource,
}
