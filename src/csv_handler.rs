// src/csv_handler.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use tokio::task;
use tracing::debug;

use crate::data_types::TableData;
use crate::error::DataSourceError;
use crate::loader::TableSource;

/// Reads provisioning records from a local CSV export.
pub struct CsvHandler {
    path: PathBuf,
}

impl CsvHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvHandler { path: path.into() }
    }

    fn read_csv(path: &Path) -> Result<TableData, DataSourceError> {
        let io_error = |source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Spreadsheet exports in some locales use semicolons
        let delimiter = Self::detect_delimiter(path).map_err(io_error)?;
        let file = File::open(path).map_err(io_error)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(file);

        let mut data = TableData::empty();
        data.headers = reader.headers()?.iter().map(String::from).collect();

        for result in reader.records() {
            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            data.rows.push(record.iter().map(String::from).collect());
        }

        debug!(path = %path.display(), rows = data.rows.len(), "read CSV");
        Ok(data)
    }

    fn detect_delimiter(path: &Path) -> std::io::Result<u8> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut first_line = String::new();
        reader.read_line(&mut first_line)?;

        Ok(if first_line.contains(';') { b';' } else { b',' })
    }
}

#[async_trait]
impl TableSource for CsvHandler {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<TableData, DataSourceError> {
        let path = self.path.clone();
        task::spawn_blocking(move || Self::read_csv(&path))
            .await
            .map_err(|e| DataSourceError::Worker(e.to_string()))?
    }
}
