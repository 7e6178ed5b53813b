// src/cloud_handler.rs
use std::path::PathBuf;

use async_trait::async_trait;
use google_sheets4::api::ValueRange;
use google_sheets4::{hyper, hyper_rustls, Sheets};
use serde_json::Value;
use tokio::task;
use tracing::debug;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::data_types::{TableData, VENDOR_COLUMN};
use crate::error::DataSourceError;
use crate::loader::TableSource;

type SheetsHub = Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

/// Reads provisioning records from a Google Sheet with a service-account key.
pub struct CloudHandler {
    spreadsheet_url: String,
    sheet_name: String,
    credentials_path: PathBuf,
}

impl CloudHandler {
    pub fn new(
        spreadsheet_url: impl Into<String>,
        sheet_name: impl Into<String>,
        credentials_path: impl Into<PathBuf>,
    ) -> Self {
        CloudHandler {
            spreadsheet_url: spreadsheet_url.into(),
            sheet_name: sheet_name.into(),
            credentials_path: credentials_path.into(),
        }
    }

    async fn authenticate(&self) -> Result<SheetsHub, DataSourceError> {
        let json = tokio::fs::read_to_string(&self.credentials_path)
            .await
            .map_err(|source| DataSourceError::Credentials {
                path: self.credentials_path.clone(),
                source,
            })?;

        let service_account_key: ServiceAccountKey =
            serde_json::from_str(&json).map_err(|e| DataSourceError::Auth(e.to_string()))?;

        let auth = ServiceAccountAuthenticator::builder(service_account_key)
            .build()
            .await
            .map_err(|e| DataSourceError::Auth(e.to_string()))?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_only()
            .enable_http1()
            .build();

        Ok(Sheets::new(hyper::Client::builder().build(connector), auth))
    }

    fn range(&self) -> String {
        // Without a sheet name the API reads the first worksheet
        let sheet = self.sheet_name.trim();
        if sheet.is_empty() {
            "A:Z".to_string()
        } else {
            format!("{}!A:Z", sheet)
        }
    }
}

#[async_trait]
impl TableSource for CloudHandler {
    fn describe(&self) -> String {
        format!("sheets:{}", self.spreadsheet_url)
    }

    async fn fetch(&self) -> Result<TableData, DataSourceError> {
        let spreadsheet_id = extract_spreadsheet_id(&self.spreadsheet_url)?;
        let sheets = self.authenticate().await?;

        let range = self.range();
        debug!(spreadsheet_id, %range, "requesting sheet values");
        let (_, response) = sheets
            .spreadsheets()
            .values_get(spreadsheet_id, &range)
            .doit()
            .await
            .map_err(|e| DataSourceError::Sheets(e.to_string()))?;

        task::spawn_blocking(move || process_values(response))
            .await
            .map_err(|e| DataSourceError::Worker(e.to_string()))
    }
}

/// URLs look like `https://docs.google.com/spreadsheets/d/<SPREADSHEET_ID>/edit`.
pub fn extract_spreadsheet_id(url: &str) -> Result<&str, DataSourceError> {
    let parts: Vec<&str> = url.split('/').collect();

    parts
        .windows(2)
        .find(|pair| pair[0] == "d" && !pair[1].is_empty())
        .map(|pair| pair[1])
        .ok_or_else(|| DataSourceError::InvalidSpreadsheetUrl(url.to_string()))
}

fn process_values(response: ValueRange) -> TableData {
    let mut data = TableData::empty();

    let values: Vec<Vec<String>> = response
        .values
        .unwrap_or_default()
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let Some(start_index) = find_header_row(&values) else {
        return data;
    };

    data.headers = values[start_index].clone();
    data.rows = values
        .into_iter()
        .skip(start_index + 1)
        .filter(|row| !row.iter().all(|cell| cell.trim().is_empty()))
        .collect();

    data
}

/// The first row with a `Vendor` cell, or the first non-blank row.
fn find_header_row(values: &[Vec<String>]) -> Option<usize> {
    values
        .iter()
        .position(|row| row.iter().any(|cell| cell.trim() == VENDOR_COLUMN))
        .or_else(|| {
            values
                .iter()
                .position(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
