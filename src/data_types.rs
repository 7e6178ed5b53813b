// src/data_types.rs
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::error::DataSourceError;

pub const VENDOR_COLUMN: &str = "Vendor";
pub const ORDER_STATUS_COLUMN: &str = "Order_Status";
pub const ETA_COLUMN: &str = "ETA";

const ETA_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Local(PathBuf),
    Cloud { url: String, sheet_name: String },
}

/// Raw table as delivered by a source handler, before any columns are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn empty() -> Self {
        TableData {
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// One vessel's provisioning order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub vendor: String,
    pub order_status: String,
    pub eta: Option<NaiveDateTime>,
    /// Every cell of the source row, in header order.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    eta_index: usize,
}

impl Dataset {
    /// Interprets a raw table. Fails as a whole if a required column is missing.
    pub fn from_table(table: TableData) -> Result<Dataset, DataSourceError> {
        if table.headers.is_empty() {
            return Err(DataSourceError::EmptyTable);
        }

        let vendor_index = column_index(&table.headers, VENDOR_COLUMN)?;
        let status_index = column_index(&table.headers, ORDER_STATUS_COLUMN)?;
        let eta_index = column_index(&table.headers, ETA_COLUMN)?;
        let width = table.headers.len();

        let records = table
            .rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width.max(cells.len()), String::new());
                let eta = parse_eta(&cells[eta_index]);
                if eta.is_none() && !cells[eta_index].trim().is_empty() {
                    warn!(value = %cells[eta_index], "unrecognised ETA, treating as empty");
                }
                Record {
                    vendor: cells[vendor_index].clone(),
                    order_status: cells[status_index].clone(),
                    eta,
                    cells,
                }
            })
            .collect();

        Ok(Dataset {
            headers: table.headers,
            records,
            eta_index,
        })
    }

    /// Same columns, different rows.
    pub fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            headers: self.headers.clone(),
            records,
            eta_index: self.eta_index,
        }
    }

    pub fn eta_index(&self) -> usize {
        self.eta_index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn column_index(headers: &[String], name: &'static str) -> Result<usize, DataSourceError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(DataSourceError::MissingColumn(name))
}

/// Parses an ETA cell as a wall-clock timestamp. Blank or unknown formats give `None`.
pub fn parse_eta(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    ETA_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
