// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cloud_handler::CloudHandler;
use crate::csv_handler::CsvHandler;
use crate::data_types::DataSource;
use crate::error::ConfigError;
use crate::loader::TableSource;

/// Provision Dashboard - vessel provisioning orders at a glance
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Google Sheet URL to read provisioning records from
    #[arg(long, env = "PROVISION_SHEET_URL", conflicts_with = "csv")]
    pub sheet_url: Option<String>,

    /// Worksheet name (first worksheet when empty)
    #[arg(long, env = "PROVISION_SHEET_NAME", default_value = "")]
    pub sheet_name: String,

    /// Service-account key used to access the sheet
    #[arg(long, env = "PROVISION_CREDENTIALS", default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Local CSV export to read instead of a Google Sheet
    #[arg(long, env = "PROVISION_CSV")]
    pub csv: Option<PathBuf>,

    /// Seconds a fetched dataset is served before the source is read again
    #[arg(long, default_value_t = 60)]
    pub cache_ttl_secs: u64,

    /// Give up on a fetch after this many seconds
    #[arg(long, default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn data_source(&self) -> Result<DataSource, ConfigError> {
        match (&self.sheet_url, &self.csv) {
            (Some(url), _) => Ok(DataSource::Cloud {
                url: url.clone(),
                sheet_name: self.sheet_name.clone(),
            }),
            (None, Some(path)) => Ok(DataSource::Local(path.clone())),
            (None, None) => Err(ConfigError::NoSource),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn table_source(&self) -> Result<Box<dyn TableSource>, ConfigError> {
        Ok(match self.data_source()? {
            DataSource::Local(path) => Box::new(CsvHandler::new(path)),
            DataSource::Cloud { url, sheet_name } => {
                Box::new(CloudHandler::new(url, sheet_name, self.credentials.clone()))
            }
        })
    }
}
