// src/loader.rs
//! Cache-aware loading of the provisioning dataset.
//!
//! The loader owns a single cache entry. Every caller inside the staleness
//! window shares the same `Arc<Dataset>`; the first call after expiry goes
//! back to the source.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::data_types::{Dataset, TableData};
use crate::error::DataSourceError;

pub const CACHE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A read-only provider of the raw provisioning table.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Short human-readable name of the source, used in logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<TableData, DataSourceError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    dataset: Arc<Dataset>,
    fetched_at: Instant,
}

pub struct DataLoader {
    source: Box<dyn TableSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    fetch_timeout: Duration,
    cache: RwLock<Option<CacheEntry>>,
}

impl DataLoader {
    pub fn new(source: Box<dyn TableSource>) -> Self {
        DataLoader {
            source,
            clock: Arc::new(SystemClock),
            ttl: CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cache: RwLock::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Returns the cached dataset if it is still inside the staleness window.
    pub fn cached(&self) -> Option<Arc<Dataset>> {
        let now = self.clock.now();
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .as_ref()
            .filter(|entry| now.saturating_duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.dataset))
    }

    /// Returns the current dataset, fetching it only when the cache is empty or stale.
    pub async fn load(&self) -> Result<Arc<Dataset>, DataSourceError> {
        if let Some(dataset) = self.cached() {
            debug!(records = dataset.len(), "serving cached dataset");
            return Ok(dataset);
        }

        let source = self.source.describe();
        debug!(%source, "fetching dataset");

        let table = tokio::time::timeout(self.fetch_timeout, self.source.fetch())
            .await
            .map_err(|_| DataSourceError::Timeout(self.fetch_timeout))
            .and_then(|result| result)?;

        let dataset = Arc::new(Dataset::from_table(table)?);
        let fetched_at = self.clock.now();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CacheEntry {
            dataset: Arc::clone(&dataset),
            fetched_at,
        });

        info!(%source, records = dataset.len(), "dataset refreshed");
        Ok(dataset)
    }
}
