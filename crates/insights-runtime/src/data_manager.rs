//! Caller-managed dataset cache.
//!
//! [`DatasetCache`] keeps the loaded ad and traffic datasets for the lifetime
//! of its owner. Entries are keyed by a [`SourceStamp`] of each input file
//! (path, length, modification time); a stamp mismatch reloads both files,
//! and [`DatasetCache::invalidate`] drops everything. Cached datasets are
//! never mutated after population.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use insights_core::error::{InsightsError, Result};
use insights_core::models::{AdDataset, TrafficDataset};
use insights_core::settings::SourcePaths;
use insights_data::reader::load_datasets;

// ── SourceStamp ───────────────────────────────────────────────────────────────

/// Identity of one input file at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStamp {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceStamp {
    /// Stat `path`. A missing file is a load error.
    pub fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                InsightsError::SourceNotFound(path.to_path_buf())
            } else {
                InsightsError::FileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(Self {
            path,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Both datasets plus the stamps they were loaded under.
#[derive(Debug, Clone)]
pub struct LoadedDatasets {
    pub ads: Arc<AdDataset>,
    pub traffic: Arc<TrafficDataset>,
    pub ads_stamp: SourceStamp,
    pub traffic_stamp: SourceStamp,
}

// ── DatasetCache ──────────────────────────────────────────────────────────────

/// Read-only cache over [`load_datasets`].
///
/// # Example
/// ```no_run
/// use insights_core::settings::SourcePaths;
/// use insights_runtime::data_manager::DatasetCache;
///
/// let mut cache = DatasetCache::new(SourcePaths::default());
/// let loaded = cache.get_or_load().expect("inputs present");
/// println!("{} ad rows", loaded.ads.len());
/// ```
pub struct DatasetCache {
    paths: SourcePaths,
    entry: Option<LoadedDatasets>,
    loads: u32,
}

impl DatasetCache {
    pub fn new(paths: SourcePaths) -> Self {
        Self {
            paths,
            entry: None,
            loads: 0,
        }
    }

    /// Return cached datasets while both source stamps still match,
    /// otherwise reload both files.
    ///
    /// A failed reload clears the cache and returns the error; stale data is
    /// never served.
    pub fn get_or_load(&mut self) -> Result<LoadedDatasets> {
        let ads_stamp = SourceStamp::of(&self.paths.ads);
        let traffic_stamp = SourceStamp::of(&self.paths.traffic);
        let (ads_stamp, traffic_stamp) = match (ads_stamp, traffic_stamp) {
            (Ok(a), Ok(t)) => (a, t),
            (Err(e), _) | (_, Err(e)) => {
                self.invalidate();
                return Err(e);
            }
        };

        if let Some(entry) = &self.entry {
            if entry.ads_stamp == ads_stamp && entry.traffic_stamp == traffic_stamp {
                tracing::debug!("returning cached datasets");
                return Ok(entry.clone());
            }
            tracing::info!("source files changed; reloading datasets");
        }

        match load_datasets(&self.paths) {
            Ok((ads, traffic)) => {
                self.loads += 1;
                tracing::debug!(
                    ad_rows = ads.len(),
                    traffic_rows = traffic.len(),
                    "dataset cache populated"
                );
                let entry = LoadedDatasets {
                    ads: Arc::new(ads),
                    traffic: Arc::new(traffic),
                    ads_stamp,
                    traffic_stamp,
                };
                self.entry = Some(entry.clone());
                Ok(entry)
            }
            Err(e) => {
                self.invalidate();
                Err(e)
            }
        }
    }

    /// Drop the cached datasets, forcing the next call to reload.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            tracing::debug!("dataset cache invalidated");
        }
    }

    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }

    /// Number of successful loads performed by this cache.
    pub fn load_count(&self) -> u32 {
        self.loads
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
