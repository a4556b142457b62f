//! Local snapshot cache of the remote trade store.
//!
//! Each mirrored table is stored as gzip-compressed NDJSON under
//! `<cache_dir>/snapshots/`. The time of the last full sync is kept in
//! `fetched_at.txt`; snapshots older than `max_age` are stale and are
//! re-downloaded together on next access.

use crate::config;
use crate::error::{Result, TradesError};
use crate::rest::RestClient;
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Downloads and caches table snapshots from the remote store.
pub struct CacheManager {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never contact the store (use cached snapshots only).
    pub offline: bool,
    max_age: Duration,
    rest: Option<RestClient>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist. `rest` may be `None`
    /// when no store is configured; only already-cached snapshots are usable then.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        rest: Option<RestClient>,
        max_age: Duration,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            max_age,
            rest,
        })
    }

    fn rest(&self) -> Result<&RestClient> {
        self.rest.as_ref().ok_or_else(|| {
            TradesError::InvalidArgument(format!(
                "no store URL configured (set {})",
                config::ENV_BASE_URL
            ))
        })
    }

    /// When the snapshots were last synced, if ever.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        let stamp = fs::read_to_string(self.cache_dir.join("fetched_at.txt")).ok()?;
        DateTime::parse_from_rfc3339(stamp.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    fn save_fetched_at(&self, at: DateTime<Utc>) -> Result<()> {
        fs::write(self.cache_dir.join("fetched_at.txt"), at.to_rfc3339())?;
        Ok(())
    }

    /// True if snapshots were never synced or are older than `max_age`.
    pub fn is_stale(&self) -> bool {
        match self.fetched_at() {
            None => true,
            Some(at) => match (Utc::now() - at).to_std() {
                Ok(age) => age > self.max_age,
                // Timestamp in the future: clock skew, treat as fresh.
                Err(_) => false,
            },
        }
    }

    /// Path of the cached snapshot for `table`.
    pub fn snapshot_path(&self, table: &str) -> Result<PathBuf> {
        let filename = config::snapshot_file(table).ok_or_else(|| {
            TradesError::NotFound(format!("Unknown snapshot table: {}", table))
        })?;
        Ok(self.cache_dir.join(filename))
    }

    /// Re-download every mirrored table and stamp the sync time.
    pub fn sync(&self) -> Result<()> {
        if self.offline {
            return Err(TradesError::InvalidArgument(
                "cannot sync snapshots in offline mode".to_string(),
            ));
        }
        for table in config::snapshot_tables() {
            let dest = self.snapshot_path(table)?;
            self.download_table(table, &dest)?;
        }
        self.save_fetched_at(Utc::now())
    }

    /// Download a single table into a snapshot file.
    ///
    /// Writes to a temp file first and renames on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download_table(&self, table: &str, dest: &Path) -> Result<()> {
        let rest = self.rest()?;
        tracing::info!(table, url = rest.base_url(), "downloading snapshot");

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_dest = dest.with_extension("gz.tmp");

        let result = (|| -> Result<()> {
            let rows = rest.select(table, &[("select", "*")])?;
            write_ndjson_gz(&tmp_dest, &rows)?;
            fs::rename(&tmp_dest, dest)?;
            tracing::debug!(table, rows = rows.len(), "snapshot written");
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Ensure a table snapshot is cached locally, downloading if needed.
    ///
    /// A stale cache triggers a full [`sync`](Self::sync) so all tables stay
    /// consistent with each other.
    pub fn ensure_snapshot(&self, table: &str) -> Result<PathBuf> {
        let local_path = self.snapshot_path(table)?;

        if self.offline {
            if local_path.exists() {
                return Ok(local_path);
            }
            return Err(TradesError::NotFound(format!(
                "Snapshot for {} not cached and offline mode is enabled",
                table
            )));
        }

        // A missing table re-syncs everything so the snapshots share one stamp
        if self.is_stale() || !local_path.exists() {
            self.sync()?;
        }

        Ok(local_path)
    }

    /// Load a table snapshot and decode each row into `T`.
    ///
    /// If the snapshot is corrupt (truncated download, disk error), it is
    /// deleted so the next call re-downloads a fresh copy.
    pub fn load_records<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let path = self.ensure_snapshot(table)?;

        match read_ndjson_gz(&path) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt snapshot, removing");
                let _ = fs::remove_file(&path);
                Err(TradesError::NotFound(format!(
                    "Snapshot '{}' was corrupt and has been removed. \
                     Retry to re-download. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

/// Write rows as gzip-compressed NDJSON.
pub fn write_ndjson_gz(path: &Path, rows: &[Value]) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    for row in rows {
        serde_json::to_writer(&mut encoder, row)?;
        encoder.write_all(b"\n")?;
    }
    encoder.finish()?.flush()?;
    Ok(())
}

/// Read gzip-compressed NDJSON, skipping blank lines.
pub fn read_ndjson_gz<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(GzDecoder::new(BufReader::new(fs::File::open(path)?)));
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}
