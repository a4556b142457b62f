//! Congressional trade disclosures SDK for Rust.
//!
//! Provides a high-level client for the hosted trade-disclosure store.
//! The `trades` and `members` tables are downloaded through the store's
//! PostgREST API, cached locally as compressed NDJSON snapshots, and queried
//! in-process via DuckDB. Dashboard statistics can be computed from the cache
//! or live against the store.
//!
//! # Quick start
//!
//! ```no_run
//! use congress_trades_sdk::TradesSdk;
//!
//! let sdk = TradesSdk::builder()
//!     .base_url("https://project.supabase.co")
//!     .api_key("anon-key")
//!     .build()
//!     .unwrap();
//!
//! let stats = sdk.stats(None).unwrap();
//! println!("{} trades this year, avg ROI {}", stats.trades_ytd, stats.avg_roi_label());
//!
//! let recent = sdk.trades().list(Some(20), None).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod rest;
pub mod sql_builder;
pub mod stats;
pub mod view;

#[cfg(feature = "async")]
pub use async_client::AsyncTradesSdk;
pub use cache::CacheManager;
pub use connection::Connection;
pub use error::{Result, TradesError};
pub use models::{AmountRange, Member, Trade, TradeAction, TradeSnapshot, TradeStats, TradeStatus};
pub use rest::RestClient;
pub use sql_builder::SqlBuilder;
pub use stats::StatsSource;
pub use view::{DateRange, SortDirection, SortField, SortState, TradeFilter, TradeTableView};

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// TradesSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`TradesSdk`] instance.
///
/// Use [`TradesSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](TradesSdkBuilder::build) to create the SDK.
#[derive(Debug, Clone)]
pub struct TradesSdkBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    max_age: Duration,
}

impl Default for TradesSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            max_age: config::DEFAULT_MAX_AGE,
        }
    }
}

impl TradesSdkBuilder {
    /// Start from the environment: `CONGRESS_TRADES_URL` and
    /// `CONGRESS_TRADES_API_KEY`, when set.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(url) = std::env::var(config::ENV_BASE_URL) {
            builder.base_url = Some(url);
        }
        if let Ok(key) = std::env::var(config::ENV_API_KEY) {
            builder.api_key = Some(key);
        }
        builder
    }

    /// Base URL of the hosted project (the REST path is appended).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// API key sent as `apikey` and bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/congress-trades-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When offline, the SDK never contacts the store and only uses
    /// previously cached snapshots. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// HTTP request timeout. Defaults to 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long snapshots stay fresh. Defaults to 15 minutes.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Build the SDK, initializing the cache and DuckDB connection.
    ///
    /// Nothing is downloaded eagerly; snapshots are fetched on first query.
    pub fn build(self) -> Result<TradesSdk> {
        let rest = self
            .base_url
            .as_deref()
            .map(|url| RestClient::new(url, self.api_key.clone(), self.timeout))
            .transpose()?;
        let cache = CacheManager::new(self.cache_dir, self.offline, rest.clone(), self.max_age)?;
        let conn = Connection::new(cache)?;
        Ok(TradesSdk { conn, rest })
    }
}

// ---------------------------------------------------------------------------
// TradesSdk
// ---------------------------------------------------------------------------

/// The main entry point for the trades SDK.
///
/// Wraps a [`Connection`] (which owns the [`CacheManager`] and DuckDB database)
/// and exposes query interfaces as lightweight borrowing wrappers.
pub struct TradesSdk {
    conn: Connection,
    rest: Option<RestClient>,
}

impl TradesSdk {
    pub fn builder() -> TradesSdkBuilder {
        TradesSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the trade query interface.
    pub fn trades(&self) -> queries::TradeQuery<'_> {
        queries::TradeQuery::new(&self.conn)
    }

    /// Access the member query interface.
    pub fn members(&self) -> queries::MemberQuery<'_> {
        queries::MemberQuery::new(&self.conn)
    }

    /// Access the cached statistics reads.
    pub fn stats_query(&self) -> queries::StatsQuery<'_> {
        queries::StatsQuery::new(&self.conn)
    }

    // -- Statistics --------------------------------------------------------

    /// Dashboard summary computed from the cached snapshots.
    ///
    /// `today` fixes the year-to-date boundary; `None` uses the local date.
    pub fn stats(&self, today: Option<NaiveDate>) -> Result<TradeStats> {
        self.stats_query().summary(today)
    }

    /// Dashboard summary computed directly against the store, with the five
    /// reads issued concurrently.
    pub fn live_stats(&self, today: Option<NaiveDate>) -> Result<TradeStats> {
        if self.conn.cache.borrow().offline {
            return Err(TradesError::InvalidArgument(
                "live statistics are unavailable in offline mode".to_string(),
            ));
        }
        let rest = self.rest()?;
        stats::aggregate_concurrent(rest, today)
    }

    /// Load the cached snapshots into memory, with trades joined to members.
    pub fn snapshot(&self) -> Result<TradeSnapshot> {
        let cache = self.conn.cache.borrow();
        let trades: Vec<Trade> = cache.load_records(config::TRADES_TABLE)?;
        let members: Vec<Member> = cache.load_records(config::MEMBERS_TABLE)?;
        Ok(TradeSnapshot::new(trades, members))
    }

    // -- Metadata and utility methods --------------------------------------

    /// The live store client, if a base URL was configured.
    pub fn rest(&self) -> Result<&RestClient> {
        self.rest.as_ref().ok_or_else(|| {
            TradesError::InvalidArgument(format!(
                "no store URL configured (set {})",
                config::ENV_BASE_URL
            ))
        })
    }

    /// Return the list of currently loaded DuckDB tables.
    pub fn tables(&self) -> Vec<String> {
        self.conn.tables()
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// Tables are loaded lazily, so call a query method (or
    /// [`Connection::ensure_tables`]) first.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Re-sync snapshots if they are stale and reload tables.
    ///
    /// Returns `true` if new data was downloaded. Always `false` offline.
    pub fn refresh(&self) -> Result<bool> {
        let cache = self.conn.cache.borrow();
        if cache.offline || !cache.is_stale() {
            return Ok(false);
        }
        cache.sync()?;
        self.conn.reset_tables();
        tracing::info!("snapshots were stale; re-synced and tables reset");
        Ok(true)
    }

    /// Consume the SDK and release all resources.
    pub fn close(self) {
        drop(self);
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for TradesSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.conn.tables();
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "TradesSdk(store={}, cache_dir={}, tables=[{}], offline={})",
            self.rest.as_ref().map(|r| r.base_url()).unwrap_or("none"),
            cache.cache_dir.display(),
            tables.join(", "),
            cache.offline
        )
    }
}
