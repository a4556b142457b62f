//! Async wrapper around [`TradesSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use congress_trades_sdk::AsyncTradesSdk;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncTradesSdk::builder().build().await.unwrap();
//!
//!     let stats = sdk.stats(None).await.unwrap();
//!     let recent = sdk.run(|s| s.trades().list(Some(10), None)).await.unwrap();
//! }
//! ```

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, TradesError};
use crate::models::TradeStats;
use crate::{TradesSdk, TradesSdkBuilder};

// ---------------------------------------------------------------------------
// AsyncTradesSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncTradesSdk`]; mirrors [`TradesSdkBuilder`].
#[derive(Default)]
pub struct AsyncTradesSdkBuilder {
    inner: TradesSdkBuilder,
}

impl AsyncTradesSdkBuilder {
    /// Start from `CONGRESS_TRADES_URL` / `CONGRESS_TRADES_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            inner: TradesSdkBuilder::from_env(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.inner = self.inner.api_key(key);
        self
    }

    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.cache_dir(path);
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.inner = self.inner.offline(offline);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.inner = self.inner.max_age(max_age);
        self
    }

    /// Build the async SDK.
    ///
    /// Initialization runs on the blocking thread pool, since the blocking
    /// HTTP client must not be created on an async worker.
    pub async fn build(self) -> Result<AsyncTradesSdk> {
        let builder = self.inner;
        tokio::task::spawn_blocking(move || {
            let sdk = builder.build()?;
            Ok(AsyncTradesSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| TradesError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncTradesSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`TradesSdk`].
///
/// The underlying [`TradesSdk`] is protected by a [`Mutex`] since it uses
/// `RefCell` internally; operations run one at a time.
#[derive(Clone)]
pub struct AsyncTradesSdk {
    inner: Arc<Mutex<TradesSdk>>,
}

impl AsyncTradesSdk {
    pub fn builder() -> AsyncTradesSdkBuilder {
        AsyncTradesSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&TradesSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| TradesError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| TradesError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Dashboard summary from the cached snapshots.
    pub async fn stats(&self, today: Option<NaiveDate>) -> Result<TradeStats> {
        self.run(move |s| s.stats(today)).await
    }

    /// Dashboard summary computed live against the store.
    pub async fn live_stats(&self, today: Option<NaiveDate>) -> Result<TradeStats> {
        self.run(move |s| s.live_stats(today)).await
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |s| s.sql(&query, &params)).await
    }

    /// Re-sync snapshots if stale.
    pub async fn refresh(&self) -> Result<bool> {
        self.run(|s| s.refresh()).await
    }

    /// Close the SDK, releasing all resources.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let sdk = self
                .inner
                .lock()
                .map_err(|_| TradesError::InvalidArgument("SDK lock poisoned".into()))?;
            drop(sdk);
            Ok(())
        })
        .await
        .map_err(|e| TradesError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
