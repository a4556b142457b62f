//! Blocking client for the hosted PostgREST store.
//!
//! Two request shapes are used: row selects (`GET /rest/v1/{table}`) and
//! exact counts (`HEAD` with `Prefer: count=exact`, total read from the
//! `Content-Range` header). Failures are returned as-is; there is no retry.

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::config;
use crate::error::{Result, TradesError};
use crate::models::Trade;
use crate::stats::StatsSource;

/// Read-only client for the remote trade store.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
    page_size: usize,
}

impl RestClient {
    /// Create a client for the project at `base_url`
    /// (e.g. `https://project.supabase.co`).
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(TradesError::InvalidArgument(
                "store base URL is empty".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            page_size: config::DEFAULT_PAGE_SIZE,
        })
    }

    /// Rows requested per page by [`select`](Self::select).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, config::REST_PATH, table)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => req,
        }
    }

    /// Select rows from `table` with PostgREST query parameters
    /// (`select`, `order`, column filters such as `trade_date=gte.2024-01-01`).
    ///
    /// Reads page by page with `limit`/`offset` until a short page, so the
    /// server's `max-rows` cap never truncates the result. Without an
    /// explicit `order` the pages are ordered by `id`.
    pub fn select(&self, table: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let url = self.table_url(table);
        let mut base: Vec<(&str, &str)> = params.to_vec();
        if !base.iter().any(|(k, _)| *k == "order") {
            base.push(("order", "id.asc"));
        }
        let limit = self.page_size.to_string();

        let mut rows = Vec::new();
        loop {
            let offset = rows.len().to_string();
            tracing::debug!(%url, ?params, offset = %offset, "store select");
            let req = self
                .client
                .get(&url)
                .query(&base)
                .query(&[("limit", limit.as_str()), ("offset", offset.as_str())])
                .header("Accept", "application/json");
            let page: Vec<Value> = self.authorize(req).send()?.error_for_status()?.json()?;
            let done = page.len() < self.page_size;
            rows.extend(page);
            if done {
                return Ok(rows);
            }
        }
    }

    /// Exact row count of `table` after applying `filters`.
    pub fn count(&self, table: &str, filters: &[(&str, &str)]) -> Result<i64> {
        let url = self.table_url(table);
        let mut params = vec![("select", "*")];
        params.extend_from_slice(filters);

        let req = self
            .client
            .head(&url)
            .query(&params)
            .header("Prefer", "count=exact");
        let resp = self.authorize(req).send()?.error_for_status()?;

        let header = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                TradesError::NotFound(format!("no Content-Range in count response for {}", table))
            })?;
        parse_content_range_total(header).ok_or_else(|| {
            TradesError::InvalidArgument(format!("unusable Content-Range: {}", header))
        })
    }

    /// All trades joined with their members, most recent trade first.
    pub fn fetch_trades(&self) -> Result<Vec<Trade>> {
        let rows = self.select(
            config::TRADES_TABLE,
            &[("select", "*,member:members(*)"), ("order", "trade_date.desc,id.asc")],
        )?;
        let mut trades = Vec::with_capacity(rows.len());
        for row in rows {
            trades.push(serde_json::from_value(row)?);
        }
        Ok(trades)
    }

    /// Select one column and keep its non-null values.
    fn column(&self, table: &str, column: &str, filters: &[(&str, &str)]) -> Result<Vec<Value>> {
        let mut params = vec![("select", column)];
        params.extend_from_slice(filters);
        let rows = self.select(table, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| row.get_mut(column).map(Value::take))
            .filter(|v| !v.is_null())
            .collect())
    }
}

impl StatsSource for RestClient {
    fn member_count(&self) -> Result<i64> {
        self.count(config::MEMBERS_TABLE, &[])
    }

    fn trade_count_since(&self, since: NaiveDate) -> Result<i64> {
        let filter = format!("gte.{}", since);
        self.count(config::TRADES_TABLE, &[("trade_date", filter.as_str())])
    }

    fn roi_values(&self) -> Result<Vec<f64>> {
        let values = self.column(
            config::TRADES_TABLE,
            "roi_percentage",
            &[("roi_percentage", "not.is.null")],
        )?;
        Ok(values.iter().filter_map(Value::as_f64).collect())
    }

    fn amount_ranges(&self) -> Result<Vec<String>> {
        let values = self.column(config::TRADES_TABLE, "amount_range", &[])?;
        Ok(strings(values))
    }

    fn tickers(&self) -> Result<Vec<String>> {
        let values = self.column(config::TRADES_TABLE, "ticker", &[])?;
        Ok(strings(values))
    }
}

fn strings(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Total from a `Content-Range` header (`0-24/25`, `*/0`).
///
/// Returns `None` when the total is unknown (`0-24/*`) or malformed.
pub fn parse_content_range_total(header: &str) -> Option<i64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}
