//! Statistics reads against the cached DuckDB tables.

use chrono::NaiveDate;
use serde_json::Value;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::TradeStats;
use crate::sql_builder::SqlBuilder;
use crate::stats::{self, StatsSource};

/// The five summary reads, answered from the local snapshot tables.
pub struct StatsQuery<'a> {
    conn: &'a Connection,
}

impl<'a> StatsQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Dashboard summary over the cached data.
    pub fn summary(&self, today: Option<NaiveDate>) -> Result<TradeStats> {
        stats::aggregate(self, today)
    }

    fn count(&self, qb: &mut SqlBuilder) -> Result<i64> {
        let (sql, params) = qb.select(&["COUNT(*) AS cnt"]).build();
        Ok(self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }

    fn column(&self, column: &str, non_null: bool) -> Result<Vec<Value>> {
        self.conn.ensure_tables(&["trades"])?;
        let mut qb = SqlBuilder::new("trades");
        qb.select(&[column]);
        if non_null {
            qb.where_not_null(column);
        }
        let (sql, params) = qb.build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|mut r| r.remove(column))
            .collect())
    }
}

impl StatsSource for StatsQuery<'_> {
    fn member_count(&self) -> Result<i64> {
        self.conn.ensure_tables(&["members"])?;
        self.count(&mut SqlBuilder::new("members"))
    }

    fn trade_count_since(&self, since: NaiveDate) -> Result<i64> {
        self.conn.ensure_tables(&["trades"])?;
        let mut qb = SqlBuilder::new("trades");
        qb.where_clause(
            "CAST(trade_date AS DATE) >= CAST(? AS DATE)",
            &[&since.to_string()],
        );
        self.count(&mut qb)
    }

    fn roi_values(&self) -> Result<Vec<f64>> {
        Ok(self
            .column("roi_percentage", true)?
            .iter()
            .filter_map(Value::as_f64)
            .collect())
    }

    fn amount_ranges(&self) -> Result<Vec<String>> {
        Ok(self
            .column("amount_range", false)?
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect())
    }

    fn tickers(&self) -> Result<Vec<String>> {
        Ok(self
            .column("ticker", false)?
            .into_iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect())
    }
}
