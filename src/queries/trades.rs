//! Trade queries against the cached `trades` and `members` tables.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{Member, Trade, TradeAction, TradeStatus};
use crate::sql_builder::SqlBuilder;
use crate::stats::local_today;
use crate::view::{SortState, TradeFilter};

const TRADE_COLUMNS: &[&str] = &[
    "t.id",
    "t.ticker",
    "t.action",
    "t.amount_range",
    "t.trade_date",
    "t.disclosure_date",
    "t.roi_percentage",
    "t.status",
    "t.pdf_url",
    "t.member_id",
    "m.name AS member_name",
    "m.party AS member_party",
    "m.state AS member_state",
    "m.chamber AS member_chamber",
];

const MEMBER_JOIN: &str = "LEFT JOIN members m ON t.member_id = m.id";

/// Flat row of the trade/member join.
#[derive(Deserialize)]
struct TradeRow {
    id: String,
    ticker: String,
    action: TradeAction,
    amount_range: String,
    trade_date: NaiveDate,
    disclosure_date: NaiveDate,
    roi_percentage: Option<f64>,
    status: TradeStatus,
    pdf_url: Option<String>,
    member_id: Option<String>,
    member_name: Option<String>,
    member_party: Option<String>,
    member_state: Option<String>,
    member_chamber: Option<String>,
}

impl From<TradeRow> for Trade {
    fn from(row: TradeRow) -> Self {
        // A dangling member_id leaves every joined column NULL
        let member = match (&row.member_id, row.member_name) {
            (Some(id), Some(name)) => Some(Member {
                id: id.clone(),
                name,
                party: row.member_party.unwrap_or_default(),
                state: row.member_state.unwrap_or_default(),
                chamber: row.member_chamber.unwrap_or_default(),
            }),
            _ => None,
        };
        Trade {
            id: row.id,
            ticker: row.ticker,
            action: row.action,
            amount_range: row.amount_range,
            trade_date: row.trade_date,
            disclosure_date: row.disclosure_date,
            roi_percentage: row.roi_percentage,
            status: row.status,
            pdf_url: row.pdf_url,
            member_id: row.member_id,
            member,
        }
    }
}

// ---------------------------------------------------------------------------
// TradeQuery
// ---------------------------------------------------------------------------

/// Query interface for disclosed trades, joined with their members.
pub struct TradeQuery<'a> {
    conn: &'a Connection,
}

impl<'a> TradeQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn base(&self) -> Result<SqlBuilder> {
        self.conn.ensure_tables(&["trades", "members"])?;
        let mut qb = SqlBuilder::new("trades t");
        qb.select(TRADE_COLUMNS).join(MEMBER_JOIN);
        Ok(qb)
    }

    fn fetch(&self, qb: &SqlBuilder) -> Result<Vec<Trade>> {
        let (sql, params) = qb.build();
        let rows: Vec<TradeRow> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().map(Trade::from).collect())
    }

    /// All trades, most recent trade date first.
    pub fn list(&self, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<Trade>> {
        let mut qb = self.base()?;
        qb.order_by(SortState::default().order_clauses().as_slice());
        if let Some(l) = limit {
            qb.limit(l);
        }
        if let Some(o) = offset {
            qb.offset(o);
        }
        self.fetch(&qb)
    }

    /// A single trade by id.
    pub fn get(&self, id: &str) -> Result<Option<Trade>> {
        let mut qb = self.base()?;
        qb.where_eq("t.id", id).limit(1);
        Ok(self.fetch(&qb)?.into_iter().next())
    }

    /// Filter and sort trades.
    ///
    /// Date windows are relative to `today` (local date when `None`).
    /// Defaults to 100 rows from offset 0.
    pub fn search(
        &self,
        filter: &TradeFilter,
        sort: &SortState,
        today: Option<NaiveDate>,
    ) -> Result<Vec<Trade>> {
        let mut qb = self.base()?;

        if let Some(term) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            qb.where_contains_any(&["t.ticker", "m.name"], term.trim());
        }

        let today = today.unwrap_or_else(local_today);
        if let Some(since) = filter.date_range.since(today) {
            qb.where_clause(
                "CAST(t.trade_date AS DATE) >= CAST(? AS DATE)",
                &[&since.to_string()],
            );
        }

        if let Some(ref member_id) = filter.member_id {
            qb.where_eq("t.member_id", member_id);
        }
        if let Some(ref ticker) = filter.ticker {
            qb.where_ieq("t.ticker", ticker);
        }
        if let Some(ref party) = filter.party {
            qb.where_eq("m.party", party);
        }
        if let Some(ref chamber) = filter.chamber {
            qb.where_ieq("m.chamber", chamber);
        }
        if let Some(action) = filter.action {
            qb.where_eq("t.action", action.as_str());
        }
        if let Some(status) = filter.status {
            qb.where_eq("t.status", status.as_str());
        }

        qb.order_by(sort.order_clauses().as_slice());
        qb.limit(filter.limit.unwrap_or(100));
        qb.offset(filter.offset.unwrap_or(0));

        self.fetch(&qb)
    }

    /// Distinct ticker symbols, alphabetical.
    pub fn tickers(&self) -> Result<Vec<String>> {
        self.conn.ensure_tables(&["trades"])?;
        let (sql, params) = SqlBuilder::new("trades")
            .select(&["ticker"])
            .distinct()
            .order_by(&["ticker ASC"])
            .build();
        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.get("ticker").and_then(|v| v.as_str()).map(String::from))
            .collect())
    }

    /// Number of trades by a member.
    pub fn count_by_member(&self, member_id: &str) -> Result<i64> {
        self.conn.ensure_tables(&["trades"])?;
        let (sql, params) = SqlBuilder::new("trades")
            .select(&["COUNT(*) AS cnt"])
            .where_eq("member_id", member_id)
            .build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }
}
