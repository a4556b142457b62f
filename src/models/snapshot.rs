use chrono::NaiveDate;
use std::collections::HashMap;

use super::member::Member;
use super::trade::Trade;
use crate::error::Result;
use crate::stats::StatsSource;

// ---------------------------------------------------------------------------
// TradeSnapshot — In-memory trade and member collections
// ---------------------------------------------------------------------------

/// Trade and member records held in memory.
///
/// Trades are joined with their members on construction (by `member_id`),
/// and kept ordered by trade date, most recent first.
#[derive(Debug, Clone, Default)]
pub struct TradeSnapshot {
    pub trades: Vec<Trade>,
    pub members: Vec<Member>,
}

impl TradeSnapshot {
    pub fn new(mut trades: Vec<Trade>, members: Vec<Member>) -> Self {
        let by_id: HashMap<&str, &Member> =
            members.iter().map(|m| (m.id.as_str(), m)).collect();

        for trade in &mut trades {
            if trade.member.is_none() {
                trade.member = trade
                    .member_id
                    .as_deref()
                    .and_then(|id| by_id.get(id))
                    .map(|m| (*m).clone());
            }
        }
        trades.sort_by(|a, b| b.trade_date.cmp(&a.trade_date));

        Self { trades, members }
    }

    /// Find a trade by id.
    pub fn trade(&self, id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }
}

impl StatsSource for TradeSnapshot {
    fn member_count(&self) -> Result<i64> {
        Ok(self.members.len() as i64)
    }

    fn trade_count_since(&self, since: NaiveDate) -> Result<i64> {
        Ok(self.trades.iter().filter(|t| t.trade_date >= since).count() as i64)
    }

    fn roi_values(&self) -> Result<Vec<f64>> {
        Ok(self.trades.iter().filter_map(|t| t.roi_percentage).collect())
    }

    fn amount_ranges(&self) -> Result<Vec<String>> {
        Ok(self.trades.iter().map(|t| t.amount_range.clone()).collect())
    }

    fn tickers(&self) -> Result<Vec<String>> {
        Ok(self.trades.iter().map(|t| t.ticker.clone()).collect())
    }
}
