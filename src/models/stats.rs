use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TradeStats — Dashboard summary, derived on every computation
// ---------------------------------------------------------------------------

/// Summary figures derived from the trade and member collections.
///
/// Purely derived state: it is rebuilt from scratch on each aggregation and
/// carries no identity. `last_update` records when the summary was assembled,
/// not when any underlying query ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    #[serde(rename = "totalMembers")]
    pub total_members: i64,
    #[serde(rename = "tradesYTD")]
    pub trades_ytd: i64,
    #[serde(rename = "avgROI")]
    pub avg_roi: f64,
    #[serde(rename = "totalVolume")]
    pub total_volume: u64,
    #[serde(rename = "activeTickers")]
    pub active_tickers: i64,
    #[serde(rename = "lastUpdate")]
    pub last_update: DateTime<Utc>,
}

impl TradeStats {
    /// Average ROI with one decimal, e.g. `"4.0%"`.
    pub fn avg_roi_label(&self) -> String {
        format!("{:.1}%", self.avg_roi)
    }

    /// Total volume in millions with one decimal, e.g. `"$3.0M"`.
    pub fn volume_label(&self) -> String {
        format!("${:.1}M", self.total_volume as f64 / 1_000_000.0)
    }
}
