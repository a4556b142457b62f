use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::amount::AmountRange;
use super::member::Member;
use crate::error::TradesError;

// ---------------------------------------------------------------------------
// TradeAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    Purchase,
    Sale,
    Exchange,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Purchase => "Purchase",
            TradeAction::Sale => "Sale",
            TradeAction::Exchange => "Exchange",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = TradesError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "purchase" => Ok(TradeAction::Purchase),
            "sale" => Ok(TradeAction::Sale),
            "exchange" => Ok(TradeAction::Exchange),
            other => Err(TradesError::InvalidArgument(format!(
                "unknown trade action: {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TradeStatus — disclosure processing state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Verified,
    Processing,
    Pending,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Verified => "verified",
            TradeStatus::Processing => "processing",
            TradeStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = TradesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verified" => Ok(TradeStatus::Verified),
            "processing" => Ok(TradeStatus::Processing),
            "pending" => Ok(TradeStatus::Pending),
            other => Err(TradesError::InvalidArgument(format!(
                "unknown trade status: {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Trade — A single disclosed transaction
// ---------------------------------------------------------------------------

/// A disclosed stock transaction, optionally joined with the member who
/// filed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub ticker: String,
    pub action: TradeAction,
    pub amount_range: String,
    pub trade_date: NaiveDate,
    pub disclosure_date: NaiveDate,
    #[serde(default)]
    pub roi_percentage: Option<f64>,
    pub status: TradeStatus,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
}

impl Trade {
    /// The recognized amount bracket, if the label matches one.
    pub fn amount(&self) -> Option<AmountRange> {
        AmountRange::parse(&self.amount_range)
    }

    /// Midpoint dollar estimate for this trade (0 for unrecognized labels).
    pub fn volume_estimate(&self) -> u64 {
        AmountRange::midpoint_of(&self.amount_range)
    }

    /// Signed ROI label, e.g. `"+12.3%"`, `"-2.1%"`, or `"N/A"`.
    pub fn roi_label(&self) -> String {
        match self.roi_percentage {
            Some(roi) if roi > 0.0 => format!("+{:.1}%", roi),
            Some(roi) => format!("{:.1}%", roi),
            None => "N/A".to_string(),
        }
    }

    /// Days between the trade and its public disclosure.
    pub fn disclosure_lag_days(&self) -> i64 {
        self.disclosure_date
            .signed_duration_since(self.trade_date)
            .num_days()
    }
}
