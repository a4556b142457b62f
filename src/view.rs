//! Trade table view state: filters and sort order.
//!
//! View state is immutable; every change returns a new value which is then
//! handed to [`TradeQuery::search`](crate::queries::TradeQuery::search).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{TradeAction, TradeStatus};
use crate::stats::start_of_year;

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// Trade-date window relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    Ytd,
}

impl DateRange {
    /// Earliest included trade date, or `None` for no bound.
    pub fn since(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRange::All => None,
            DateRange::Last7Days => Some(today - Duration::days(7)),
            DateRange::Last30Days => Some(today - Duration::days(30)),
            DateRange::Last90Days => Some(today - Duration::days(90)),
            DateRange::Ytd => Some(start_of_year(today)),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Member,
    Ticker,
    TradeDate,
    Roi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::TradeDate,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Sorting by the current field flips direction; a new field starts
    /// descending.
    pub fn toggle(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                direction: self.direction.flip(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }

    /// ORDER BY clauses for the trade/member join (`t` / `m` aliases).
    ///
    /// Nulls sort last either way; trade id breaks ties.
    pub fn order_clauses(&self) -> Vec<String> {
        let dir = self.direction.as_sql();
        let primary = match self.field {
            SortField::Member => format!("m.name {} NULLS LAST", dir),
            SortField::Ticker => format!("t.ticker {}", dir),
            SortField::TradeDate => format!("CAST(t.trade_date AS DATE) {}", dir),
            SortField::Roi => format!("t.roi_percentage {} NULLS LAST", dir),
        };
        vec![primary, "t.id ASC".to_string()]
    }
}

// ---------------------------------------------------------------------------
// TradeFilter
// ---------------------------------------------------------------------------

/// Filters for the trade table. All set filters must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeFilter {
    /// Case-insensitive substring of ticker or member name.
    pub search: Option<String>,
    pub date_range: DateRange,
    pub member_id: Option<String>,
    pub ticker: Option<String>,
    pub party: Option<String>,
    pub chamber: Option<String>,
    pub action: Option<TradeAction>,
    pub status: Option<TradeStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

// ---------------------------------------------------------------------------
// TradeTableView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeTableView {
    pub filter: TradeFilter,
    pub sort: SortState,
}

impl TradeTableView {
    pub fn with_search(&self, term: &str) -> Self {
        let mut next = self.clone();
        let term = term.trim();
        next.filter.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        next
    }

    pub fn with_date_range(&self, range: DateRange) -> Self {
        let mut next = self.clone();
        next.filter.date_range = range;
        next
    }

    pub fn with_filter(&self, filter: TradeFilter) -> Self {
        Self {
            filter,
            sort: self.sort,
        }
    }

    pub fn toggle_sort(&self, field: SortField) -> Self {
        Self {
            filter: self.filter.clone(),
            sort: self.sort.toggle(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn toggle_same_field_flips() {
        let sort = SortState::default().toggle(SortField::TradeDate);
        assert_eq!(sort.direction, SortDirection::Asc);
        assert_eq!(sort.toggle(SortField::TradeDate).direction, SortDirection::Desc);
    }

    #[test]
    fn toggle_new_field_starts_descending() {
        let sort = SortState::default()
            .toggle(SortField::TradeDate)
            .toggle(SortField::Roi);
        assert_eq!(sort.field, SortField::Roi);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn date_range_bounds() {
        let today = day(2024, 6, 20);
        assert_eq!(DateRange::All.since(today), None);
        assert_eq!(DateRange::Last7Days.since(today), Some(day(2024, 6, 13)));
        assert_eq!(DateRange::Last30Days.since(today), Some(day(2024, 5, 21)));
        assert_eq!(DateRange::Last90Days.since(today), Some(day(2024, 3, 22)));
        assert_eq!(DateRange::Ytd.since(today), Some(day(2024, 1, 1)));
    }

    #[test]
    fn date_range_wire_names() {
        let r: DateRange = serde_json::from_str("\"30d\"").unwrap();
        assert_eq!(r, DateRange::Last30Days);
        let r: DateRange = serde_json::from_str("\"ytd\"").unwrap();
        assert_eq!(r, DateRange::Ytd);
    }

    #[test]
    fn view_updates_leave_original_untouched() {
        let view = TradeTableView::default();
        let next = view.with_search("  nvda ").toggle_sort(SortField::Ticker);
        assert_eq!(view.filter.search, None);
        assert_eq!(next.filter.search.as_deref(), Some("nvda"));
        assert_eq!(next.sort.field, SortField::Ticker);
        assert_eq!(view.with_search("   ").filter.search, None);
    }
}
