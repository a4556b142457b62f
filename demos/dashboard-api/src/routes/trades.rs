use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use congress_trades_sdk::{SortDirection, SortField, SortState, TradeFilter};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

const MAX_LIMIT: usize = 1000;

#[derive(Deserialize)]
pub struct SortParams {
    pub sort: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl SortParams {
    /// Defaults to trade date, most recent first.
    fn into_state(self) -> SortState {
        let default = SortState::default();
        SortState {
            field: self.sort.unwrap_or(default.field),
            direction: self.direction.unwrap_or(default.direction),
        }
    }
}

/// GET /api/trades?search=nvda&date_range=ytd&party=R&sort=roi&direction=desc
///
/// Filtered, sorted trade table. Filters are the fields of `TradeFilter`.
pub async fn list_trades(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TradeFilter>,
    Query(sort): Query<SortParams>,
) -> Result<Json<Value>, AppError> {
    if filter.limit.is_some_and(|l| l > MAX_LIMIT) {
        return Err(AppError::bad_request(format!(
            "limit must be at most {}",
            MAX_LIMIT
        )));
    }

    let sort = sort.into_state();
    let trades = state
        .sdk
        .run(move |s| s.trades().search(&filter, &sort, None))
        .await?;

    let count = trades.len();
    Ok(Json(json!({ "data": trades, "count": count })))
}

/// GET /api/trades/{id}
pub async fn get_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let trade = state.sdk.run(move |s| s.trades().get(&id)).await?;

    match trade {
        Some(t) => {
            let lag = t.disclosure_lag_days();
            let roi = t.roi_label();
            Ok(Json(json!({
                "data": t,
                "disclosure_lag_days": lag,
                "roi_label": roi
            })))
        }
        None => Err(AppError::not_found("Trade not found")),
    }
}

/// GET /api/tickers
pub async fn list_tickers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let tickers = state.sdk.run(|s| s.trades().tickers()).await?;
    let count = tickers.len();
    Ok(Json(json!({ "data": tickers, "count": count })))
}
