use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use congress_trades_sdk::TradeStats;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StatsParams {
    /// Compute against the store instead of the local snapshots.
    #[serde(default)]
    pub live: bool,
}

/// GET /api/stats?live=true
///
/// Dashboard summary: member count, trades this year, average ROI, estimated
/// volume and distinct tickers.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<TradeStats>, AppError> {
    let stats = if params.live {
        state.sdk.live_stats(None).await?
    } else {
        state.sdk.stats(None).await?
    };
    Ok(Json(stats))
}
