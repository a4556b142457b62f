use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListMembersParams {
    pub chamber: Option<String>,
}

/// GET /api/members?chamber=Senate
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListMembersParams>,
) -> Result<Json<Value>, AppError> {
    let members = state
        .sdk
        .run(move |s| s.members().list(params.chamber.as_deref()))
        .await?;

    let count = members.len();
    Ok(Json(json!({ "data": members, "count": count })))
}

/// GET /api/members/{id}
///
/// A member together with their number of disclosed trades.
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let found = state
        .sdk
        .run(move |s| {
            let member = s.members().get(&id)?;
            let trades = s.trades().count_by_member(&id)?;
            Ok(member.map(|m| (m, trades)))
        })
        .await?;

    match found {
        Some((member, trades)) => Ok(Json(json!({ "data": member, "trade_count": trades }))),
        None => Err(AppError::not_found("Member not found")),
    }
}
