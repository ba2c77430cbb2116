//! Terminal inventory handlers

use axum::extract::{Path, State};
use axum::Json;
use cellconn_core::{Iccid, SessionInfo, Terminal};

use super::ItemsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/v1/terminals
pub async fn list_terminals(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<Iccid>>, ApiError> {
    let iccids = state.service().list_terminals().await?;
    Ok(Json(iccids.into()))
}

/// GET /api/v1/terminals/{iccid}
pub async fn get_terminal(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
) -> Result<Json<Terminal>, ApiError> {
    let terminal = state.service().get_terminal(&Iccid::from(iccid)).await?;
    Ok(Json(terminal))
}

/// GET /api/v1/terminals/{iccid}/sessions
/// Data sessions, most recent last
pub async fn get_sessions(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
) -> Result<Json<ItemsResponse<SessionInfo>>, ApiError> {
    let sessions = state.service().get_sessions(&Iccid::from(iccid)).await?;
    Ok(Json(sessions.into()))
}
