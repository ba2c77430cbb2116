//! SIM lifecycle handlers

use axum::extract::{Path, State};
use axum::Json;
use cellconn_core::{Iccid, SimState};
use serde::Deserialize;

use super::{required, CommandResponse, ItemsResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSimStateRequest {
    /// Target state by its uniform name (e.g. "Activated", "Pause")
    pub state: String,
}

/// GET /api/v1/terminals/{iccid}/sim-states
pub async fn list_sim_states(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
) -> Result<Json<ItemsResponse<SimState>>, ApiError> {
    let states = state
        .service()
        .get_available_sim_states(&Iccid::from(iccid))
        .await?;
    Ok(Json(states.into()))
}

/// GET /api/v1/terminals/{iccid}/sim-states/{current}/targets
pub async fn list_target_states(
    State(state): State<AppState>,
    Path((iccid, current)): Path<(String, String)>,
) -> Result<Json<ItemsResponse<SimState>>, ApiError> {
    let targets = state
        .service()
        .get_valid_target_states(&Iccid::from(iccid), &current)
        .await?;
    Ok(Json(targets.into()))
}

/// PUT /api/v1/terminals/{iccid}/sim-state
pub async fn update_sim_state(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
    Json(request): Json<UpdateSimStateRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let target = required("state", &request.state)?;
    let success = state
        .service()
        .update_sim_state(&Iccid::from(iccid), target)
        .await?;
    Ok(Json(CommandResponse { success }))
}
