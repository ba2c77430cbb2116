//! Provider and credential handlers

use axum::extract::State;
use axum::Json;
use cellconn_gateway::ProviderInfo;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ValidateCredentialsResponse {
    pub valid: bool,
}

/// GET /api/v1/provider
/// Active provider and its capabilities, resolved from current credentials
pub async fn get_provider(State(state): State<AppState>) -> Result<Json<ProviderInfo>, ApiError> {
    let info = state.service().provider_info().await?;
    Ok(Json(info))
}

/// GET /api/v1/credentials/validate
pub async fn validate_credentials(
    State(state): State<AppState>,
) -> Result<Json<ValidateCredentialsResponse>, ApiError> {
    let valid = state.service().validate_credentials().await?;
    Ok(Json(ValidateCredentialsResponse { valid }))
}
