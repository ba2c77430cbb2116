//! Terminal command handlers (reconnect, SMS)

use axum::extract::{Path, State};
use axum::Json;
use cellconn_core::Iccid;
use serde::Deserialize;

use super::{required, CommandResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    /// Needed by vendors that address SIMs by phone number
    #[serde(default)]
    pub msisdn: String,
    pub text: String,
}

/// POST /api/v1/terminals/{iccid}/reconnect
pub async fn reconnect(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    let success = state
        .service()
        .reconnect_terminal(&Iccid::from(iccid))
        .await?;
    Ok(Json(CommandResponse { success }))
}

/// POST /api/v1/terminals/{iccid}/sms
///
/// Responds once the vendor has reported the outcome, which for
/// asynchronous vendors means after delivery is confirmed.
pub async fn send_sms(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
    Json(request): Json<SendSmsRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let text = required("text", &request.text)?;
    let success = state
        .service()
        .send_sms(&Iccid::from(iccid), &request.msisdn, text)
        .await?;
    Ok(Json(CommandResponse { success }))
}
