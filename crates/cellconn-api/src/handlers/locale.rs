//! Locale handlers
//!
//! Locale changes are asynchronous on the vendor side: `PUT` returns a
//! service request id which is polled through `/service-requests/{id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cellconn_core::{Iccid, LocaleInfo, ServiceRequestState};
use serde::{Deserialize, Serialize};

use super::required;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetLocaleRequest {
    pub locale: String,
}

#[derive(Debug, Serialize)]
pub struct SetLocaleResponse {
    pub request_id: String,
    pub href: String,
}

/// GET /api/v1/terminals/{iccid}/locale
pub async fn get_locale(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
) -> Result<Json<LocaleInfo>, ApiError> {
    let info = state.service().get_locale(&Iccid::from(iccid)).await?;
    Ok(Json(info))
}

/// PUT /api/v1/terminals/{iccid}/locale
pub async fn set_locale(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
    Json(request): Json<SetLocaleRequest>,
) -> Result<(StatusCode, Json<SetLocaleResponse>), ApiError> {
    let locale = required("locale", &request.locale)?;
    let request_id = state
        .service()
        .set_locale(&Iccid::from(iccid), locale)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SetLocaleResponse {
            href: format!("/api/v1/service-requests/{}", request_id),
            request_id,
        }),
    ))
}

/// GET /api/v1/service-requests/{request_id}
pub async fn get_service_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ServiceRequestState>, ApiError> {
    let status = state
        .service()
        .get_locale_change_status(&request_id)
        .await?;
    Ok(Json(status))
}
