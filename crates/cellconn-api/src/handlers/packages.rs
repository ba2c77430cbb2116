//! Subscription package handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use cellconn_core::{Iccid, SubscriptionPackage};
use serde::Deserialize;

use super::{required, CommandResponse, ItemsResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PackagesQuery {
    /// Package the terminal is on now; excluded from the result
    #[serde(default)]
    pub current: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePackageRequest {
    pub package: String,
}

/// GET /api/v1/terminals/{iccid}/packages?current=
pub async fn list_packages(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
    Query(query): Query<PackagesQuery>,
) -> Result<Json<ItemsResponse<SubscriptionPackage>>, ApiError> {
    let packages = state
        .service()
        .get_available_packages(&Iccid::from(iccid), &query.current)
        .await?;
    Ok(Json(packages.into()))
}

/// PUT /api/v1/terminals/{iccid}/package
pub async fn update_package(
    State(state): State<AppState>,
    Path(iccid): Path<String>,
    Json(request): Json<UpdatePackageRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let package = required("package", &request.package)?;
    let success = state
        .service()
        .update_subscription_package(&Iccid::from(iccid), package)
        .await?;
    Ok(Json(CommandResponse { success }))
}
