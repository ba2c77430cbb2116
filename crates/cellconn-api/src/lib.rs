//! cellconn-api - REST API over the uniform connectivity service
//!
//! Every route maps onto one [`ConnectivityService`] operation. The service
//! resolves the active vendor per call, so the router itself is
//! vendor-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use cellconn_api::{create_router, AppState};
//!
//! let service = ConnectivityService::new(credentials, registry);
//! let router = create_router(AppState::new(service));
//! axum::serve(listener, router).await?;
//! ```
//!
//! [`ConnectivityService`]: cellconn_gateway::ConnectivityService

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        // Provider and credentials
        .route("/api/v1/provider", get(handlers::provider::get_provider))
        .route(
            "/api/v1/credentials/validate",
            get(handlers::provider::validate_credentials),
        )
        // Terminals
        .route(
            "/api/v1/terminals",
            get(handlers::terminals::list_terminals),
        )
        .route(
            "/api/v1/terminals/{iccid}",
            get(handlers::terminals::get_terminal),
        )
        .route(
            "/api/v1/terminals/{iccid}/sessions",
            get(handlers::terminals::get_sessions),
        )
        // SIM lifecycle
        .route(
            "/api/v1/terminals/{iccid}/sim-states",
            get(handlers::states::list_sim_states),
        )
        .route(
            "/api/v1/terminals/{iccid}/sim-states/{current}/targets",
            get(handlers::states::list_target_states),
        )
        .route(
            "/api/v1/terminals/{iccid}/sim-state",
            put(handlers::states::update_sim_state),
        )
        // Subscription packages
        .route(
            "/api/v1/terminals/{iccid}/packages",
            get(handlers::packages::list_packages),
        )
        .route(
            "/api/v1/terminals/{iccid}/package",
            put(handlers::packages::update_package),
        )
        // Commands
        .route(
            "/api/v1/terminals/{iccid}/reconnect",
            post(handlers::commands::reconnect),
        )
        .route(
            "/api/v1/terminals/{iccid}/sms",
            post(handlers::commands::send_sms),
        )
        // Locale
        .route(
            "/api/v1/terminals/{iccid}/locale",
            get(handlers::locale::get_locale).put(handlers::locale::set_locale),
        )
        .route(
            "/api/v1/service-requests/{request_id}",
            get(handlers::locale::get_service_request),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
