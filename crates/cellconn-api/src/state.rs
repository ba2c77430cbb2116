//! Application state for the REST API

use cellconn_gateway::ConnectivityService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service: ConnectivityService,
}

impl AppState {
    pub fn new(service: ConnectivityService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ConnectivityService {
        &self.service
    }
}
