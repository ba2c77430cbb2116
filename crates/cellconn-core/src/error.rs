//! Common error types for vendor clients

use thiserror::Error;

/// Result type for vendor client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in vendor clients
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Vendor rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Terminal (SIM) not known to the vendor
    #[error("Terminal not found: {0}")]
    TerminalNotFound(String),

    /// Service request id not known to the vendor
    #[error("Service request not found: {0}")]
    RequestNotFound(String),

    /// Operation not supported by this vendor
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Vendor refused the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport/communication error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Timeout waiting for the vendor
    #[error("Operation timed out")]
    Timeout,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::Auth(_) => 502,
            ClientError::TerminalNotFound(_) => 404,
            ClientError::RequestNotFound(_) => 404,
            ClientError::NotSupported(_) => 501,
            ClientError::InvalidRequest(_) => 400,
            ClientError::Transport(_) => 503,
            ClientError::Timeout => 504,
            ClientError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ClientError::TerminalNotFound("x".into()).status_code(), 404);
        assert_eq!(ClientError::Transport("down".into()).status_code(), 503);
        assert_eq!(ClientError::Timeout.status_code(), 504);
    }

    #[test]
    fn display_includes_detail() {
        let err = ClientError::Auth("bad api key".into());
        assert_eq!(err.to_string(), "Authentication failed: bad api key");
    }
}
