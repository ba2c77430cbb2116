//! Errors surfaced by the uniform connectivity API

use cellconn_core::{ClientError, ProviderIdentity};
use thiserror::Error;

/// Result type for uniform operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors returned by the dispatcher and the connectivity service
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// No client registered for the provider, provider tag unrecognized, or
    /// credentials could not be resolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The active provider does not implement the operation
    #[error("Operation '{operation}' is not supported by provider '{provider}'")]
    UnsupportedOperation {
        operation: &'static str,
        provider: ProviderIdentity,
    },

    /// Input cannot be mapped into a vendor request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fault raised by the vendor client
    #[error("Vendor fault from '{provider}': {source}")]
    Vendor {
        provider: ProviderIdentity,
        #[source]
        source: ClientError,
    },
}

impl GatewayError {
    /// Whether retrying the same call can succeed.
    ///
    /// Misconfiguration, missing capabilities and invalid input are
    /// permanent; vendor faults are left to the caller to judge.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, GatewayError::Vendor { .. })
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Configuration(_) => 500,
            GatewayError::UnsupportedOperation { .. } => 501,
            GatewayError::Validation(_) => 400,
            GatewayError::Vendor { source, .. } => source.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_operation_and_provider() {
        let err = GatewayError::UnsupportedOperation {
            operation: "get_locale",
            provider: ProviderIdentity::Jasper,
        };
        assert_eq!(
            err.to_string(),
            "Operation 'get_locale' is not supported by provider 'jasper'"
        );
        assert!(err.is_permanent());
        assert_eq!(err.status_code(), 501);
    }

    #[test]
    fn vendor_faults_are_not_permanent() {
        let err = GatewayError::Vendor {
            provider: ProviderIdentity::Ericsson,
            source: ClientError::Transport("connection reset".into()),
        };
        assert!(!err.is_permanent());
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn configuration_is_server_error() {
        let err = GatewayError::Configuration("no client for provider 'jasper'".into());
        assert!(err.is_permanent());
        assert_eq!(err.status_code(), 500);
    }
}
