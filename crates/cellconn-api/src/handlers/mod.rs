//! HTTP request handlers
//!
//! Handlers only translate between HTTP and the connectivity service; all
//! vendor selection happens in the dispatcher.

pub mod commands;
pub mod locale;
pub mod packages;
pub mod provider;
pub mod states;
pub mod terminals;

use serde::Serialize;

/// Collection wrapper used by list endpoints
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for ItemsResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// Outcome of a command forwarded to the vendor
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub success: bool,
}

/// Reject empty or whitespace-only body fields before any vendor call
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, crate::ApiError> {
    if value.trim().is_empty() {
        Err(crate::ApiError::BadRequest(format!(
            "Field '{}' must not be empty",
            field
        )))
    } else {
        Ok(value)
    }
}
