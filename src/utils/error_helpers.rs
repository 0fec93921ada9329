//! Helpers that turn reqwest failures into [`ApiError`] with the endpoint attached.

use crate::error::ApiError;
use std::time::Duration;

/// Convert a reqwest send error
pub fn convert_request_error(
    error: reqwest::Error,
    endpoint: &str,
    timeout: Option<Duration>,
) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, timeout.map(|t| t.as_secs()).unwrap_or(0));
    }

    match error.status() {
        Some(status) => ApiError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
        None => ApiError::Transport {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
    }
}

pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert JSON deserialization errors
pub fn convert_json_error(error: serde_json::Error, endpoint: &str) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Build the error for a non-2xx response
pub fn convert_status_error(status: u16, endpoint: &str, body: String) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized {
            status,
            endpoint: endpoint.to_string(),
            server_message: body,
        },
        _ => ApiError::Http {
            status,
            endpoint: endpoint.to_string(),
            message: body,
        },
    }
}
