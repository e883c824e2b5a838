use crate::shared::errors::{AppError, AppResult};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub const USER_AGENT: &str = "Urbis-Import-Console/0.1";

/// Common HTTP plumbing for the import service adapters
pub struct CommonHttpHandler;

impl CommonHttpHandler {
    /// Create an HTTP client with consistent configuration
    pub fn create_http_client(timeout_secs: u64, user_agent: &str) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to create HTTP client: {}", e))
            })
    }

    /// Join a base URL and an absolute API path without doubling slashes
    pub fn join_url(base_url: &str, path: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Non-blank `message` field of a JSON error body
    pub fn extract_api_message(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Map a non-success status to an error, preferring the server's message
    pub fn status_to_app_error(status: StatusCode, body: &str) -> AppError {
        let message = Self::extract_api_message(body)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        match status {
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST => AppError::InvalidInput(message),
            _ if status.is_server_error() => AppError::ExternalServiceError(message),
            _ => AppError::ApiError(message),
        }
    }
}
