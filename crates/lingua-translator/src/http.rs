use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::TranslateError;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, TranslateError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("lingua/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(TranslateError::from)
}

/// Status plus the body parsed as JSON, `None` when the body is not JSON.
///
/// Services report errors as JSON on 4xx, so the body is read whatever the status.
pub(crate) async fn read_json(
    response: Response,
) -> Result<(StatusCode, Option<Value>), TranslateError> {
    let status = response.status();
    let body = response.text().await?;
    let json = serde_json::from_str(&body).ok();
    Ok((status, json))
}

/// Failure for a response that carried no translation
pub(crate) fn http_failure(status: StatusCode, service_message: Option<&str>) -> TranslateError {
    let message = match (service_message, status) {
        (Some(msg), _) => msg.to_string(),
        (None, StatusCode::TOO_MANY_REQUESTS) => "Rate limit exceeded (HTTP 429)".to_string(),
        (None, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            format!("Authentication failed (HTTP {})", status.as_u16())
        }
        (None, status) if !status.is_success() => format!("HTTP {status}"),
        (None, _) => "Translation failed".to_string(),
    };
    TranslateError::BackendFailure(message)
}
