// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Shared HTTP error translation for the service adapters.
//
// 401/403 become ApiError::Authentication; any other non-2xx becomes
// ApiError::Rejected carrying the service's own message.

use crate::domain::intake::AUTH_REQUIRED_MARKER;
use crate::domain::services::ApiError;
use reqwest::{Response, StatusCode};

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn network_error(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

pub(crate) async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_parts(status, &body)
}

pub(crate) fn error_from_parts(status: StatusCode, body: &str) -> ApiError {
    let message = extract_message(body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let detail = message
            .strip_prefix(AUTH_REQUIRED_MARKER)
            .map(|rest| rest.trim_start_matches(':').trim().to_string())
            .unwrap_or(message);
        let detail = if detail.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            detail
        };
        return ApiError::Authentication(detail);
    }

    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Pull a human-readable message out of an error body: the first of
/// `detail`, `message` or `error` when the body is a JSON object, the raw
/// text otherwise.
pub(crate) fn extract_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = map.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_handles_slashes() {
        assert_eq!(join_url("http://api/", "/bookings"), "http://api/bookings");
        assert_eq!(join_url("http://api", "bookings"), "http://api/bookings");
    }

    #[test]
    fn test_extract_message_prefers_json_fields() {
        assert_eq!(extract_message(r#"{"detail":"Duplicate booking"}"#), "Duplicate booking");
        assert_eq!(extract_message(r#"{"error":"bad date"}"#), "bad date");
        assert_eq!(extract_message("  plain text \n"), "plain text");
        assert_eq!(extract_message(r#"{"detail":[{"loc":"x"}]}"#), r#"{"detail":[{"loc":"x"}]}"#);
    }

    #[test]
    fn test_unauthorized_maps_to_authentication() {
        let err = error_from_parts(StatusCode::UNAUTHORIZED, r#"{"detail":"Authentication required: token expired"}"#);
        assert_eq!(err, ApiError::Authentication("token expired".to_string()));
        assert_eq!(err.to_string(), "Authentication required: token expired");

        let err = error_from_parts(StatusCode::FORBIDDEN, "");
        assert_eq!(err.to_string(), "Authentication required: HTTP 403");
    }

    #[test]
    fn test_other_status_maps_to_rejected() {
        let err = error_from_parts(StatusCode::CONFLICT, r#"{"message":"Duplicate booking"}"#);
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 409,
                message: "Duplicate booking".to_string(),
            }
        );
    }
}
