//! Success-envelope HTTP client
//!
//! Every service endpoint answers with `{success, data, errorCode,
//! errorMsg}`. The business `success` flag, not the transport status code,
//! decides logical success: a 2xx response with `success=false` is still a
//! failure. Transport failures and malformed bodies are normalized into the
//! same [`ApiResponse`] shape so callers have exactly one failure path.

use std::time::Duration;

use serde_json::Value;

use goban_core::error::{HarnessError, Result};
use goban_core::types::Session;

/// Cap on retained raw bodies for failure diagnostics
const RAW_BODY_LIMIT: usize = 1000;

/// How a request failed, when it did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Request succeeded at the business level
    None,
    /// Connection, timeout or request construction failure
    Transport,
    /// HTTP status >= 400
    Http,
    /// Body was not valid JSON
    MalformedBody,
    /// Envelope carried `success=false`
    Business,
}

/// Parsed success envelope, one shape for success and every failure
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub success: bool,
    pub status: u16,
    pub data: Option<Value>,
    pub error_code: Option<i64>,
    pub error_msg: Option<String>,
    /// Truncated raw body, retained only on failure
    pub raw: Option<String>,
    pub failure: FailureKind,
}

impl ApiResponse {
    fn transport_failure(message: String) -> Self {
        Self {
            success: false,
            status: 0,
            data: None,
            error_code: None,
            error_msg: Some(message),
            raw: None,
            failure: FailureKind::Transport,
        }
    }

    /// Typed error for a failed response
    pub fn to_error(&self) -> HarnessError {
        let message = self
            .error_msg
            .clone()
            .unwrap_or_else(|| "unspecified failure".to_string());

        match self.failure {
            FailureKind::None => HarnessError::Internal("error requested for a success".into()),
            FailureKind::Transport | FailureKind::Http => HarnessError::Transport(message),
            FailureKind::MalformedBody => HarnessError::MalformedResponse(message),
            FailureKind::Business => HarnessError::Rejected {
                code: self.error_code,
                message,
            },
        }
    }

    /// Success data, or the typed failure
    pub fn into_result(self) -> Result<Option<Value>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.to_error())
        }
    }
}

/// Parse a transport-level response into the envelope shape
pub fn parse_envelope(status: u16, body: &str) -> ApiResponse {
    let truncated = || Some(body.chars().take(RAW_BODY_LIMIT).collect::<String>());

    if status >= 400 {
        return ApiResponse {
            success: false,
            status,
            data: None,
            error_code: None,
            error_msg: Some(format!("HTTP {}", status)),
            raw: truncated(),
            failure: FailureKind::Http,
        };
    }

    let envelope: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return ApiResponse {
                success: false,
                status,
                data: None,
                error_code: None,
                error_msg: Some("invalid JSON response".to_string()),
                raw: truncated(),
                failure: FailureKind::MalformedBody,
            };
        }
    };

    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    ApiResponse {
        success,
        status,
        data: envelope.get("data").cloned().filter(|v| !v.is_null()),
        error_code: envelope.get("errorCode").and_then(Value::as_i64),
        error_msg: envelope
            .get("errorMsg")
            .and_then(Value::as_str)
            .map(str::to_string),
        raw: if success { None } else { truncated() },
        failure: if success {
            FailureKind::None
        } else {
            FailureKind::Business
        },
    }
}

/// Request authentication headers
///
/// Authenticated endpoints take the session token in `Authorization` and,
/// for in-room actions, the user id in `X-User-Id`.
#[derive(Clone, Copy, Debug)]
pub struct Auth<'a> {
    pub token: &'a str,
    pub user_id: Option<i64>,
}

impl<'a> Auth<'a> {
    pub fn token_only(token: &'a str) -> Self {
        Self {
            token,
            user_id: None,
        }
    }

    pub fn for_session(session: &'a Session) -> Self {
        Self {
            token: &session.token,
            user_id: Some(session.user_id),
        }
    }
}

/// Unified API client over one base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client with the given per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HarnessError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn apply_auth(
        &self,
        request: reqwest::RequestBuilder,
        auth: Option<Auth<'_>>,
    ) -> reqwest::RequestBuilder {
        match auth {
            Some(auth) => {
                let request = request.header("Authorization", auth.token);
                match auth.user_id {
                    Some(user_id) => request.header("X-User-Id", user_id.to_string()),
                    None => request,
                }
            }
            None => request,
        }
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> ApiResponse {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return ApiResponse::transport_failure(format!("request failed: {}", e)),
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return ApiResponse::transport_failure(format!("body read failed: {}", e)),
        };

        parse_envelope(status, &body)
    }

    /// Send a GET request
    pub async fn get(&self, endpoint: &str, auth: Option<Auth<'_>>) -> ApiResponse {
        let url = format!("{}{}", self.base_url, endpoint);
        self.dispatch(self.apply_auth(self.http.get(&url), auth)).await
    }

    /// Send a POST request with a JSON payload
    pub async fn post(
        &self,
        endpoint: &str,
        payload: &Value,
        auth: Option<Auth<'_>>,
    ) -> ApiResponse {
        let url = format!("{}{}", self.base_url, endpoint);
        self.dispatch(self.apply_auth(self.http.post(&url).json(payload), auth))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_success_extracts_data() {
        let response = parse_envelope(200, r#"{"success": true, "data": {"userId": 7}}"#);
        assert!(response.success);
        assert_eq!(response.failure, FailureKind::None);
        assert_eq!(response.data.unwrap()["userId"], 7);
        assert!(response.raw.is_none());
    }

    #[test]
    fn test_two_hundred_with_business_failure() {
        let response = parse_envelope(
            200,
            r#"{"success": false, "errorCode": 4001, "errorMsg": "email already registered"}"#,
        );
        assert!(!response.success);
        assert_eq!(response.failure, FailureKind::Business);
        assert_eq!(response.error_code, Some(4001));

        match response.to_error() {
            HarnessError::Rejected { code, message } => {
                assert_eq!(code, Some(4001));
                assert!(message.contains("already registered"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_http_failure() {
        let response = parse_envelope(503, "Service Unavailable");
        assert!(!response.success);
        assert_eq!(response.failure, FailureKind::Http);
        assert!(matches!(response.to_error(), HarnessError::Transport(_)));
    }

    #[test]
    fn test_malformed_body() {
        let response = parse_envelope(200, "<html>gateway error</html>");
        assert!(!response.success);
        assert_eq!(response.failure, FailureKind::MalformedBody);
        assert!(matches!(
            response.to_error(),
            HarnessError::MalformedResponse(_)
        ));
        assert_eq!(response.raw.as_deref(), Some("<html>gateway error</html>"));
    }

    #[test]
    fn test_missing_success_flag_is_failure() {
        let response = parse_envelope(200, r#"{"data": {"userId": 7}}"#);
        assert!(!response.success);
        assert_eq!(response.failure, FailureKind::Business);
    }

    #[test]
    fn test_null_data_is_absent() {
        let response = parse_envelope(200, r#"{"success": true, "data": null}"#);
        assert!(response.success);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_raw_body_truncation() {
        let body = "x".repeat(5000);
        let response = parse_envelope(500, &body);
        assert_eq!(response.raw.unwrap().len(), RAW_BODY_LIMIT);
    }

    #[test]
    fn test_into_result() {
        let ok = parse_envelope(200, r#"{"success": true, "data": 1}"#);
        assert_eq!(ok.into_result().unwrap(), Some(serde_json::json!(1)));

        let err = parse_envelope(200, r#"{"success": false, "errorMsg": "nope"}"#);
        assert!(err.into_result().is_err());
    }
}
