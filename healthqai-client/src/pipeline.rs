//! Single-call HTTP send/interpret primitive shared by every workflow.
//!
//! A call is attempted exactly once. Failures are classified as
//! [`ClientError::Unreachable`], [`ClientError::Rejected`] or
//! [`ClientError::InvalidResponse`].

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Encoded request body.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Form(Vec<(&'static str, String)>),
    Json(Value),
}

/// One operation against the service.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::GET,
            path,
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn post_form(path: &'static str, fields: Vec<(&'static str, String)>) -> Self {
        Self {
            method: Method::POST,
            path,
            body: RequestBody::Form(fields),
            bearer: None,
        }
    }

    pub fn post_json(path: &'static str, body: Value) -> Self {
        Self {
            method: Method::POST,
            path,
            body: RequestBody::Json(body),
            bearer: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Stateless between calls; cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RequestPipeline {
    client: Client,
    base_url: Url,
}

impl RequestPipeline {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Perform the call and decode a success payload into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid endpoint '{}': {}", request.path, e)))?;

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Json(body) => builder.json(&body),
        };

        let response = builder.send().await.map_err(|e| {
            debug!("{} {} failed before a response: {}", request.method, request.path, e);
            ClientError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        debug!("{} {} -> {}", request.method, request.path, status);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            debug!("Undecodable payload from {}: {}", request.path, e);
            ClientError::invalid_response()
        })
    }
}

/// Build a `Rejected` error, preferring the service's `detail` field.
fn rejection(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(detail_message))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    ClientError::Rejected {
        status: status.as_u16(),
        message,
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        // validation errors arrive as a list of {loc, msg, type}
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejection_uses_detail_text() {
        let body = json!({ "detail": "Incorrect username or password" }).to_string();
        let err = rejection(StatusCode::UNAUTHORIZED, body.as_bytes());
        assert_eq!(
            err,
            ClientError::Rejected {
                status: 401,
                message: "Incorrect username or password".to_string(),
            }
        );
    }

    #[test]
    fn test_rejection_joins_validation_entries() {
        let body = json!({
            "detail": [
                { "loc": ["body", "age"], "msg": "field required", "type": "value_error.missing" },
                { "loc": ["body", "gender"], "msg": "field required", "type": "value_error.missing" }
            ]
        })
        .to_string();
        let err = rejection(StatusCode::UNPROCESSABLE_ENTITY, body.as_bytes());
        assert_eq!(err.to_string(), "field required; field required");
    }

    #[test]
    fn test_rejection_generic_fallback() {
        let err = rejection(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.to_string(), "Request failed with status 500");

        let empty_detail = json!({ "detail": null }).to_string();
        let err = rejection(StatusCode::BAD_GATEWAY, empty_detail.as_bytes());
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::post_json("/ask", json!({ "question": "q" })).with_bearer("T");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.bearer.as_deref(), Some("T"));
        assert!(matches!(request.body, RequestBody::Json(_)));

        let request = ApiRequest::get("/");
        assert!(request.bearer.is_none());
        assert!(matches!(request.body, RequestBody::Empty));
    }
}
