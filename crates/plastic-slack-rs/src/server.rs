// ABOUTME: HTTP surface for the relay: notification routes, health check, and error mapping.
// ABOUTME: Validates the Plastic SCM trigger payload into a NotificationRequest before dispatch.

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use plastic_relay_core::{Dispatcher, NotificationRequest, Outcome};
use serde::Deserialize;
use serde_json::Value;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

pub const SENT: &str = "Notification sent to Slack";

/// Shared state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub default_channel: Option<String>,
}

/// Plain-text error response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Body posted by the Plastic SCM after-checkin trigger.
#[derive(Debug, Default, Deserialize)]
pub struct NotifyEnvelope {
    #[serde(rename = "PLASTIC_USER", default)]
    pub user: Option<String>,
    #[serde(rename = "PLASTIC_CLIENTMACHINE", default)]
    pub machine: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// JSON-encoded array of change entries, itself sent as a string.
    #[serde(rename = "INPUT", default)]
    pub input: Option<Value>,
}

impl NotifyEnvelope {
    pub fn into_request(self) -> Result<NotificationRequest, ApiError> {
        let raw_change_entries = match self.input {
            None | Some(Value::Null) => {
                return Err(ApiError::bad_request("Missing required fields"));
            }
            Some(Value::String(input)) if input.is_empty() => {
                return Err(ApiError::bad_request("Missing required fields"));
            }
            Some(Value::String(input)) => {
                serde_json::from_str::<Vec<String>>(&input).map_err(|e| {
                    error!(error = %e, "Error parsing INPUT JSON");
                    ApiError::bad_request("Invalid INPUT format")
                })?
            }
            Some(other) => {
                error!(kind = %json_kind(&other), "INPUT is not a JSON string");
                return Err(ApiError::bad_request("Invalid INPUT format"));
            }
        };

        Ok(NotificationRequest {
            author: self.user,
            machine: self.machine,
            content: self.content,
            raw_change_entries,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build the relay router.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/notify", post(notify_default_channel))
        .route("/notify/:channel", post(notify_channel))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

pub async fn health_check() -> &'static str {
    "OK"
}

async fn notify_channel(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Json(envelope): Json<NotifyEnvelope>,
) -> Result<&'static str, ApiError> {
    relay(&state, &channel, envelope).await
}

async fn notify_default_channel(
    State(state): State<AppState>,
    Json(envelope): Json<NotifyEnvelope>,
) -> Result<&'static str, ApiError> {
    let Some(channel) = state.default_channel.as_deref() else {
        error!("No default channel configured for /notify");
        return Err(ApiError::bad_request("No default channel configured"));
    };
    relay(&state, channel, envelope).await
}

async fn relay(
    state: &AppState,
    channel: &str,
    envelope: NotifyEnvelope,
) -> Result<&'static str, ApiError> {
    let request = envelope.into_request()?;
    debug!(
        channel = %channel,
        entries = request.raw_change_entries.len(),
        "Received notification payload"
    );

    match state.dispatcher.dispatch(&request, channel).await {
        Outcome::Succeeded { warnings } => {
            if !warnings.is_empty() {
                warn!(
                    channel = %channel,
                    failed = warnings.len(),
                    "Notification sent with undelivered groups"
                );
            }
            Ok(SENT)
        }
        Outcome::Failed { reason } => {
            error!(channel = %channel, reason = %reason, "Notification failed");
            Err(ApiError::internal_server_error(
                "Failed to send initial message to Slack",
            ))
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Unhandled error while processing request");
    ApiError::internal_server_error("Internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(body: Value) -> NotifyEnvelope {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_envelope_into_request() {
        let request = envelope(json!({
            "PLASTIC_USER": "alice",
            "PLASTIC_CLIENTMACHINE": "WS-01",
            "content": "Rework textures",
            "INPUT": "[\"AD \\\"/a\\\" FILE#m\"]",
        }))
        .into_request()
        .unwrap();

        assert_eq!(request.author.as_deref(), Some("alice"));
        assert_eq!(request.machine.as_deref(), Some("WS-01"));
        assert_eq!(request.content.as_deref(), Some("Rework textures"));
        assert_eq!(request.raw_change_entries, vec![r#"AD "/a" FILE#m"#]);
    }

    #[test]
    fn test_envelope_optional_fields() {
        let request = envelope(json!({ "INPUT": "[]" })).into_request().unwrap();
        assert!(request.author.is_none());
        assert!(request.machine.is_none());
        assert!(request.content.is_none());
        assert!(request.raw_change_entries.is_empty());
    }

    #[test]
    fn test_envelope_missing_input() {
        for body in [json!({}), json!({ "INPUT": null }), json!({ "INPUT": "" })] {
            let err = envelope(body).into_request().unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Missing required fields");
        }
    }

    #[test]
    fn test_envelope_invalid_input() {
        for body in [
            json!({ "INPUT": "not json" }),
            json!({ "INPUT": "{\"a\": 1}" }),
            json!({ "INPUT": "[1, 2]" }),
            json!({ "INPUT": ["AD \"/a\" FILE#m"] }),
        ] {
            let err = envelope(body).into_request().unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Invalid INPUT format");
        }
    }
}
