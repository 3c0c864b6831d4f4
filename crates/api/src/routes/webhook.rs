//! Meta webhook: subscription handshake and message events.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::Platform;
use messenger::{verify_signature, verify_subscription, WebhookEvent, SIGNATURE_HEADER};
use orchestrator::{InboundMessage, Outcome};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Query Meta sends with the subscription handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Answer the subscription handshake.
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> (StatusCode, String) {
    match verify_subscription(
        query.mode.as_deref(),
        query.verify_token.as_deref(),
        query.challenge.as_deref(),
        &state.webhook.verify_token,
    ) {
        Some(challenge) => {
            info!("Webhook verified");
            (StatusCode::OK, challenge)
        }
        None => {
            warn!(mode = ?query.mode, "Webhook verification failed");
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
    }
}

fn reply(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

/// Receive a batch of messaging events and answer each text message.
pub async fn receive(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(secret) = state.webhook.app_secret.as_deref() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        if !verify_signature(secret, signature, &body) {
            warn!("Rejected webhook with invalid signature");
            return reply(StatusCode::UNAUTHORIZED, json!({ "error": "Invalid signature" }));
        }
    }

    let event = match WebhookEvent::parse(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Unparseable webhook body");
            return reply(StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON" }));
        }
    };

    let Some(platform) = Platform::from_webhook_object(&event.object) else {
        debug!(object = %event.object, "Ignoring non-page webhook");
        return reply(StatusCode::NOT_FOUND, json!({ "error": "Not a page event" }));
    };

    for inbound in event.text_messages() {
        let message = InboundMessage::new(inbound.page_id, inbound.sender_id, platform, inbound.text);
        let sender_id = message.sender_id.clone();

        match state.orchestrator.process(message).await {
            Ok(Outcome::Replied { tool_calls, .. }) => {
                debug!(sender_id = %sender_id, tool_calls, "Replied");
            }
            Ok(Outcome::Skipped(reason)) => {
                info!(sender_id = %sender_id, reason = %reason, "Message not answered");
            }
            Err(e) => {
                error!(sender_id = %sender_id, error = %e, "Failed to process webhook message");
                return reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                );
            }
        }
    }

    reply(StatusCode::OK, json!({ "message": "EVENT_RECEIVED" }))
}
