//! Chat endpoints: direct HTTP chat, the WhatsApp webhook pair, and a raw
//! prompt passthrough for debugging.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use whatsapp_client::webhook::WebhookEvent;

use crate::error::ApiError;
use crate::rest::{AppState, DEFAULT_SESSION};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = body.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
    let reply = state.chat.ask(&body.message, session_id).await?;
    Ok(Json(serde_json::json!({ "reply": reply })))
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let text = state
        .agent
        .generate(&body.prompt)
        .await
        .map_err(prenda_core::CommerceError::from)?;
    Ok(Json(serde_json::json!({ "success": true, "data": text })))
}

/// Meta's subscription handshake. Field names arrive dotted.
#[derive(Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

pub async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    let subscribed = params.mode.as_deref() == Some("subscribe")
        && params.verify_token.as_deref() == Some(state.verify_token.as_str());

    if subscribed {
        info!("Webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        warn!("Webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Inbound WhatsApp events. Always acknowledged with 200 so Meta does not
/// retry; processing failures are logged and the sender gets nothing.
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let event: WebhookEvent = match serde_json::from_value(body) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "Unparseable webhook payload");
            return (StatusCode::OK, "EVENT_RECEIVED");
        }
    };

    for (from, text) in event.text_messages() {
        info!(%from, "Inbound WhatsApp message");

        let reply = match state.chat.ask(&text, &from).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(%from, error = %e, "Chat pipeline failed for webhook message");
                continue;
            }
        };

        if let Err(e) = state.whatsapp.send_text(&from, &reply).await {
            error!(%from, error = %e, "Failed to send WhatsApp reply");
        }
    }

    (StatusCode::OK, "EVENT_RECEIVED")
}
