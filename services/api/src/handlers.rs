//! Axum Handlers for the Telephony Webhooks
//!
//! Every handler answers with well-formed spoken-response markup and HTTP 200,
//! even when something went wrong, so the caller always hears something.

use axum::{
    extract::{Form, State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::{models::CallWebhook, state::AppState, twiml::VoiceResponse};

/// Body of the liveness check.
pub const LIVENESS_TEXT: &str = "Book Store Voice Assistant is running!";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("malformed webhook request: {0}")]
    MalformedRequest(#[from] FormRejection),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        error!(error = %self, "Webhook handling failed");
        VoiceResponse::error().into_response()
    }
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "The service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn home() -> &'static str {
    LIVENESS_TEXT
}

/// Call-start webhook: greet the caller and listen for speech.
#[utoipa::path(
    post,
    path = "/voice",
    request_body(content = CallWebhook, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Greeting wrapped in a speech gather", body = String, content_type = "text/xml")
    )
)]
pub async fn voice(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CallWebhook>, FormRejection>,
) -> Result<VoiceResponse, WebhookError> {
    let Form(webhook) = form?;
    let command = state.call_flow.start_call(webhook.call_sid()).await;
    Ok(command.into())
}

/// Speech-result webhook: answer the caller, or say goodbye.
#[utoipa::path(
    post,
    path = "/handle-input",
    request_body(content = CallWebhook, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "A reply wrapped in a speech gather, a closing remark, or an error remark", body = String, content_type = "text/xml")
    )
)]
pub async fn handle_input(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CallWebhook>, FormRejection>,
) -> Result<VoiceResponse, WebhookError> {
    let Form(webhook) = form?;
    let command = state
        .call_flow
        .handle_speech(webhook.call_sid(), webhook.speech())
        .await;
    Ok(command.into())
}
