//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the webhook endpoints and OpenAPI documentation.

use crate::{handlers, models::CallWebhook, state::AppState, twiml::VoiceResponse};

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::{any::Any, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::home, handlers::voice, handlers::handle_input),
    components(schemas(CallWebhook)),
    tags(
        (name = "Bookline", description = "Telephony webhooks for the bookstore voice assistant")
    )
)]
pub struct ApiDoc;

/// Turns a handler panic into the spoken error response.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "Webhook handler panicked");
    VoiceResponse::error().into_response()
}

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let webhook_router = Router::new()
        .route("/", get(handlers::home).post(handlers::voice))
        .route("/voice", post(handlers::voice))
        .route("/handle-input", post(handlers::handle_input))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(webhook_router)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}
