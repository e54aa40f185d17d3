//! HTTP routes.

use crate::bootstrap::AppState;
use aidkit_core::dialogue::{ChatRequest, ChatResponse};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

type AppStateArc = Arc<AppState>;

/// Builds the application router with CORS for `cors_origins` and request tracing.
pub fn router(state: AppStateArc, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

// ============================================================================
// Chat
// ============================================================================

/// A body that fails to parse still gets a chat-shaped reply.
async fn chat(
    State(state): State<AppStateArc>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let response = match payload {
        Ok(Json(request)) => state.chat.handle_message(request).await,
        Err(rejection) => state.chat.malformed_request(&rejection.body_text()).await,
    };
    Json(response)
}

// ============================================================================
// Health
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    sessions: usize,
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.chat.sessions().len().await,
    })
}
