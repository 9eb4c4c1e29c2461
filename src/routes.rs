//! REST endpoints for the contact form.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::relay::{ContactRelay, ContactResponse, Submission};

/// Shared state for contact routes.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ContactRelay>,
}

/// Build the Axum router with the contact and health routes.
pub fn contact_routes(relay: Arc<ContactRelay>, server: &ServerConfig) -> Router {
    let state = AppState { relay };

    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.allowed_origins)),
        )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "contact-relay"
    }))
}

// ── Contact ─────────────────────────────────────────────────────────────

/// POST /api/contact
///
/// Relays `{ name, email, message }` to the owner's inbox and answers with
/// `{ message }` plus the status of the classified outcome.
async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> impl IntoResponse {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable contact payload");
            return ContactResponse::new(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    state.relay.relay(&submission).await.to_response()
}
