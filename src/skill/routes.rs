//! HTTP endpoints: the skill webhook plus health and status.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::engine::{DialogEngine, Turn};
use super::protocol::{WebhookRequest, WebhookResponse};

/// Shared state for skill routes.
#[derive(Clone)]
pub struct SkillState {
    pub engine: Arc<DialogEngine>,
}

/// Build the Axum router for the skill.
pub fn skill_routes(engine: Arc<DialogEngine>) -> Router {
    let state = SkillState { engine };

    Router::new()
        .route("/post", post(webhook))
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .route("/api/skill/status", get(status))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

// ── Webhook ─────────────────────────────────────────────────────────────

/// POST /post
///
/// One dialog turn. A body missing any required field is rejected by the
/// JSON extractor before the engine runs.
async fn webhook(State(state): State<SkillState>, Json(req): Json<WebhookRequest>) -> Response {
    let turn_id = Uuid::new_v4();
    info!(
        %turn_id,
        user_id = %req.session.user_id,
        new = req.session.new,
        tokens = ?req.request.nlu.tokens,
        "Webhook request"
    );
    debug!(%turn_id, payload = ?req, "Webhook request payload");

    let mut response = WebhookResponse::skeleton(&req);
    let turn = Turn::new(
        req.session.user_id,
        req.session.new,
        req.request.nlu.tokens,
    );

    match state.engine.handle_turn(&turn).await {
        Ok(reply) => {
            reply.apply_to(&mut response.response);
            info!(
                %turn_id,
                user_id = %turn.user_id,
                text = %response.response.text,
                end_session = response.response.end_session,
                "Webhook response"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(%turn_id, user_id = %turn.user_id, error = %e, "Turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

// ── Health / status ─────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Diagnostic snapshot returned by `GET /api/skill/status`.
#[derive(Debug, Clone, Serialize)]
pub struct SkillStatus {
    pub sessions: usize,
    pub prediction_enabled: bool,
    pub oracle: Option<String>,
}

async fn status(State(state): State<SkillState>) -> impl IntoResponse {
    let oracle = state.engine.oracle().map(|o| o.name().to_string());
    Json(SkillStatus {
        sessions: state.engine.store().len().await,
        prediction_enabled: oracle.is_some(),
        oracle,
    })
}
