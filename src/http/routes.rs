//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::{MatchCommand, MatchSnapshot, RoundPhase};
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - support multiple origins (comma-separated in CLIENT_ORIGIN)
    let allowed_origins: Vec<header::HeaderValue> = state
        .config
        .client_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .route("/match", get(snapshot_handler))
        .route("/match/start", post(start_handler))
        .route("/match/reset", post(reset_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    match_id: Uuid,
    tick: u64,
    phase: RoundPhase,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.match_handle.latest_snapshot();

    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        match_id: snapshot.match_id,
        tick: snapshot.tick,
        phase: snapshot.phase,
    })
}

// ============================================================================
// Match endpoints
// ============================================================================

async fn snapshot_handler(State(state): State<AppState>) -> Json<MatchSnapshot> {
    Json(state.match_handle.latest_snapshot())
}

#[derive(Serialize)]
struct TriggerResponse {
    status: &'static str,
    message: String,
}

async fn start_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    trigger(&state, MatchCommand::Start).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerResponse {
            status: "queued",
            message: "Start applies on the next tick".to_string(),
        }),
    ))
}

async fn reset_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    trigger(&state, MatchCommand::Reset).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerResponse {
            status: "queued",
            message: "Reset applies on the next tick".to_string(),
        }),
    ))
}

/// Lifecycle triggers from HTTP carry a nil connection id; they never hold keys
async fn trigger(state: &AppState, command: MatchCommand) -> Result<(), AppError> {
    state
        .match_handle
        .send(Uuid::nil(), command)
        .await
        .map_err(|e| AppError::Unavailable(e.to_string()))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
