//! HTTP gateway server built on axum.

use super::ServerConfig;
use crate::error::ResearchError;
use crate::research::{ResearchEngine, ResearchReport, ResearchRequest, SourceListing};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Shared state for handlers. Read-only after startup.
pub struct AppState {
    engine: ResearchEngine,
    request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(engine: ResearchEngine, config: &ServerConfig) -> Self {
        Self {
            engine,
            request_timeout: config.request_timeout(),
        }
    }
}

/// `ResearchError` rendered as `{"detail": ...}` with the matching status.
struct ApiError(ResearchError);

impl From<ResearchError> for ApiError {
    fn from(err: ResearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = serde_json::json!({ "detail": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SourcesQuery {
    max_sources: Option<usize>,
}

/// Build the axum Router: `/`, `/research` and `/sources/{topic}`.
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/", get(health_handler))
        .route("/research", post(research_handler))
        .route("/sources/{topic}", get(sources_handler))
        .layer(TraceLayer::new_for_http());

    let app = if config.cors_permissive {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    };
    app.with_state(state)
}

/// Health check endpoint.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "mode": state.engine.mode(),
    }))
}

async fn research_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Result<Json<ResearchReport>, ApiError> {
    let Json(request) = payload.map_err(|e| ResearchError::invalid(e.body_text()))?;
    let request_id = Uuid::new_v4();
    info!(%request_id, topic = %request.topic, max_sources = request.max_sources, "Research request");

    let report = match state.request_timeout {
        Some(limit) => tokio::time::timeout(limit, state.engine.run(&request))
            .await
            .map_err(|_| {
                ResearchError::internal(format!("timed out after {} seconds", limit.as_secs()))
            })??,
        None => state.engine.run(&request).await?,
    };
    Ok(Json(report))
}

async fn sources_handler(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
    query: Result<Query<SourcesQuery>, QueryRejection>,
) -> Result<Json<SourceListing>, ApiError> {
    let Query(query) = query.map_err(|e| ResearchError::invalid(e.body_text()))?;
    let max_sources = query
        .max_sources
        .unwrap_or_else(|| state.engine.default_max_sources());
    let listing = state.engine.list_sources(&topic, max_sources).await?;
    Ok(Json(listing))
}

/// Start the gateway on the configured address. Runs until cancelled.
pub async fn run(engine: ResearchEngine, config: &ServerConfig) -> Result<(), std::io::Error> {
    let state = Arc::new(AppState::new(engine, config));
    let app = router(state, config);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
