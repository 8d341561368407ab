//! HTTP transport: the Slack webhook, the maintenance purge, and a health
//! check, served by axum.

pub mod interactions;
pub mod maintenance;

use std::sync::Arc;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::GlobalConfig;
use crate::persistence::db::Database;
use crate::slack::gateway::SlackGateway;
use crate::{AppError, Result};

/// Path of the interactive-components webhook.
pub const INTERACTIONS_PATH: &str = "/api/interactions";

/// Path of the maintenance bulk delete.
pub const PURGE_PATH: &str = "/api/records/purge";

/// Long-lived dependencies shared by every request.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// `SQLite` connection pool.
    pub db: Arc<Database>,
    /// Slack Web API client.
    pub slack: Arc<dyn SlackGateway>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "message": "Internal Server Error",
                    "error": other.to_string(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        Self::Payload(format!("invalid form body: {}", err.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        Self::Payload(format!("invalid query: {}", err.body_text()))
    }
}

/// Handler for non-POST requests on POST-only routes.
async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({ "message": "Method not allowed" })),
    )
        .into_response()
}

/// Handler for `GET /health`.
async fn health() -> &'static str {
    "ok"
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            INTERACTIONS_PATH,
            post(interactions::handle_webhook).fallback(method_not_allowed),
        )
        .route(
            PURGE_PATH,
            post(maintenance::handle_purge).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .with_state(state)
}

/// Bind the configured address and serve until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the address is invalid or cannot be bound,
/// and `AppError::Io` if the server fails while running.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let addr = state.config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind {addr}: {err}")))?;
    info!(addr = %listener.local_addr()?, "http server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await?;

    info!("http server stopped");
    Ok(())
}
