//! `POST /api/records/purge`: out-of-band bulk delete of status records.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::persistence::status_repo::{PurgeScope, StatusRepo};
use crate::{AppError, Result};

use super::AppState;

/// Query parameters of the purge endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PurgeParams {
    /// Which records to delete; defaults to [`PurgeScope::WithUser`].
    #[serde(default)]
    pub scope: PurgeScope,
}

/// Delete records and report how many went.
///
/// # Errors
///
/// Answers 404 when nothing matched and 500 when the scope is unknown or
/// the store fails.
pub async fn handle_purge(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<PurgeParams>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(params) = params?;
    let repo = StatusRepo::new(Arc::clone(&state.db));
    let deleted = repo.delete_all(params.scope).await?;
    info!(scope = ?params.scope, deleted, "purge completed");

    if deleted == 0 {
        return Err(AppError::NotFound("No records to delete".into()));
    }
    Ok(Json(json!({
        "message": "Records deleted successfully",
        "deleted": deleted,
    })))
}
