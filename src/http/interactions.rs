//! `POST /api/interactions`: Slack interactive-components webhook.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::Form;
use serde::Deserialize;

use crate::slack::handlers;
use crate::{AppError, Result};

use super::AppState;

/// Slack posts the interaction as a single form-encoded `payload` field.
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    /// JSON-encoded interaction document.
    #[serde(default)]
    pub payload: Option<String>,
}

/// Acknowledge a board interaction once its flow has finished.
///
/// # Errors
///
/// Answers 500 when the body is not a form, the payload is malformed, or
/// the status store fails.
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<WebhookForm>, FormRejection>,
) -> Result<&'static str> {
    let Form(form) = form?;
    let raw = form
        .payload
        .ok_or_else(|| AppError::Payload("missing payload field".into()))?;
    handlers::handle_payload(&state, &raw).await?;
    Ok("All Complete")
}
