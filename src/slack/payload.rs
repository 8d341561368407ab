//! Inbound `block_actions` payload types.
//!
//! Only the subset of fields the board needs is modelled; Slack sends many
//! more and they are ignored.

use serde::Deserialize;

use crate::{AppError, Result};

/// A single clicked element.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadAction {
    /// Element `action_id`.
    pub action_id: String,
    /// Button value; absent for some element types.
    #[serde(default)]
    pub value: Option<String>,
}

/// The acting user.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadUser {
    /// Slack user ID.
    pub id: String,
    /// Account name, used only as a fallback display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Channel the clicked message lives in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadChannel {
    /// Slack channel ID.
    pub id: String,
}

/// The message carrying the clicked buttons.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadMessage {
    /// Fallback text of the message; carries the board's date token.
    #[serde(default)]
    pub text: String,
    /// Message timestamp.
    pub ts: String,
}

/// Top-level interactive payload, decoded from the `payload` form field.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InteractionPayload {
    /// Clicked elements; Slack sends exactly one for button clicks.
    #[serde(default)]
    pub actions: Vec<PayloadAction>,
    /// Acting user.
    pub user: PayloadUser,
    /// Originating channel.
    #[serde(default)]
    pub channel: Option<PayloadChannel>,
    /// Originating message.
    #[serde(default)]
    pub message: Option<PayloadMessage>,
    /// Short-lived token required to open a modal.
    #[serde(default)]
    pub trigger_id: String,
}

impl InteractionPayload {
    /// Decode the JSON document carried in the `payload` form field.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Payload` if the document is not valid JSON or lacks
    /// required fields.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The first clicked element, if any.
    #[must_use]
    pub fn first_action(&self) -> Option<&PayloadAction> {
        self.actions.first()
    }

    /// Channel ID, required for every board flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Payload` when the payload has no channel.
    pub fn channel_id(&self) -> Result<&str> {
        self.channel
            .as_ref()
            .map(|channel| channel.id.as_str())
            .ok_or_else(|| AppError::Payload("payload has no channel".into()))
    }

    /// Originating message, required for every board flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Payload` when the payload has no message.
    pub fn board_message(&self) -> Result<&PayloadMessage> {
        self.message
            .as_ref()
            .ok_or_else(|| AppError::Payload("payload has no message".into()))
    }
}
