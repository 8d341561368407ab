//! Messaging-platform abstraction used by the interaction handlers.
//!
//! The [`SlackGateway`] trait decouples the board flows from the Slack Web
//! API client so that handlers can be driven by an in-memory double in
//! tests. [`SlackService`](super::client::SlackService) is the production
//! implementation.

use std::future::Future;
use std::pin::Pin;

use slack_morphism::prelude::{SlackBlock, SlackView};

use crate::models::roster::MemberProfile;
use crate::Result;

/// Boxed future returned by every gateway operation.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Message to be delivered via `chat.postMessage`.
#[derive(Debug, Clone)]
pub struct SlackMessage {
    /// Target channel ID.
    pub channel: String,
    /// Fallback text; also what the router reads the date token from.
    pub text: String,
    /// Optional Block Kit layout.
    pub blocks: Option<Vec<SlackBlock>>,
    /// Parent message timestamp for threaded replies.
    pub thread_ts: Option<String>,
}

impl SlackMessage {
    /// Create a plain-text message for a channel.
    pub fn plain(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            blocks: None,
            thread_ts: None,
        }
    }

    /// Create a plain-text reply in the thread under `thread_ts`.
    pub fn threaded(
        channel: impl Into<String>,
        thread_ts: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            thread_ts: Some(thread_ts.into()),
            ..Self::plain(channel, text)
        }
    }

    /// Attach a block layout.
    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<SlackBlock>) -> Self {
        self.blocks = Some(blocks);
        self
    }
}

/// Slack Web API operations the board needs.
///
/// Every operation is an independent remote call; none are retried.
pub trait SlackGateway: Send + Sync {
    /// List the member IDs of a channel, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if any page fails.
    fn channel_members<'a>(&'a self, channel_id: &'a str) -> GatewayFuture<'a, Vec<String>>;

    /// Fetch one user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the lookup fails.
    fn user_profile<'a>(&'a self, user_id: &'a str) -> GatewayFuture<'a, MemberProfile>;

    /// Post a message and return its `ts`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the post fails.
    fn post_message(&self, message: SlackMessage) -> GatewayFuture<'_, String>;

    /// Replace the text and blocks of an existing message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the update fails.
    fn update_message<'a>(
        &'a self,
        channel_id: &'a str,
        ts: &'a str,
        text: &'a str,
        blocks: Vec<SlackBlock>,
    ) -> GatewayFuture<'a, ()>;

    /// Open a modal view for the interaction identified by `trigger_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the view cannot be opened.
    fn open_modal<'a>(&'a self, trigger_id: &'a str, view: SlackView) -> GatewayFuture<'a, ()>;
}
