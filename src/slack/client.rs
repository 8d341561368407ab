//! Slack Web API client backed by `slack-morphism`.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackApiChatPostMessageRequest, SlackApiChatUpdateRequest, SlackApiConversationsMembersRequest,
    SlackApiToken, SlackApiTokenType, SlackApiTokenValue, SlackApiUsersInfoRequest,
    SlackApiViewsOpenRequest, SlackBlock, SlackChannelId, SlackClient,
    SlackClientHyperHttpsConnector, SlackClientSession, SlackCursorId, SlackMessageContent,
    SlackTriggerId, SlackTs, SlackUserId, SlackView,
};
use tracing::{debug, info};

use crate::config::SlackConfig;
use crate::models::roster::MemberProfile;
use crate::slack::gateway::{GatewayFuture, SlackGateway, SlackMessage};
use crate::{AppError, Result};

const MEMBERS_PAGE_SIZE: u16 = 200;

fn content(text: String, blocks: Option<Vec<SlackBlock>>) -> SlackMessageContent {
    SlackMessageContent {
        text: Some(text),
        blocks,
        attachments: None,
        upload: None,
        files: None,
        reactions: None,
        metadata: None,
    }
}

impl SlackMessage {
    fn into_request(self) -> SlackApiChatPostMessageRequest {
        SlackApiChatPostMessageRequest {
            channel: SlackChannelId(self.channel),
            content: content(self.text, self.blocks),
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: Some(true),
            parse: None,
            thread_ts: self.thread_ts.map(SlackTs),
            username: None,
            reply_broadcast: None,
            unfurl_links: None,
            unfurl_media: None,
        }
    }
}

/// Bot-token HTTP client for the Slack Web API.
pub struct SlackService {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
}

impl SlackService {
    /// Build the HTTPS client for the configured bot token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created,
    /// or `AppError::Config` if no bot token was loaded.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            return Err(AppError::Config("slack bot token is not loaded".into()));
        }
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };

        info!("slack web api client ready");
        Ok(Self { client, bot_token })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    async fn fetch_members(&self, channel_id: &str) -> Result<Vec<String>> {
        let session = self.http_session();
        let mut members = Vec::new();
        let mut cursor: Option<SlackCursorId> = None;

        loop {
            let mut request = SlackApiConversationsMembersRequest::new()
                .with_channel(SlackChannelId(channel_id.to_owned()))
                .with_limit(MEMBERS_PAGE_SIZE);
            if let Some(next) = cursor.take() {
                request = request.with_cursor(next);
            }

            let page = session
                .conversations_members(&request)
                .await
                .map_err(|err| AppError::Slack(format!("failed to list members: {err}")))?;
            members.extend(page.members.into_iter().map(|id| id.to_string()));

            cursor = page
                .response_metadata
                .and_then(|meta| meta.next_cursor)
                .filter(|next| !next.to_string().is_empty());
            if cursor.is_none() {
                break;
            }
        }

        debug!(channel_id, count = members.len(), "fetched channel members");
        Ok(members)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<MemberProfile> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_owned()));
        let user = self
            .http_session()
            .users_info(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to fetch user {user_id}: {err}")))?
            .user;

        let profile = user.profile.as_ref();
        let display_name = MemberProfile::pick_name(
            profile.and_then(|p| p.display_name.as_deref()),
            profile.and_then(|p| p.real_name.as_deref()),
            user.name.as_deref(),
        );

        Ok(MemberProfile {
            user_id: user_id.to_owned(),
            display_name,
            is_bot: user.flags.is_bot.unwrap_or(false),
            deleted: user.deleted.unwrap_or(false),
        })
    }

    async fn send_message(&self, message: SlackMessage) -> Result<String> {
        let response = self
            .http_session()
            .chat_post_message(&message.into_request())
            .await
            .map_err(|err| AppError::Slack(format!("failed to post message: {err}")))?;
        Ok(response.ts.to_string())
    }

    /// Update an existing Slack message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the Slack API call fails.
    pub async fn update(
        &self,
        channel_id: &str,
        ts: &str,
        text: &str,
        blocks: Vec<SlackBlock>,
    ) -> Result<()> {
        let request = SlackApiChatUpdateRequest::new(
            SlackChannelId(channel_id.to_owned()),
            content(text.to_owned(), Some(blocks)),
            SlackTs(ts.to_owned()),
        );
        self.http_session()
            .chat_update(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to update message: {err}")))?;
        Ok(())
    }

    /// Open a Slack modal dialog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the API call fails.
    pub async fn open_view(&self, trigger_id: &str, view: SlackView) -> Result<()> {
        let request = SlackApiViewsOpenRequest::new(SlackTriggerId(trigger_id.to_owned()), view);
        self.http_session()
            .views_open(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to open modal: {err}")))?;
        Ok(())
    }
}

impl SlackGateway for SlackService {
    fn channel_members<'a>(&'a self, channel_id: &'a str) -> GatewayFuture<'a, Vec<String>> {
        Box::pin(self.fetch_members(channel_id))
    }

    fn user_profile<'a>(&'a self, user_id: &'a str) -> GatewayFuture<'a, MemberProfile> {
        Box::pin(self.fetch_profile(user_id))
    }

    fn post_message(&self, message: SlackMessage) -> GatewayFuture<'_, String> {
        Box::pin(self.send_message(message))
    }

    fn update_message<'a>(
        &'a self,
        channel_id: &'a str,
        ts: &'a str,
        text: &'a str,
        blocks: Vec<SlackBlock>,
    ) -> GatewayFuture<'a, ()> {
        Box::pin(self.update(channel_id, ts, text, blocks))
    }

    fn open_modal<'a>(&'a self, trigger_id: &'a str, view: SlackView) -> GatewayFuture<'a, ()> {
        Box::pin(self.open_view(trigger_id, view))
    }
}
