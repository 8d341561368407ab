//! Channel roster resolution.
//!
//! Lists the channel's members, drops system and denylisted accounts, and
//! resolves the rest to profiles. At most [`MAX_PROFILE_LOOKUPS`] lookups
//! are in flight at once, and results keep channel order. A failed lookup
//! degrades to a placeholder member instead of failing the roster.

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::models::roster::RosterMember;
use crate::slack::gateway::SlackGateway;
use crate::Result;

/// Slack's built-in system account.
pub const SLACKBOT_USER_ID: &str = "USLACKBOT";

/// Upper bound on concurrent `users.info` calls.
pub const MAX_PROFILE_LOOKUPS: usize = 10;

/// Resolve the human members of `channel_id`.
///
/// # Errors
///
/// Returns `AppError::Slack` if the member list itself cannot be fetched.
pub async fn resolve_roster(
    slack: &dyn SlackGateway,
    config: &GlobalConfig,
    channel_id: &str,
) -> Result<Vec<RosterMember>> {
    let member_ids = slack.channel_members(channel_id).await?;
    let candidates: Vec<&str> = member_ids
        .iter()
        .map(String::as_str)
        .filter(|id| *id != SLACKBOT_USER_ID && !config.is_excluded(id))
        .collect();

    let lookups: Vec<BoxFuture<'_, Option<RosterMember>>> = candidates
        .iter()
        .map(|user_id| -> BoxFuture<'_, Option<RosterMember>> {
            async move {
                match slack.user_profile(user_id).await {
                    Ok(profile) if profile.is_human() => Some(RosterMember::from(profile)),
                    Ok(_) => None,
                    Err(err) => {
                        warn!(user_id, %err, "profile lookup failed; using placeholder");
                        Some(RosterMember::placeholder((*user_id).to_owned()))
                    }
                }
            }
            .boxed()
        })
        .collect();
    let roster: Vec<RosterMember> = stream::iter(lookups)
        .buffered(MAX_PROFILE_LOOKUPS)
        .filter_map(|member| async move { member })
        .collect()
        .await;

    info!(
        channel_id,
        listed = member_ids.len(),
        roster = roster.len(),
        "roster resolved"
    );
    Ok(roster)
}
