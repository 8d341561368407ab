//! Status button flow.
//!
//! Two independent branches run concurrently and are joined before the
//! webhook is acknowledged:
//!
//! - announce: post "<name> selected <status>" in the board's thread;
//! - reconcile: upsert the member's record, recount the day, and rewrite
//!   the board's buttons with the new counts.
//!
//! The branches are not ordered relative to each other. A failed announce
//! is logged; the reconcile result is what the caller sees.

use std::sync::Arc;

use tracing::{info, warn};

use crate::day::DayKey;
use crate::http::AppState;
use crate::models::status::{UpsertOutcome, WorkStatus};
use crate::persistence::status_repo::StatusRepo;
use crate::slack::blocks;
use crate::slack::gateway::{SlackGateway, SlackMessage};
use crate::Result;

use super::BoardContext;

/// Record `status` for the clicking member and refresh the board.
///
/// # Errors
///
/// Returns `AppError::Db` if the upsert or recount fails, or
/// `AppError::Slack` if the board could not be rewritten.
pub async fn record_status(
    state: &AppState,
    ctx: &BoardContext<'_>,
    status: WorkStatus,
    day: DayKey,
) -> Result<UpsertOutcome> {
    let (announced, reconciled) = tokio::join!(
        announce(state, ctx, status),
        reconcile(state, ctx, status, day)
    );

    if let Err(err) = announced {
        warn!(%err, "thread reply failed");
    }
    reconciled
}

async fn announce(state: &AppState, ctx: &BoardContext<'_>, status: WorkStatus) -> Result<()> {
    let name = display_name(state.slack.as_ref(), ctx).await;
    let reply = SlackMessage::threaded(
        ctx.channel_id,
        ctx.message_ts,
        blocks::status_reply_text(&name, status),
    );
    state.slack.post_message(reply).await?;
    Ok(())
}

async fn reconcile(
    state: &AppState,
    ctx: &BoardContext<'_>,
    status: WorkStatus,
    day: DayKey,
) -> Result<UpsertOutcome> {
    let repo = StatusRepo::new(Arc::clone(&state.db));
    let change = repo
        .upsert(ctx.user_id, ctx.channel_id, day, status)
        .await?;
    let counts = repo.count_by_status(ctx.channel_id, day).await?;
    info!(?change, responded = counts.total(), "status reconciled");

    let board = blocks::board_blocks(ctx.message_text, Some(&counts));
    state
        .slack
        .update_message(ctx.channel_id, ctx.message_ts, ctx.message_text, board)
        .await?;
    Ok(change)
}

/// Resolve the clicking member's display name, falling back to the account
/// name from the payload and finally the user ID.
pub async fn display_name(slack: &dyn SlackGateway, ctx: &BoardContext<'_>) -> String {
    match slack.user_profile(ctx.user_id).await {
        Ok(profile) => profile.display_name,
        Err(err) => {
            warn!(%err, "profile lookup failed; falling back to payload name");
            ctx.user_name.unwrap_or(ctx.user_id).to_owned()
        }
    }
}
