//! Roster button flow: who is where today.

use std::sync::Arc;

use crate::aggregate;
use crate::day::DayKey;
use crate::http::AppState;
use crate::persistence::status_repo::StatusRepo;
use crate::slack::blocks;
use crate::slack::roster::resolve_roster;
use crate::Result;

use super::BoardContext;

/// Resolve the channel roster, classify it against today's records, and
/// open the breakdown modal. Returns the number of members listed.
///
/// # Errors
///
/// Returns `AppError::Db` if the records cannot be read, or
/// `AppError::Slack` if the member list or the modal call fails.
pub async fn show_roster(state: &AppState, ctx: &BoardContext<'_>, day: DayKey) -> Result<usize> {
    let repo = StatusRepo::new(Arc::clone(&state.db));
    let (roster, records) = tokio::join!(
        resolve_roster(state.slack.as_ref(), &state.config, ctx.channel_id),
        repo.list_for_day(ctx.channel_id, day)
    );
    let records = records?;
    let roster = roster?;

    let breakdown = aggregate::classify(day, &roster, &records);
    state
        .slack
        .open_modal(ctx.trigger_id, blocks::roster_modal(&breakdown))
        .await?;
    Ok(breakdown.total())
}
