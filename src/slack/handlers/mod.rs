//! Board interaction routing.
//!
//! One inbound webhook call moves through a fixed sequence: decode the
//! payload, ignore it if nothing was clicked, compare the board's date token
//! with today, then dispatch on the button value to the status flow or the
//! roster flow.
//!
//! Store failures abort the request (the caller answers 500). Slack-side
//! failures are logged and the webhook is still acknowledged, so the worst
//! user-visible effect is a board that does not refresh.

pub mod board;
pub mod roster;
pub mod stale;
pub mod status;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::day::DayKey;
use crate::http::AppState;
use crate::models::status::{BoardAction, UpsertOutcome, WorkStatus};
use crate::slack::payload::InteractionPayload;
use crate::{AppError, Result};

/// Coordinates of the clicked board and the clicking member.
#[derive(Debug, Clone, Copy)]
pub struct BoardContext<'a> {
    /// Slack user ID of the member who clicked.
    pub user_id: &'a str,
    /// Account name from the payload, used if the profile lookup fails.
    pub user_name: Option<&'a str>,
    /// Channel holding the board.
    pub channel_id: &'a str,
    /// Board message timestamp.
    pub message_ts: &'a str,
    /// Board message text, preserved on every update.
    pub message_text: &'a str,
    /// Token for opening a modal in response to this click.
    pub trigger_id: &'a str,
}

/// How a webhook call was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do: no actions, or an unrecognised button value.
    Ignored,
    /// The board belongs to another day; the read-only notice was shown.
    StaleBoard,
    /// The member's status was reconciled and the board refreshed.
    StatusRecorded {
        /// Status that was clicked.
        status: WorkStatus,
        /// What the store did with it.
        change: UpsertOutcome,
    },
    /// The roster modal was opened.
    RosterOpened {
        /// Members listed in the modal.
        members: usize,
    },
    /// A Slack call failed after any store work completed.
    Degraded,
}

/// Handle a raw `payload` form field, judging staleness against today.
///
/// # Errors
///
/// Returns `AppError::Payload` for undecodable payloads or boards without a
/// date token, and `AppError::Db` when the store fails.
pub async fn handle_payload(state: &AppState, raw: &str) -> Result<Outcome> {
    let today = DayKey::today(state.config.utc_offset_hours)?;
    handle_payload_on(state, raw, today).await
}

/// Handle a raw `payload` form field as if `today` were the current day.
///
/// # Errors
///
/// Returns `AppError::Payload` for undecodable payloads or boards without a
/// date token, and `AppError::Db` when the store fails.
pub async fn handle_payload_on(state: &AppState, raw: &str, today: DayKey) -> Result<Outcome> {
    let payload = InteractionPayload::parse(raw)?;

    let Some(action) = payload.first_action() else {
        debug!("interaction without actions; ignoring");
        return Ok(Outcome::Ignored);
    };

    let channel_id = payload.channel_id()?;
    let message = payload.board_message()?;
    let board_day = DayKey::extract(&message.text)?
        .ok_or_else(|| AppError::Payload("board message carries no date token".into()))?;
    let value = action.value.as_deref().unwrap_or_default();

    let span = info_span!(
        "interaction",
        user_id = %payload.user.id,
        channel_id,
        action = value
    );

    async {
        if board_day != today {
            info!(%board_day, %today, "date mismatch; board is read-only");
            if let Err(err) = stale::show_stale_notice(state, &payload.trigger_id).await {
                warn!(%err, "failed to open read-only notice");
            }
            return Ok(Outcome::StaleBoard);
        }

        let Some(board_action) = BoardAction::from_value(value) else {
            warn!(action_id = %action.action_id, "unrecognised action value; ignoring");
            return Ok(Outcome::Ignored);
        };

        let ctx = BoardContext {
            user_id: &payload.user.id,
            user_name: payload.user.name.as_deref(),
            channel_id,
            message_ts: &message.ts,
            message_text: &message.text,
            trigger_id: &payload.trigger_id,
        };

        info!("start action");
        let result = match board_action {
            BoardAction::SetStatus(chosen) => status::record_status(state, &ctx, chosen, today)
                .await
                .map(|change| Outcome::StatusRecorded {
                    status: chosen,
                    change,
                }),
            BoardAction::ShowRoster => roster::show_roster(state, &ctx, today)
                .await
                .map(|members| Outcome::RosterOpened { members }),
        };
        let outcome = settle(result)?;
        info!(?outcome, "end action");
        Ok::<_, AppError>(outcome)
    }
    .instrument(span)
    .await
}

fn settle(result: Result<Outcome>) -> Result<Outcome> {
    match result {
        Ok(outcome) => Ok(outcome),
        Err(err) if err.is_store_failure() => {
            error!(%err, "status store failed");
            Err(err)
        }
        Err(err) => {
            warn!(%err, "slack call failed; acknowledging anyway");
            Ok(Outcome::Degraded)
        }
    }
}
