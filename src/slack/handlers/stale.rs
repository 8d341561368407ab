//! Read-only notice for clicks on a board from another day.

use crate::http::AppState;
use crate::slack::blocks;
use crate::Result;

/// Open the "only today's board" modal. No record is touched.
///
/// # Errors
///
/// Returns `AppError::Slack` if the modal cannot be opened.
pub async fn show_stale_notice(state: &AppState, trigger_id: &str) -> Result<()> {
    state
        .slack
        .open_modal(trigger_id, blocks::stale_board_modal())
        .await
}
