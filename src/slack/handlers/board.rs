//! Daily board posting.

use tracing::info;

use crate::day::DayKey;
use crate::models::status::StatusCounts;
use crate::slack::blocks;
use crate::slack::gateway::{SlackGateway, SlackMessage};
use crate::Result;

/// Post the board for `day` to `channel_id` and return the message `ts`.
///
/// The board text embeds the day's date token; clicks are only accepted
/// while that token matches the current day. Buttons start at zero.
///
/// # Errors
///
/// Returns `AppError::Slack` if the post fails.
pub async fn post_daily_board(
    slack: &dyn SlackGateway,
    channel_id: &str,
    day: DayKey,
) -> Result<String> {
    let text = blocks::board_text(day);
    let message = SlackMessage::plain(channel_id, text.clone())
        .with_blocks(blocks::board_blocks(&text, Some(&StatusCounts::default())));
    let ts = slack.post_message(message).await?;
    info!(channel_id, %day, %ts, "board posted");
    Ok(ts)
}
