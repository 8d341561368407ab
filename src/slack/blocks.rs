//! Slack Block Kit builders for the board message and its modals.

use slack_morphism::prelude::{
    SlackActionBlockElement, SlackActionsBlock, SlackBlock, SlackBlockButtonElement, SlackBlockId,
    SlackBlockPlainTextOnly, SlackBlockText, SlackModalView, SlackSectionBlock, SlackView,
};

use crate::day::DayKey;
use crate::models::roster::Breakdown;
use crate::models::status::{StatusCounts, WorkStatus, LIST_VALUE};

/// `block_id` of the board's button row.
pub const BOARD_ACTIONS_BLOCK: &str = "board_actions";

/// `action_id` of the roster button.
pub const LIST_ACTION_ID: &str = "button_list";

/// Text of the modal shown when an old board is clicked.
pub const STALE_BOARD_TEXT: &str = "Only today's board can be viewed or changed.";

/// One board button: action id, label, value, optional style.
struct Button {
    action_id: &'static str,
    label: String,
    value: &'static str,
    style: Option<&'static str>,
}

/// Build a plain markdown section block.
#[must_use]
pub fn text_section(text: &str) -> SlackBlock {
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(text.into())))
}

fn action_buttons(block_id: &str, buttons: Vec<Button>) -> SlackBlock {
    let elements: Vec<SlackActionBlockElement> = buttons
        .into_iter()
        .map(|button| {
            let mut element = SlackBlockButtonElement::new(
                button.action_id.into(),
                SlackBlockPlainTextOnly::from(button.label.as_str()),
            )
            .with_value(button.value.into());
            if let Some(style) = button.style {
                element = element.with_style(style.into());
            }
            SlackActionBlockElement::Button(element)
        })
        .collect();
    SlackBlock::Actions(
        SlackActionsBlock::new(elements).with_block_id(SlackBlockId(block_id.into())),
    )
}

fn status_button(status: WorkStatus, counts: Option<&StatusCounts>) -> Button {
    let label = match counts {
        Some(counts) => format!("{} ({})", status.button_label(), counts.get(status)),
        None => status.button_label().to_owned(),
    };
    Button {
        action_id: status.action_id(),
        label,
        value: status.code(),
        style: (status == WorkStatus::Left).then_some("danger"),
    }
}

/// Board button row. Counts are shown when given; the roster button sits
/// between the working statuses and "leave".
#[must_use]
pub fn board_buttons(counts: Option<&StatusCounts>) -> SlackBlock {
    let list = Button {
        action_id: LIST_ACTION_ID,
        label: "\u{1f4cb} List".to_owned(),
        value: LIST_VALUE,
        style: Some("primary"),
    };
    let buttons = vec![
        status_button(WorkStatus::Office, counts),
        status_button(WorkStatus::Remote, counts),
        status_button(WorkStatus::OffSite, counts),
        list,
        status_button(WorkStatus::Left, counts),
    ];
    action_buttons(BOARD_ACTIONS_BLOCK, buttons)
}

/// Heading text of the daily board, which embeds the day's date token.
#[must_use]
pub fn board_text(day: DayKey) -> String {
    format!("Daily check-in {}", day.with_weekday())
}

/// Full board layout: the heading section followed by the button row.
///
/// `text` is kept verbatim so that updates never lose the date token.
#[must_use]
pub fn board_blocks(text: &str, counts: Option<&StatusCounts>) -> Vec<SlackBlock> {
    vec![text_section(text), board_buttons(counts)]
}

/// Thread reply announcing a member's choice.
#[must_use]
pub fn status_reply_text(display_name: &str, status: WorkStatus) -> String {
    format!("{display_name} selected {}", status.label())
}

/// Roster modal listing every member under their bucket.
#[must_use]
pub fn roster_modal(breakdown: &Breakdown) -> SlackView {
    let blocks: Vec<SlackBlock> = breakdown
        .buckets
        .iter()
        .map(|entry| {
            let names = if entry.members.is_empty() {
                "none".to_owned()
            } else {
                entry
                    .members
                    .iter()
                    .map(|member| member.display_name.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            text_section(&format!(
                "*{} ({}):*\n{names}",
                entry.bucket.label(),
                entry.count()
            ))
        })
        .collect();

    SlackView::Modal(
        SlackModalView::new(
            SlackBlockPlainTextOnly::from(format!("{} status", breakdown.day).as_str()),
            blocks,
        )
        .with_close(SlackBlockPlainTextOnly::from("Close")),
    )
}

/// Modal shown when a click arrives on a board from another day.
#[must_use]
pub fn stale_board_modal() -> SlackView {
    SlackView::Modal(
        SlackModalView::new(
            SlackBlockPlainTextOnly::from("Error \u{1f622}"),
            vec![text_section(STALE_BOARD_TEXT)],
        )
        .with_close(SlackBlockPlainTextOnly::from("Close")),
    )
}
