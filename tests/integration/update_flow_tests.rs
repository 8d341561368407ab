//! Integration tests for the status button flow.
//!
//! Drives `handle_payload_on` with a fixed "today" against an in-memory
//! store and the recording Slack double.

use std::sync::Arc;

use presence_board::models::status::{UpsertOutcome, WorkStatus};
use presence_board::persistence::status_repo::StatusRepo;
use presence_board::slack::blocks;
use presence_board::slack::handlers::{handle_payload_on, Outcome};

use super::test_helpers::{board_day, click, test_state, FakeSlack, SlackCall, BOARD_TS, CHANNEL};

// ─── First click creates a record ────────────────────────────────────

#[tokio::test]
async fn first_click_creates_record_and_refreshes_board() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    let outcome = handle_payload_on(&state, &click("U1", "office", today), today)
        .await
        .expect("handled");

    assert_eq!(
        outcome,
        Outcome::StatusRecorded {
            status: WorkStatus::Office,
            change: UpsertOutcome::Created,
        }
    );

    let repo = StatusRepo::new(Arc::clone(&state.db));
    let record = repo
        .find("U1", CHANNEL, today)
        .await
        .expect("find")
        .expect("record exists");
    assert_eq!(record.status, WorkStatus::Office);

    let updates = slack.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, blocks::board_text(today));
    assert!(updates[0].1.contains("\u{1f3e2} Office (1)"));
    assert!(updates[0].1.contains("\u{1f3e1} Remote (0)"));
}

#[tokio::test]
async fn reply_is_threaded_under_the_board() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    handle_payload_on(&state, &click("U1", "office", today), today)
        .await
        .expect("handled");

    let posted = slack.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].channel, CHANNEL);
    assert_eq!(posted[0].thread_ts.as_deref(), Some(BOARD_TS));
    assert_eq!(posted[0].text, "Alice selected \u{1f3e2} Office");

    let update_target = slack.calls().into_iter().find_map(|call| match call {
        SlackCall::Updated { channel, ts, .. } => Some((channel, ts)),
        _ => None,
    });
    assert_eq!(
        update_target,
        Some((CHANNEL.to_owned(), BOARD_TS.to_owned()))
    );
}

// ─── Changing and repeating a choice ─────────────────────────────────

#[tokio::test]
async fn second_click_with_other_status_updates_in_place() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    handle_payload_on(&state, &click("U1", "office", today), today)
        .await
        .expect("first");
    let outcome = handle_payload_on(&state, &click("U1", "remote", today), today)
        .await
        .expect("second");

    assert_eq!(
        outcome,
        Outcome::StatusRecorded {
            status: WorkStatus::Remote,
            change: UpsertOutcome::Updated,
        }
    );

    let repo = StatusRepo::new(Arc::clone(&state.db));
    let records = repo.list_for_day(CHANNEL, today).await.expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, WorkStatus::Remote);

    let updates = slack.updates();
    let last = &updates.last().expect("update").1;
    assert!(last.contains("\u{1f3e2} Office (0)"));
    assert!(last.contains("\u{1f3e1} Remote (1)"));
}

#[tokio::test]
async fn repeating_the_same_status_leaves_store_unchanged() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    handle_payload_on(&state, &click("U1", "left", today), today)
        .await
        .expect("first");
    let repo = StatusRepo::new(Arc::clone(&state.db));
    let before = repo.find("U1", CHANNEL, today).await.expect("find");

    let outcome = handle_payload_on(&state, &click("U1", "left", today), today)
        .await
        .expect("second");

    assert_eq!(
        outcome,
        Outcome::StatusRecorded {
            status: WorkStatus::Left,
            change: UpsertOutcome::Unchanged,
        }
    );
    let after = repo.find("U1", CHANNEL, today).await.expect("find");
    assert_eq!(before, after);
    // Board is still refreshed and the reply still posted.
    assert_eq!(slack.updates().len(), 2);
    assert_eq!(slack.posted().len(), 2);
}

#[tokio::test]
async fn counts_reflect_every_member_after_each_click() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    slack.add_member("U2", "Bob");
    slack.add_member("U3", "Carol");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    for (user, value) in [("U1", "office"), ("U2", "office"), ("U3", "off_site")] {
        handle_payload_on(&state, &click(user, value, today), today)
            .await
            .expect("handled");
    }

    let last = slack.updates().last().expect("update").1.clone();
    assert!(last.contains("\u{1f3e2} Office (2)"));
    assert!(last.contains("\u{1f697} Off-site (1)"));
    assert!(last.contains("\u{1f44b} Leave (0)"));
}

// ─── Value handling ──────────────────────────────────────────────────

#[tokio::test]
async fn legacy_japanese_value_is_accepted() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    let outcome = handle_payload_on(&state, &click("U1", "在宅", today), today)
        .await
        .expect("handled");

    assert_eq!(
        outcome,
        Outcome::StatusRecorded {
            status: WorkStatus::Remote,
            change: UpsertOutcome::Created,
        }
    );
}

#[tokio::test]
async fn unknown_value_is_ignored_without_side_effects() {
    let slack = FakeSlack::new();
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    let outcome = handle_payload_on(&state, &click("U1", "vacation", today), today)
        .await
        .expect("handled");

    assert_eq!(outcome, Outcome::Ignored);
    assert!(slack.calls().is_empty());
    let repo = StatusRepo::new(Arc::clone(&state.db));
    assert!(repo
        .list_for_day(CHANNEL, today)
        .await
        .expect("list")
        .is_empty());
}

// ─── Degraded paths ──────────────────────────────────────────────────

#[tokio::test]
async fn profile_failure_falls_back_to_account_name() {
    let slack = FakeSlack::new();
    slack.add_broken_member("U1");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    handle_payload_on(&state, &click("U1", "office", today), today)
        .await
        .expect("handled");

    let posted = slack.posted();
    assert_eq!(posted[0].text, "u1-account selected \u{1f3e2} Office");
}

#[tokio::test]
async fn slack_outage_still_records_status() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    slack.fail_writes();
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();

    let outcome = handle_payload_on(&state, &click("U1", "office", today), today)
        .await
        .expect("slack failures are absorbed");

    assert_eq!(outcome, Outcome::Degraded);
    let repo = StatusRepo::new(Arc::clone(&state.db));
    let record = repo.find("U1", CHANNEL, today).await.expect("find");
    assert_eq!(record.map(|r| r.status), Some(WorkStatus::Office));
}

#[tokio::test]
async fn store_failure_is_propagated() {
    let slack = FakeSlack::new();
    slack.add_member("U1", "Alice");
    let state = test_state(Arc::clone(&slack)).await;
    let today = board_day();
    state.db.close().await;

    let err = handle_payload_on(&state, &click("U1", "office", today), today)
        .await
        .expect_err("store is closed");

    assert!(err.is_store_failure());
    assert!(slack.updates().is_empty());
}

// ─── Concurrent clicks ───────────────────────────────────────────────

#[tokio::test]
async fn concurrent_clicks_leave_a_single_record() {
    let temp = tempfile::tempdir().expect("tempdir");
    let pool = presence_board::persistence::db::connect(&temp.path().join("board.db"))
        .await
        .expect("db");
    let repo = StatusRepo::new(Arc::new(pool));
    let today = board_day();

    let handles: Vec<_> = WorkStatus::ALL
        .iter()
        .cycle()
        .take(8)
        .map(|status| {
            let repo = repo.clone();
            let status = *status;
            tokio::spawn(async move { repo.upsert("U1", CHANNEL, today, status).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("upsert");
    }

    let records = repo.list_for_day(CHANNEL, today).await.expect("list");
    assert_eq!(records.len(), 1);
    let counts = repo.count_by_status(CHANNEL, today).await.expect("counts");
    assert_eq!(counts.total(), 1);
}
