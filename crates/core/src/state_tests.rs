// SPDX-License-Identifier: MIT

use std::time::Duration;

use super::*;
use crate::clock::FakeClock;

const OPEN: State = State("open");
const RUNNING: State = State("running");

#[test]
fn new_seeds_a_single_entry() {
    let clock = FakeClock::new();
    let history = StateHistory::new(OPEN, &clock);
    assert_eq!(history.current(), OPEN);
    assert_eq!(history.snapshot().len(), 1);
}

#[test]
fn push_appends_and_updates_current() {
    let clock = FakeClock::new();
    let history = StateHistory::new(OPEN, &clock);
    clock.advance(Duration::from_secs(1));
    history.push(RUNNING, &clock);

    assert_eq!(history.current(), RUNNING);
    let snapshot = history.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].state, OPEN);
    assert_eq!(snapshot[1].state, RUNNING);
    assert!(snapshot[1].created_at > snapshot[0].created_at);
}

#[tokio::test]
async fn wait_for_change_wakes_on_push() {
    let clock = FakeClock::new();
    let history = std::sync::Arc::new(StateHistory::new(OPEN, &clock));

    let waiter = {
        let history = history.clone();
        tokio::spawn(async move {
            history.wait_for_change().await;
        })
    };

    tokio::task::yield_now().await;
    history.push(RUNNING, &clock);

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn wait_for_change_blocks_again_after_being_consumed() {
    let clock = FakeClock::new();
    let history = StateHistory::new(OPEN, &clock);
    history.push(RUNNING, &clock);
    history.wait_for_change().await;

    let second_wait = tokio::time::timeout(Duration::from_millis(50), history.wait_for_change());
    assert!(second_wait.await.is_err(), "should still be blocked");
}
