// SPDX-License-Identifier: MIT

//! The state-machine primitive shared by every named, history-tracked value
//! in Igor (today, only [`crate::step::JobState`] rides on it).
//!
//! A [`State`] is a named value, equal by name. [`StateHistory`] appends
//! `{created_at, state}` entries and exposes a change-notification primitive:
//! pushing a new state wakes any task parked in [`StateHistory::wait_for_change`],
//! and the wake is one-shot — the flag clears in the same critical section a
//! waiter observes it, so a subsequent wait blocks again until the next push.

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::clock::Clock;

/// A named state. Equality and `Display` are by name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State(pub &'static str);

impl State {
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// One entry in a [`StateHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHistoryEntry {
    pub created_at: u64,
    pub state: State,
}

/// Append-only history of state transitions, with a change-notification
/// primitive for waiters.
pub struct StateHistory {
    entries: Mutex<Vec<StateHistoryEntry>>,
    current: Mutex<State>,
    notify: Notify,
    changed: Mutex<bool>,
}

impl StateHistory {
    pub fn new(initial: State, clock: &impl Clock) -> Self {
        let entry = StateHistoryEntry {
            created_at: clock.epoch_ms(),
            state: initial,
        };
        Self {
            entries: Mutex::new(vec![entry]),
            current: Mutex::new(initial),
            notify: Notify::new(),
            changed: Mutex::new(false),
        }
    }

    /// Append a new state and wake any waiter.
    pub fn push(&self, state: State, clock: &impl Clock) {
        let entry = StateHistoryEntry {
            created_at: clock.epoch_ms(),
            state,
        };
        self.entries.lock().push(entry);
        *self.current.lock() = state;
        *self.changed.lock() = true;
        self.notify.notify_waiters();
    }

    pub fn current(&self) -> State {
        *self.current.lock()
    }

    /// Full append-only history, oldest first.
    pub fn snapshot(&self) -> Vec<StateHistoryEntry> {
        self.entries.lock().clone()
    }

    /// Block until the next [`push`](Self::push) after this call began.
    ///
    /// Arms the notification before checking the flag so a push racing with
    /// the check is never missed.
    pub async fn wait_for_change(&self) {
        loop {
            let notified = self.notify.notified();
            {
                let mut changed = self.changed.lock();
                if *changed {
                    *changed = false;
                    return;
                }
            }
            notified.await;
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
