// SPDX-License-Identifier: MIT

//! Job state tags and per-step results.

use serde::{Deserialize, Serialize};

use crate::state::State;
use crate::testcase::Testcase;

/// The fixed, closed set of states a Job passes through.
///
/// `Passed`, `Failed`, `Aborted`, and `Timedout` are the endstates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Open,
    Preparing,
    Prepared,
    Running,
    Passed,
    Failed,
    Aborted,
    Timedout,
}

crate::simple_display!(JobState {
    Open => "open",
    Preparing => "preparing",
    Prepared => "prepared",
    Running => "running",
    Passed => "passed",
    Failed => "failed",
    Aborted => "aborted",
    Timedout => "timedout",
});

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Passed | Self::Failed | Self::Aborted | Self::Timedout
        )
    }

    /// Project onto the generic [`State`] primitive for storage in a
    /// [`crate::state::StateHistory`].
    pub fn as_state(&self) -> State {
        State(match self {
            Self::Open => "open",
            Self::Preparing => "preparing",
            Self::Prepared => "prepared",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
            Self::Timedout => "timedout",
        })
    }

    /// Inverse of [`as_state`](Self::as_state). `None` for any name outside
    /// the closed set — callers own a `StateHistory` seeded exclusively with
    /// `JobState`s, so this should never actually miss in practice.
    pub fn from_state(state: State) -> Option<Self> {
        Some(match state.name() {
            "open" => Self::Open,
            "preparing" => Self::Preparing,
            "prepared" => Self::Prepared,
            "running" => Self::Running,
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "aborted" => Self::Aborted,
            "timedout" => Self::Timedout,
            _ => return None,
        })
    }
}

/// The outcome of one finished testcase step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub created_at: u64,
    pub testcase: Testcase,
    pub is_success: bool,
    pub is_passed: bool,
    pub is_abort: bool,
    pub is_skipped: bool,
    pub note: Option<String>,
    pub runtime_ms: u64,
    pub log: Option<String>,
    pub annotations: Vec<String>,
}

/// Builds a [`StepRecord`], computing `is_passed` from `is_success XOR
/// testcase.expect_failure` so callers can never construct an inconsistent one.
#[derive(Debug, Clone)]
pub struct StepRecordBuilder {
    created_at: u64,
    testcase: Testcase,
    is_success: bool,
    is_abort: bool,
    is_skipped: bool,
    note: Option<String>,
    runtime_ms: u64,
    log: Option<String>,
    annotations: Vec<String>,
}

impl StepRecordBuilder {
    pub fn new(created_at: u64, testcase: Testcase, is_success: bool) -> Self {
        Self {
            created_at,
            testcase,
            is_success,
            is_abort: false,
            is_skipped: false,
            note: None,
            runtime_ms: 0,
            log: None,
            annotations: Vec::new(),
        }
    }

    crate::setters!(
        set {
            is_abort: bool,
            is_skipped: bool,
            runtime_ms: u64,
            annotations: Vec<String>,
        }
        option {
            note: String,
            log: String,
        }
    );

    pub fn build(self) -> StepRecord {
        let is_passed = self.is_success != self.testcase.expect_failure;
        StepRecord {
            created_at: self.created_at,
            testcase: self.testcase,
            is_success: self.is_success,
            is_passed,
            is_abort: self.is_abort,
            is_skipped: self.is_skipped,
            note: self.note,
            runtime_ms: self.runtime_ms,
            log: self.log,
            annotations: self.annotations,
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
