// SPDX-License-Identifier: MIT

//! Wire-level views over `igor-engine`'s live types.
//!
//! `igor-wire` deliberately does not depend on `igor-engine`: `Job` is
//! generic over `Clock` and holds behavior, not data, so the daemon (which
//! already depends on both crates) builds a [`JobSnapshot`] by reading a
//! `Job`'s accessors and handing the plain values to [`JobSnapshot::new`].
//! The conversion point lives in the daemon instead of in this crate, since
//! the source type is generic.

use std::collections::BTreeMap;

use igor_core::{StepRecord, Testsuite};
use serde::{Deserialize, Serialize};

/// One entry of a Job's append-only state history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateHistoryEntryView {
    pub created_at: u64,
    pub state: String,
}

/// The outcome of one finished testcase step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepResultView {
    pub created_at: u64,
    pub testcase: String,
    pub is_success: bool,
    pub is_passed: bool,
    pub is_abort: bool,
    pub is_skipped: bool,
    pub note: Option<String>,
    pub runtime_ms: u64,
    pub log: Option<String>,
    pub annotations: Vec<String>,
}

impl From<&StepRecord> for StepResultView {
    fn from(record: &StepRecord) -> Self {
        Self {
            created_at: record.created_at,
            testcase: record.testcase.name.clone(),
            is_success: record.is_success,
            is_passed: record.is_passed,
            is_abort: record.is_abort,
            is_skipped: record.is_skipped,
            note: record.note.clone(),
            runtime_ms: record.runtime_ms,
            log: record.log.clone(),
            annotations: record.annotations.clone(),
        }
    }
}

/// The full dictionary shape for Job serialization: cookie,
/// profile name, host name, full testsuite tree, current state, `is_endstate`
/// flag, `current_step`, `results`, `timeout`, `runtime`, `created_at`,
/// artifact names, `additional_kargs` — plus the `history` restoration noted
/// in SPEC_FULL.md's §4.4 supplement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSnapshot {
    pub cookie: String,
    pub profile: String,
    pub host: String,
    pub testsuite: Testsuite,
    pub state: String,
    pub is_endstate: bool,
    pub current_step: usize,
    pub results: Vec<StepResultView>,
    pub timeout_ms: u64,
    pub runtime_ms: u64,
    pub created_at: u64,
    pub ended_at: Option<u64>,
    pub artifacts: Vec<String>,
    pub additional_kargs: String,
    pub history: Vec<StateHistoryEntryView>,
}

#[allow(clippy::too_many_arguments)]
impl JobSnapshot {
    pub fn new(
        cookie: String,
        profile: String,
        host: String,
        testsuite: Testsuite,
        state: String,
        is_endstate: bool,
        current_step: usize,
        results: Vec<StepResultView>,
        timeout_ms: u64,
        runtime_ms: u64,
        created_at: u64,
        ended_at: Option<u64>,
        artifacts: Vec<String>,
        additional_kargs: String,
        history: Vec<StateHistoryEntryView>,
    ) -> Self {
        Self {
            cookie,
            profile,
            host,
            testsuite,
            state,
            is_endstate,
            current_step,
            results,
            timeout_ms,
            runtime_ms,
            created_at,
            ended_at,
            artifacts,
            additional_kargs,
            history,
        }
    }
}

/// Light entry for the `GET /jobs` listing (full snapshots are reserved for
/// `GET /jobs/<cookie>/status`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobListEntry {
    pub cookie: String,
    pub profile: String,
    pub host: String,
    pub state: String,
    pub current_step: usize,
    pub total_steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct JobsListView {
    pub jobs: Vec<JobListEntry>,
    pub closed: Vec<String>,
}

/// A point-in-time view of a running or finished test plan (mirrors
/// `igor-engine::planworker::PlanSnapshot`, kept as a separate type for the
/// same reason [`JobSnapshot`] is — this crate stays independent of the
/// generic `igor-engine` types).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSnapshotView {
    pub name: String,
    pub passed: bool,
    pub finished: bool,
    pub job_cookies: Vec<String>,
}

impl PlanSnapshotView {
    pub fn new(name: String, passed: bool, finished: bool, job_cookies: Vec<String>) -> Self {
        Self { name, passed, finished, job_cookies }
    }
}

/// Listing entry for `GET /testsuites`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestsuiteListEntry {
    pub name: String,
    pub description: String,
    pub testcase_count: usize,
}

/// Listing entry for `GET /testplans`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestplanListEntry {
    pub name: String,
    pub description: String,
    pub job_count: usize,
}

/// Listing entry for `GET /profiles` and `GET /hosts` (both are bare-name
/// listings).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
}

/// `GET /testsuites/validate` response: name -> whether it resolves/loads
/// cleanly.
pub type ValidationReport = BTreeMap<String, bool>;

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
