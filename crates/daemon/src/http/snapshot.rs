// SPDX-License-Identifier: MIT

//! Assembles `igor-wire` DTOs from live `igor-engine`/`igor-adapters`
//! values. `igor-wire` cannot do this itself — its DTOs have no dependency
//! on the generic, behavior-carrying `Job<C>` type, so the daemon is the
//! one place that reads a Job's accessors and hands them to
//! `JobSnapshot::new`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::response::{IntoResponse, Response};
use igor_core::SystemClock;
use igor_engine::{Job, PlanSnapshot};
use igor_wire::{Format, JobSnapshot, PlanSnapshotView, StateHistoryEntryView, StepResultView};
use serde::Serialize;

use crate::error::DaemonError;

pub fn job_snapshot(job: &Arc<Job<SystemClock>>) -> JobSnapshot {
    let results: Vec<StepResultView> = job.results().iter().map(StepResultView::from).collect();
    let history: Vec<StateHistoryEntryView> = job
        .history()
        .into_iter()
        .map(|entry| StateHistoryEntryView {
            created_at: entry.created_at,
            state: entry.state.name().to_string(),
        })
        .collect();
    JobSnapshot::new(
        job.cookie().to_string(),
        job.profile_name().to_string(),
        job.host_name().to_string(),
        job.testsuite().clone(),
        job.state().to_string(),
        job.is_endstate(),
        job.current_step(),
        results,
        job.timeout_ms(),
        job.runtime_ms(),
        job.created_at(),
        job.ended_at(),
        job.list_artifacts().unwrap_or_default(),
        job.additional_kargs().to_string(),
        history,
    )
}

pub fn plan_snapshot_view(snapshot: PlanSnapshot) -> PlanSnapshotView {
    PlanSnapshotView::new(snapshot.name, snapshot.passed, snapshot.finished, snapshot.job_cookies)
}

/// Extracts `?format=` and renders `value` rooted at `root_tag` as
/// JSON, XML, or YAML.
pub fn render(params: &Query<HashMap<String, String>>, root_tag: &str, value: &impl Serialize) -> Result<Response, DaemonError> {
    let format = Format::parse(params.get("format").map(String::as_str))?;
    let (content_type, body) = igor_wire::render(format, root_tag, value)?;
    Ok(([(axum::http::header::CONTENT_TYPE, content_type)], body).into_response())
}
