// SPDX-License-Identifier: MIT

//! `/jobs/...` handlers.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use igor_catalog::JobSpec;
use serde::Serialize;

use crate::error::DaemonError;
use crate::state::AppState;

use super::snapshot::{job_snapshot, render};

#[derive(Serialize)]
struct JobSubmission {
    cookie: String,
    job: igor_wire::JobSnapshot,
}

async fn resolve_job_spec(state: &AppState, suite: &str, profile: &str, host: &str) -> Result<JobSpec, DaemonError> {
    let testsuite = state
        .inventory
        .testsuites
        .lookup(suite)
        .await?
        .ok_or_else(|| DaemonError::not_found("testsuite", suite))?;
    let profile = state
        .inventory
        .profiles
        .lookup(profile)
        .await?
        .ok_or_else(|| DaemonError::not_found("profile", profile))?;
    let host = state
        .inventory
        .hosts
        .lookup(host)
        .await?
        .ok_or_else(|| DaemonError::not_found("host", host))?;
    Ok(JobSpec {
        testsuite,
        profile,
        host,
        additional_kargs: String::new(),
    })
}

async fn submit_common(
    state: &AppState,
    suite: &str,
    profile: &str,
    host: &str,
    preferred_cookie: Option<String>,
    additional_kargs: Option<String>,
) -> Result<JobSubmission, DaemonError> {
    let mut spec = resolve_job_spec(state, suite, profile, host).await?;
    if let Some(kargs) = additional_kargs {
        spec.additional_kargs = kargs;
    }
    let (cookie, job) = state.center.submit(spec, preferred_cookie)?;
    Ok(JobSubmission {
        cookie,
        job: job_snapshot(&job),
    })
}

pub async fn list(State(state): State<AppState>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let jobs = state.center.list_jobs();
    let entries = jobs
        .into_iter()
        .map(|job| igor_wire::JobListEntry {
            cookie: job.cookie().to_string(),
            profile: job.profile_name().to_string(),
            host: job.host_name().to_string(),
            state: job.state().to_string(),
            current_step: job.current_step(),
            total_steps: job.testsuite().flatten().len(),
        })
        .collect();
    let view = igor_wire::JobsListView {
        jobs: entries,
        closed: state.center.list_closed(None),
    };
    render(&params, "jobs", &view)
}

pub async fn submit(
    State(state): State<AppState>,
    Path((suite, profile, host)): Path<(String, String, String)>,
    params: Query<HashMap<String, String>>,
) -> Result<Response, DaemonError> {
    let kargs = params.get("additional_kargs").cloned();
    let submission = submit_common(&state, &suite, &profile, &host, None, kargs).await?;
    render(&params, "job", &submission)
}

pub async fn submit_with_cookie(
    State(state): State<AppState>,
    Path((suite, profile, host, cookie)): Path<(String, String, String, String)>,
    params: Query<HashMap<String, String>>,
) -> Result<Response, DaemonError> {
    let kargs = params.get("additional_kargs").cloned();
    let submission = submit_common(&state, &suite, &profile, &host, Some(cookie), kargs).await?;
    render(&params, "job", &submission)
}

pub async fn start(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<(), DaemonError> {
    state.center.start_job(&cookie)?;
    Ok(())
}

pub async fn status(State(state): State<AppState>, Path(cookie): Path<String>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    render(&params, "job", &job_snapshot(&job))
}

pub async fn report_rst(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<String, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    Ok(igor_wire::job_report_rst(&job_snapshot(&job)))
}

pub async fn report_junit(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<Response, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    let body = igor_wire::job_report_junit(&job_snapshot(&job));
    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

pub async fn skip_step(State(state): State<AppState>, Path((cookie, n)): Path<(String, usize)>) -> Result<String, DaemonError> {
    let next = state.center.skip_step(&cookie, n).await?;
    Ok(next.to_string())
}

pub async fn finish_step(
    State(state): State<AppState>,
    Path((cookie, n, outcome)): Path<(String, usize, String)>,
    params: Query<HashMap<String, String>>,
) -> Result<String, DaemonError> {
    let is_success = match outcome.as_str() {
        "success" => true,
        "failed" => false,
        other => return Err(DaemonError::precondition(format!("unknown step outcome '{other}'"))),
    };
    let note = params.get("note").cloned();
    let next = state.center.finish_test_step(&cookie, n, is_success, note).await?;
    Ok(next.to_string())
}

pub async fn step_result(State(state): State<AppState>, Path((cookie, n)): Path<(String, usize)>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let record = state.center.test_step_result(&cookie, n)?;
    let view = igor_wire::StepResultView::from(&record);
    render(&params, "result", &view)
}

pub async fn annotate(State(state): State<AppState>, Path(cookie): Path<String>, note: String) -> Result<(), DaemonError> {
    state.center.annotate_current_step(&cookie, note).await?;
    Ok(())
}

pub async fn abort(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<(), DaemonError> {
    state.center.abort_job(&cookie).await?;
    Ok(())
}

pub async fn testsuite_archive(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<Response, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    let archive = igor_catalog::build_testsuite_archive(job.testsuite(), &state.catalog_root)?;
    Ok(([(header::CONTENT_TYPE, "application/x-bzip2")], archive).into_response())
}

pub async fn list_artifacts(State(state): State<AppState>, Path(cookie): Path<String>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    let names = job.list_artifacts()?;
    render(&params, "artifacts", &names)
}

pub async fn artifacts_archive(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<Response, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    let archive = job.get_artifacts_archive()?;
    Ok(([(header::CONTENT_TYPE, "application/x-bzip2")], archive).into_response())
}

pub async fn put_artifact(State(state): State<AppState>, Path((cookie, name)): Path<(String, String)>, body: Bytes) -> Result<(), DaemonError> {
    let job = state.center.get_job(&cookie)?;
    job.add_artifact_to_current_step(&name, &body)?;
    Ok(())
}

pub async fn get_artifact(State(state): State<AppState>, Path((cookie, name)): Path<(String, String)>) -> Result<Response, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    let bytes = job.get_artifact(&name)?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response())
}

pub async fn set_enable_pxe(State(state): State<AppState>, Path((cookie, enable)): Path<(String, bool)>) -> Result<(), DaemonError> {
    state.center.enable_pxe(&cookie, enable).await?;
    Ok(())
}

pub async fn set_kernelargs(State(state): State<AppState>, Path((cookie, args)): Path<(String, String)>) -> Result<(), DaemonError> {
    state.center.set_kernelargs(&cookie, &args).await?;
    Ok(())
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
