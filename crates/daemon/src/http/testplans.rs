// SPDX-License-Identifier: MIT

//! `/testplans/...` handlers.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::DaemonError;
use crate::state::AppState;

use super::snapshot::{job_snapshot, plan_snapshot_view, render};

pub async fn list(State(state): State<AppState>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let plans = state.inventory.plans.items().await?;
    let entries: Vec<igor_wire::TestplanListEntry> = plans
        .into_values()
        .map(|plan| igor_wire::TestplanListEntry {
            name: plan.name.clone(),
            description: plan.description.clone(),
            job_count: plan.job_layouts.len(),
        })
        .collect();
    render(&params, "testplans", &entries)
}

pub async fn entity(State(state): State<AppState>, Path(name): Path<String>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let plan = state
        .inventory
        .plans
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("plan", name))?;
    render(&params, "testplan", &plan)
}

/// `GET /testplans/<name>/submit`: query params other than `planid` become
/// ad-hoc plan variables layered over the plan's own `variables` map,
/// overriding on name collision.
pub async fn submit(State(state): State<AppState>, Path(name): Path<String>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let mut plan = state
        .inventory
        .plans
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("plan", name.clone()))?;

    let planid = params.get("planid").cloned().unwrap_or_else(|| name.clone());
    for (key, value) in params.iter() {
        if key != "planid" && key != "format" {
            plan.variables.insert(key.clone(), value.clone());
        }
    }

    let worker = state.center.submit_plan(name, plan, planid, state.inventory.clone())?;
    render(&params, "plan", &plan_snapshot_view(worker.snapshot()))
}

pub async fn abort(State(state): State<AppState>, Path(name): Path<String>) -> Result<(), DaemonError> {
    state.center.abort_plan(&name).await?;
    Ok(())
}

pub async fn status(State(state): State<AppState>, Path(name): Path<String>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let snapshot = state.center.status_plan(&name)?;
    render(&params, "plan", &plan_snapshot_view(snapshot))
}

fn plan_jobs(state: &AppState, snapshot: &igor_engine::PlanSnapshot) -> Vec<igor_wire::JobSnapshot> {
    snapshot
        .job_cookies
        .iter()
        .filter_map(|cookie| state.center.get_job(cookie).ok())
        .map(|job| job_snapshot(&job))
        .collect()
}

pub async fn report_rst(State(state): State<AppState>, Path(name): Path<String>) -> Result<String, DaemonError> {
    let snapshot = state.center.status_plan(&name)?;
    let jobs = plan_jobs(&state, &snapshot);
    Ok(igor_wire::plan_report_rst(&name, &jobs))
}

pub async fn report_junit(State(state): State<AppState>, Path(name): Path<String>) -> Result<Response, DaemonError> {
    let snapshot = state.center.status_plan(&name)?;
    let jobs = plan_jobs(&state, &snapshot);
    let body = igor_wire::plan_report_junit(&name, &jobs);
    Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
}

#[cfg(test)]
#[path = "testplans_tests.rs"]
mod tests;
