// SPDX-License-Identifier: MIT

//! `/testsuites/...` handlers.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::DaemonError;
use crate::state::AppState;

use super::snapshot::render;

pub async fn list(State(state): State<AppState>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let testsuites = state.inventory.testsuites.items().await?;
    let entries: Vec<igor_wire::TestsuiteListEntry> = testsuites
        .into_values()
        .map(|suite| igor_wire::TestsuiteListEntry {
            name: suite.name.clone(),
            description: suite.description.clone(),
            testcase_count: suite.flatten().len(),
        })
        .collect();
    render(&params, "testsuites", &entries)
}

/// `GET /testsuites/validate`: whether each testsuite's archive can be
/// built without error.
pub async fn validate(State(state): State<AppState>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let testsuites = state.inventory.testsuites.items().await?;
    let report: igor_wire::ValidationReport = testsuites
        .into_iter()
        .map(|(name, suite)| {
            let valid = igor_catalog::build_testsuite_archive(&suite, &state.catalog_root).is_ok();
            (name, valid)
        })
        .collect();
    render(&params, "validation", &report)
}

pub async fn summary(State(state): State<AppState>, Path(name): Path<String>, params: Query<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let suite = state
        .inventory
        .testsuites
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("testsuite", name))?;
    render(&params, "testsuite", &suite)
}

/// Handles both `/testsuites/<name>/download` and
/// `/testsuites/<name>/download/<filename>` — the optional trailing filename
/// segment has no bearing on the archive's contents, matching the
/// original's `tarball="testsuite.tar"` default-named-but-ignored param.
pub async fn download(State(state): State<AppState>, Path(path_params): Path<HashMap<String, String>>) -> Result<Response, DaemonError> {
    let name = path_params.get("name").cloned().unwrap_or_default();
    let suite = state
        .inventory
        .testsuites
        .lookup(&name)
        .await?
        .ok_or_else(|| DaemonError::not_found("testsuite", name))?;
    let archive = igor_catalog::build_testsuite_archive(&suite, &state.catalog_root)?;
    Ok(([(header::CONTENT_TYPE, "application/x-tar")], archive).into_response())
}

#[cfg(test)]
#[path = "testsuites_tests.rs"]
mod tests;
