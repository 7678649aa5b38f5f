// SPDX-License-Identifier: MIT

//! `GET /testjob/<cookie>`: the bootstrap script a freshly booted guest
//! fetches to begin reporting results. Disables PXE for the job's host as
//! a side effect (so a reboot lands on the installed image rather than
//! PXE-booting again), then substitutes the cookie, current step, and
//! testsuite name into a fixed template.

use axum::extract::{Path, State};

use crate::error::DaemonError;
use crate::state::AppState;

const TEMPLATE: &str = include_str!("bootstrap_script.sh.tmpl");

pub async fn testjob(State(state): State<AppState>, Path(cookie): Path<String>) -> Result<String, DaemonError> {
    let job = state.center.get_job(&cookie)?;
    state.center.enable_pxe(&cookie, false).await?;

    let rendered = TEMPLATE
        .replace("${igor_cookie}", job.cookie())
        .replace("${igor_current_step}", &job.current_step().to_string())
        .replace("${igor_testsuite}", job.testsuite().name.as_str());
    Ok(rendered)
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
