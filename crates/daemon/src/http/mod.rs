// SPDX-License-Identifier: MIT

//! axum `Router`, built one module per route group: jobs, testsuites,
//! testplans, profiles/hosts, and the guest-facing bootstrap endpoint each
//! get their own file.

mod auth;
mod bootstrap;
mod jobs;
mod profiles_hosts;
mod snapshot;
mod testplans;
mod testsuites;

use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/static/igor.xsl", get(static_stylesheet))
        .route("/jobs", get(jobs::list))
        .route("/jobs/submit/:suite/with/:profile/on/:host", get(jobs::submit))
        .route("/jobs/submit/:suite/with/:profile/on/:host/:cookie", get(jobs::submit_with_cookie))
        .route("/jobs/:cookie/start", get(jobs::start))
        .route("/jobs/:cookie/status", get(jobs::status))
        .route("/jobs/:cookie/report", get(jobs::report_rst))
        .route("/jobs/:cookie/report/junit", get(jobs::report_junit))
        .route("/jobs/:cookie/step/:n/skip", get(jobs::skip_step))
        .route("/jobs/:cookie/step/:n/:outcome", get(jobs::finish_step))
        .route("/jobs/:cookie/step/:n/result", get(jobs::step_result))
        .route("/jobs/:cookie/step/current/annotate", put(jobs::annotate))
        .route("/jobs/:cookie/abort", get(jobs::abort))
        .route("/jobs/:cookie", delete(jobs::abort))
        .route("/jobs/:cookie/testsuite", get(jobs::testsuite_archive))
        .route("/jobs/:cookie/artifacts", get(jobs::list_artifacts))
        .route("/jobs/:cookie/archive", get(jobs::artifacts_archive))
        .route("/jobs/:cookie/artifacts/:name", put(jobs::put_artifact))
        .route("/jobs/:cookie/artifacts/:name", get(jobs::get_artifact))
        .route("/jobs/:cookie/set/enable_pxe/:enable", get(jobs::set_enable_pxe))
        .route("/jobs/:cookie/set/kernelargs/:args", get(jobs::set_kernelargs))
        .route("/testjob/:cookie", get(bootstrap::testjob))
        .route("/testsuites", get(testsuites::list))
        .route("/testsuites/validate", get(testsuites::validate))
        .route("/testsuites/:name/summary", get(testsuites::summary))
        .route("/testsuites/:name/download", get(testsuites::download))
        .route("/testsuites/:name/download/:filename", get(testsuites::download))
        .route("/testplans", get(testplans::list))
        .route("/testplans/:name", get(testplans::entity))
        .route("/testplans/:name/submit", get(testplans::submit))
        .route("/testplans/:name/abort", get(testplans::abort))
        .route("/testplans/:name/status", get(testplans::status))
        .route("/testplans/:name/report", get(testplans::report_rst))
        .route("/testplans/:name/report/junit", get(testplans::report_junit))
        .route("/profiles", get(profiles_hosts::list_profiles))
        .route("/hosts", get(profiles_hosts::list_hosts))
        .route("/profiles/:name", put(profiles_hosts::create_profile))
        .route("/profiles/:name", delete(profiles_hosts::delete_profile))
        .route("/profiles/:name/kargs", get(profiles_hosts::get_kargs))
        .route("/profiles/:name/kargs", put(profiles_hosts::set_kargs))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(state.clone(), auth::require_bearer_token))
        .with_state(state)
}

async fn root() -> axum::response::Html<&'static str> {
    axum::response::Html("<html><body><h1>igord</h1><p>Igor test-execution daemon.</p></body></html>")
}

async fn healthz() -> &'static str {
    "ok"
}

/// A static stub for the `xml-stylesheet` processing instruction
/// `igor-wire::STYLESHEET_HREF` points `?format=xml` responses at. Rendering
/// a working XSLT transform is out of scope; this is enough for clients that
/// merely dereference the reference to find something there.
async fn static_stylesheet() -> ([(axum::http::HeaderName, &'static str); 1], &'static str) {
    ([(axum::http::header::CONTENT_TYPE, "application/xslt+xml")], "<xsl:stylesheet version=\"1.0\" xmlns:xsl=\"http://www.w3.org/1999/XSL/Transform\"/>")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
