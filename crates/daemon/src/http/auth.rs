// SPDX-License-Identifier: MIT

//! Placeholder bearer-token check. When `IGORD_AUTH_TOKEN` is unset, every
//! request passes through unchecked.

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::DaemonError;
use crate::state::AppState;

pub async fn require_bearer_token<B>(State(state): State<AppState>, request: Request<B>, next: Next<B>) -> Result<Response, DaemonError> {
    let Some(expected) = &state.auth_token else {
        return Ok(next.run(request).await);
    };

    // `/healthz` stays reachable without a token so orchestrators can probe
    // liveness before any credential is provisioned.
    if request.uri().path() == "/healthz" {
        return Ok(next.run(request).await);
    }

    let supplied = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if supplied == Some(expected.as_str()) {
        Ok(next.run(request).await)
    } else {
        Err(DaemonError::Unauthorized)
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
