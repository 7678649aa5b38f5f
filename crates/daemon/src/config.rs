// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use igor_engine::JobCenterConfig;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn var_u64(name: &str) -> Option<u64> {
    var(name).and_then(|s| s.parse().ok())
}

/// Root directory Job sessions/artifacts are written under.
/// `IGORD_SESSION_DIR` > `IGORD_STATE_DIR`/sessions > `./igord-state/sessions`.
pub fn session_dir() -> PathBuf {
    if let Some(dir) = var("IGORD_SESSION_DIR") {
        return PathBuf::from(dir);
    }
    state_dir().join("sessions")
}

/// Root directory the daemon's own bookkeeping lives under.
pub fn state_dir() -> PathBuf {
    var("IGORD_STATE_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("igord-state"))
}

/// Directory scanned for testsuite/testplan/profile/host catalog files.
pub fn catalog_dir() -> PathBuf {
    var("IGORD_CATALOG_DIR").map(PathBuf::from).unwrap_or_else(|| state_dir().join("catalog"))
}

/// Directory scanned for lifecycle hook executables.
pub fn hook_dir() -> Option<PathBuf> {
    var("IGORD_HOOK_DIR").map(PathBuf::from)
}

/// Address the HTTP control surface binds to.
pub fn http_addr() -> String {
    var("IGORD_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:8090".to_string())
}

/// Placeholder bearer token. `None` disables the check entirely.
pub fn auth_token() -> Option<String> {
    var("IGORD_AUTH_TOKEN")
}

pub fn poll_interval() -> Duration {
    Duration::from_millis(var_u64("IGORD_POLL_INTERVAL_MS").unwrap_or(10_000))
}

pub fn watchdog_interval() -> Duration {
    Duration::from_millis(var_u64("IGORD_WATCHDOG_INTERVAL_MS").unwrap_or(10_000))
}

pub fn cleanup_age() -> Duration {
    Duration::from_secs(var_u64("IGORD_CLEANUP_AGE_SECS").unwrap_or(5 * 60))
}

pub fn max_cleaned_jobs() -> usize {
    var_u64("IGORD_MAX_CLEANED_JOBS").unwrap_or(10) as usize
}

/// Comma-separated host names to seed the bootstrap `FakeHost` origin with,
/// giving a freshly started daemon something submittable to exercise
/// against without a concrete host driver.
pub fn fake_host_names() -> Vec<String> {
    var("IGORD_FAKE_HOSTS").map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()).unwrap_or_default()
}

/// Comma-separated profile names to seed the bootstrap `FakeProfile` origin
/// with, same rationale as [`fake_host_names`].
pub fn fake_profile_names() -> Vec<String> {
    var("IGORD_FAKE_PROFILES").map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()).unwrap_or_default()
}

pub fn jobcenter_config() -> JobCenterConfig {
    JobCenterConfig {
        session_root: session_dir(),
        max_cleaned_jobs: max_cleaned_jobs(),
        cleanup_age: cleanup_age(),
        worker_interval: poll_interval(),
        watchdog_interval: watchdog_interval(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
