// SPDX-License-Identifier: MIT

//! Hook fan-out: every script under the configured hook
//! directory is run with `(hook-name, cookie)` at each lifecycle point.
//!
//! Each hook runs as a subprocess under a fixed timeout via
//! `tokio::process::Command`; a missing hook directory or script is not an
//! error, just a no-op.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::events::EventPublisher;

/// The closed set of hook names the daemon will ever invoke. Anything else
/// passed to [`HookRunner::run_hook`] is a programming error in this crate,
/// not a dynamic input — it is still only logged, never panicked on.
pub const HOOK_NAMES: &[&str] = &[
    "pre-job",
    "post-job",
    "post-testcase",
    "post-setup",
    "post-start",
    "post-annotate",
    "post-end",
];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs every executable in a hook directory for a lifecycle point, and
/// mirrors the same event onto the broadcast publisher regardless of whether
/// any script actually exists. Failures are logged and otherwise discarded.
pub struct HookRunner {
    hook_dir: Option<PathBuf>,
    timeout: Duration,
    events: EventPublisher,
}

impl HookRunner {
    pub fn new(hook_dir: Option<PathBuf>, events: EventPublisher) -> Self {
        Self {
            hook_dir,
            timeout: DEFAULT_TIMEOUT,
            events,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    pub async fn run_hook(&self, hook: &str, cookie: &str) {
        if !HOOK_NAMES.contains(&hook) {
            warn!(hook, "unknown hook name, ignoring");
            return;
        }

        self.events.publish(hook, cookie);

        let Some(dir) = &self.hook_dir else {
            return;
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "could not list hook directory");
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "error reading hook directory");
                    break;
                }
            };
            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                _ => continue,
            }
            if let Err(err) = run_one(&path, hook, cookie, self.timeout).await {
                warn!(hook, cookie, script = %path.display(), %err, "hook script failed");
            } else {
                debug!(hook, cookie, script = %path.display(), "hook script ran");
            }
        }
    }
}

async fn run_one(path: &Path, hook: &str, cookie: &str, timeout: Duration) -> Result<(), String> {
    let mut command = tokio::process::Command::new(path);
    command.arg(hook).arg(cookie);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => {
            let exit_code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                Err(format!("exit {exit_code}"))
            } else {
                Err(format!("exit {exit_code}: {stderr}"))
            }
        }
        Ok(Err(err)) => Err(format!("spawn error: {err}")),
        Err(_) => Err("timed out".to_string()),
    }
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
