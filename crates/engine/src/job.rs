// SPDX-License-Identifier: MIT

//! The Job state machine.
//!
//! `open → preparing → prepared → running → {passed, failed, aborted,
//! timedout}`. The five compound transitions (`setup`, `start`,
//! `finish_step`, `end`, `clean`) and the watchdog's transition to
//! `timedout` serialize on `high_lock`; state reads/writes serialize inside
//! [`StateHistory`] itself. `high_lock` is a plain `tokio::sync::Mutex`, held
//! across the provider calls each transition makes — reentrancy for
//! `abort()` (which is `finish_step` under the hood) is structural: the
//! public methods lock once and call a `_locked` counterpart that assumes
//! the lock is already held, rather than
//! a true recursive mutex (which cannot soundly be held across `.await`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use igor_adapters::{Host, Profile};
use igor_catalog::JobSpec;
use igor_core::state::{State, StateHistory, StateHistoryEntry};
use igor_core::{Clock, JobState, StepRecord, StepRecordBuilder, Testcase, Testsuite};
use igor_storage::TestSession;
use parking_lot::Mutex;
use tracing::warn;

use crate::error::EngineError;
use crate::hooks::HookRunner;

pub const DEFAULT_WATCHDOG_INTERVAL: Duration = Duration::from_secs(10);

struct JobInner {
    current_step: usize,
    results: Vec<StepRecord>,
    last_event_at: u64,
    ended_at: Option<u64>,
}

/// One test run: a testsuite bound to a host and a profile, stepping through
/// its flattened testcases one at a time.
pub struct Job<C: Clock> {
    cookie: String,
    testsuite: Testsuite,
    flattened: Vec<Testcase>,
    profile: Arc<dyn Profile>,
    host: Arc<dyn Host>,
    additional_kargs: String,
    session: TestSession,
    clock: C,
    hooks: Arc<HookRunner>,
    created_at: u64,
    watchdog_interval: Duration,
    high_lock: tokio::sync::Mutex<()>,
    state_history: StateHistory,
    inner: Mutex<JobInner>,
    watchdog_running: AtomicBool,
}

impl<C: Clock> Job<C> {
    pub fn new(cookie: impl Into<String>, spec: JobSpec, session: TestSession, hooks: Arc<HookRunner>, clock: C) -> Arc<Self> {
        Self::with_watchdog_interval(cookie, spec, session, hooks, clock, DEFAULT_WATCHDOG_INTERVAL)
    }

    pub fn with_watchdog_interval(
        cookie: impl Into<String>,
        spec: JobSpec,
        session: TestSession,
        hooks: Arc<HookRunner>,
        clock: C,
        watchdog_interval: Duration,
    ) -> Arc<Self> {
        let cookie = cookie.into();
        let created_at = clock.epoch_ms();
        let state_history = StateHistory::new(JobState::Open.as_state(), &clock);
        let flattened = spec.testsuite.flatten();

        Arc::new(Self {
            cookie,
            testsuite: spec.testsuite,
            flattened,
            profile: spec.profile,
            host: spec.host,
            additional_kargs: spec.additional_kargs,
            session,
            clock,
            hooks,
            created_at,
            watchdog_interval,
            high_lock: tokio::sync::Mutex::new(()),
            state_history,
            inner: Mutex::new(JobInner {
                current_step: 0,
                results: Vec::new(),
                last_event_at: created_at,
                ended_at: None,
            }),
            watchdog_running: AtomicBool::new(false),
        })
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn testsuite(&self) -> &Testsuite {
        &self.testsuite
    }

    pub fn profile_name(&self) -> &str {
        self.profile.get_name()
    }

    pub fn host_name(&self) -> &str {
        self.host.get_name()
    }

    pub fn additional_kargs(&self) -> &str {
        &self.additional_kargs
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn state(&self) -> JobState {
        JobState::from_state(self.state_history.current()).unwrap_or(JobState::Open)
    }

    pub fn is_endstate(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn history(&self) -> Vec<StateHistoryEntry> {
        self.state_history.snapshot()
    }

    pub fn current_step(&self) -> usize {
        self.inner.lock().current_step
    }

    pub fn results(&self) -> Vec<StepRecord> {
        self.inner.lock().results.clone()
    }

    pub fn note_for_step(&self, n: usize) -> Option<String> {
        self.inner.lock().results.get(n).and_then(|r| r.note.clone())
    }

    pub fn has_ended(&self) -> bool {
        self.inner.lock().ended_at.is_some()
    }

    pub fn ended_at(&self) -> Option<u64> {
        self.inner.lock().ended_at
    }

    /// Total configured timeout of the whole testsuite, in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.testsuite.timeout() * 1000
    }

    /// The time budget allowed up to the current testcase: the sum of
    /// `timeout_seconds` over testcases `0..=current_step`. Zero for an
    /// empty suite.
    pub fn allowed_time_ms(&self) -> u64 {
        if self.flattened.is_empty() {
            return 0;
        }
        let current_step = self.inner.lock().current_step;
        let upto = current_step.min(self.flattened.len() - 1);
        self.flattened[..=upto].iter().map(Testcase::timeout_seconds).sum::<u64>() * 1000
    }

    /// Time since the job started running, or since it finished running if
    /// it has already reached an endstate. Zero if it never started.
    pub fn runtime_ms(&self) -> u64 {
        let history = self.history();
        let Some(started) = history.iter().find(|e| e.state.name() == "running").map(|e| e.created_at) else {
            return 0;
        };
        let current = self.state_history.current();
        let end = if current.name() == "running" {
            self.clock.epoch_ms()
        } else {
            history.iter().find(|e| e.state == current).map(|e| e.created_at).unwrap_or(started)
        };
        end.saturating_sub(started)
    }

    pub fn is_timedout(&self) -> bool {
        self.runtime_ms() > self.allowed_time_ms()
    }

    pub fn result(&self) -> &'static str {
        match self.state() {
            JobState::Passed => "passed",
            JobState::Failed => "failed",
            JobState::Aborted => "aborted",
            JobState::Timedout => "timedout",
            JobState::Running => "(no result, running)",
            JobState::Open | JobState::Preparing | JobState::Prepared => "(no result)",
        }
    }

    pub async fn wait(&self) {
        loop {
            if self.state().is_terminal() {
                return;
            }
            self.state_history.wait_for_change().await;
        }
    }

    pub fn add_artifact_to_current_step(&self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        let step = self.current_step();
        self.session.add_artifact(&step_artifact_name(step, name), data)?;
        Ok(())
    }

    pub fn get_artifact(&self, name: &str) -> Result<Vec<u8>, EngineError> {
        Ok(self.session.get_artifact(name)?)
    }

    pub fn list_artifacts(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.session.artifact_names()?)
    }

    pub fn get_artifacts_archive(&self) -> Result<Vec<u8>, EngineError> {
        Ok(self.session.get_artifacts_archive(None)?)
    }

    /// `GET /jobs/<cookie>/set/enable_pxe/<bool>`: toggle PXE
    /// boot for this job's host through its profile.
    pub async fn enable_pxe(&self, enable: bool) -> Result<(), EngineError> {
        self.profile.enable_pxe(self.host.as_ref(), enable).await?;
        Ok(())
    }

    /// `GET /jobs/<cookie>/set/kernelargs/<args>`: rewrite the
    /// additional kernel args this job's host boots with. Reassigning
    /// through the same `assign_to` path `setup()` uses keeps there being a
    /// single place that knows how a profile attaches kargs to a host.
    pub async fn set_kernelargs(&self, kargs: &str) -> Result<(), EngineError> {
        self.profile.assign_to(self.host.as_ref(), kargs).await?;
        Ok(())
    }

    pub async fn setup(&self) -> Result<(), EngineError> {
        let _guard = self.high_lock.lock().await;
        self.setup_locked().await
    }

    async fn setup_locked(&self) -> Result<(), EngineError> {
        self.require_state(JobState::Open)?;
        self.push_state(JobState::Preparing);
        self.host.prepare().await?;
        let kargs = self.kargs_with_callback();
        self.profile.assign_to(self.host.as_ref(), &kargs).await?;
        self.push_state(JobState::Prepared);
        self.hooks.run_hook("post-setup", &self.cookie).await;
        Ok(())
    }

    pub async fn start(self: &Arc<Self>) -> Result<(), EngineError> {
        let _guard = self.high_lock.lock().await;
        self.require_state(JobState::Prepared)?;
        self.push_state(JobState::Running);
        self.host.start().await?;
        self.hooks.run_hook("post-start", &self.cookie).await;
        self.spawn_watchdog();
        Ok(())
    }

    pub async fn finish_step(
        &self,
        n: usize,
        is_success: bool,
        note: Option<String>,
        is_abort: bool,
        is_skipped: bool,
    ) -> Result<usize, EngineError> {
        let _guard = self.high_lock.lock().await;
        self.finish_step_locked(n, is_success, note, is_abort, is_skipped).await
    }

    async fn finish_step_locked(
        &self,
        n: usize,
        is_success: bool,
        note: Option<String>,
        is_abort: bool,
        is_skipped: bool,
    ) -> Result<usize, EngineError> {
        self.require_state(JobState::Running)?;
        let current_step = self.current_step();
        if n != current_step {
            return Err(EngineError::precondition(format!("expected step {current_step}, got {n}")));
        }
        let testcase = self
            .flattened
            .get(n)
            .cloned()
            .ok_or_else(|| EngineError::precondition(format!("no such step {n}")))?;

        let now = self.clock.epoch_ms();
        let runtime_ms = {
            let inner = self.inner.lock();
            now.saturating_sub(inner.last_event_at)
        };

        let log = if is_success {
            None
        } else {
            self.session.get_artifact(&step_artifact_name(n, "log")).ok().map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        };
        let annotations = self
            .session
            .get_artifact(&step_artifact_name(n, "annotations.yaml"))
            .ok()
            .and_then(|bytes| serde_yml::from_slice::<Vec<String>>(&bytes).ok())
            .unwrap_or_default();

        let mut builder = StepRecordBuilder::new(now, testcase.clone(), is_success)
            .is_abort(is_abort)
            .is_skipped(is_skipped)
            .runtime_ms(runtime_ms)
            .annotations(annotations);
        if let Some(note) = note {
            builder = builder.note(note);
        }
        if let Some(log) = log {
            builder = builder.log(log);
        }
        let record = builder.build();

        let (completed, all_passed) = {
            let mut inner = self.inner.lock();
            inner.results.push(record);
            inner.last_event_at = now;
            (inner.results.len() == self.flattened.len(), inner.results.iter().all(|r| r.is_passed))
        };

        if is_abort {
            self.push_state(JobState::Aborted);
        } else if !is_success && !testcase.expect_failure {
            self.push_state(JobState::Failed);
        } else if completed && all_passed {
            self.push_state(JobState::Passed);
        }

        self.hooks.run_hook("post-testcase", &self.cookie).await;

        let next_step = {
            let mut inner = self.inner.lock();
            inner.current_step += 1;
            inner.current_step
        };
        Ok(next_step)
    }

    pub async fn abort(&self) -> Result<(), EngineError> {
        let _guard = self.high_lock.lock().await;
        self.require_state(JobState::Running)?;
        let current_step = self.current_step();
        self.finish_step_locked(current_step, false, Some("aborted".to_string()), true, false).await?;
        Ok(())
    }

    pub async fn annotate(&self, note: String) -> Result<(), EngineError> {
        let step = self.current_step();
        let name = step_artifact_name(step, "annotations.yaml");
        let mut notes = self
            .session
            .get_artifact(&name)
            .ok()
            .and_then(|bytes| serde_yml::from_slice::<Vec<String>>(&bytes).ok())
            .unwrap_or_default();
        notes.push(note);
        let encoded = serde_yml::to_string(&notes).map_err(|err| EngineError::precondition(err.to_string()))?;
        self.session.add_artifact(&name, encoded.as_bytes())?;
        self.hooks.run_hook("post-annotate", &self.cookie).await;
        Ok(())
    }

    pub async fn end(&self) -> Result<(), EngineError> {
        let _guard = self.high_lock.lock().await;
        self.end_locked().await
    }

    async fn end_locked(&self) -> Result<(), EngineError> {
        let current = self.state();
        if current != JobState::Running && !current.is_terminal() {
            return Err(EngineError::precondition(format!("job not ready to end: {current}")));
        }
        if let Err(err) = self.host.purge().await {
            warn!(cookie = %self.cookie, %err, "host purge failed during end()");
        }
        if let Err(err) = self.profile.revoke_from(self.host.as_ref()).await {
            warn!(cookie = %self.cookie, %err, "profile revoke failed during end()");
        }
        {
            let mut inner = self.inner.lock();
            inner.ended_at = Some(self.clock.epoch_ms());
        }
        self.hooks.run_hook("post-end", &self.cookie).await;
        Ok(())
    }

    pub async fn clean(&self) -> Result<(), EngineError> {
        let _guard = self.high_lock.lock().await;
        if self.inner.lock().ended_at.is_none() {
            return Err(EngineError::precondition("job has not ended yet"));
        }
        if let Err(err) = self.session.remove() {
            warn!(cookie = %self.cookie, %err, "session cleanup failed");
        }
        Ok(())
    }

    fn require_state(&self, expected: JobState) -> Result<(), EngineError> {
        let current = self.state();
        if current != expected {
            Err(EngineError::precondition(format!("expected state {expected}, got {current}")))
        } else {
            Ok(())
        }
    }

    fn push_state(&self, state: JobState) {
        self.state_history.push(state.as_state(), &self.clock);
    }

    fn kargs_with_callback(&self) -> String {
        if self.additional_kargs.is_empty() {
            format!("igor_cookie={}", self.cookie)
        } else {
            format!("{} igor_cookie={}", self.additional_kargs, self.cookie)
        }
    }

    fn spawn_watchdog(self: &Arc<Self>) {
        if self.watchdog_running.swap(true, Ordering::SeqCst) {
            return;
        }
        let job = Arc::clone(self);
        tokio::spawn(async move {
            job.watchdog_loop().await;
        });
    }

    async fn watchdog_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.watchdog_interval);
        ticker.tick().await; // interval's first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            if self.state().is_terminal() {
                break;
            }
            if self.is_timedout() {
                let _guard = self.high_lock.lock().await;
                if !self.state().is_terminal() {
                    self.push_state(JobState::Timedout);
                    warn!(cookie = %self.cookie, "watchdog timed out job");
                }
                break;
            }
        }
        self.watchdog_running.store(false, Ordering::SeqCst);
    }
}

fn step_artifact_name(step: usize, suffix: &str) -> String {
    format!("{step}-{suffix}")
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
