// SPDX-License-Identifier: MIT

//! `JobCenter`: the single authoritative in-memory map of
//! jobs, pending/GC FIFOs, the host-in-use set, and running plans.
//!
//! Every collection here lives behind one `parking_lot::Mutex`
//! (`jobcenter_lock`, acquired outermost in the fixed order
//! `jobcenter_lock → high_state_change_lock → state_change_lock`). The lock
//! is never held across an `.await`: callers snapshot what they need,
//! release, do the async Job work, then briefly re-acquire to update the
//! collections.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use igor_adapters::HostKey;
use igor_catalog::JobSpec;
use igor_core::{Clock, CookieMinter};
use igor_storage::TestSession;
use parking_lot::Mutex;

use crate::error::EngineError;
use crate::hooks::HookRunner;
use crate::job::Job;
use crate::planworker::PlanSnapshot;

pub struct JobCenterConfig {
    pub session_root: PathBuf,
    pub max_cleaned_jobs: usize,
    pub cleanup_age: Duration,
    pub worker_interval: Duration,
    pub watchdog_interval: Duration,
}

impl JobCenterConfig {
    pub fn new(session_root: impl Into<PathBuf>) -> Self {
        Self {
            session_root: session_root.into(),
            max_cleaned_jobs: 10,
            cleanup_age: Duration::from_secs(5 * 60),
            worker_interval: Duration::from_secs(10),
            watchdog_interval: Duration::from_secs(10),
        }
    }
}

pub(crate) struct JobCenterState<C: Clock> {
    pub(crate) jobs: BTreeMap<String, Arc<Job<C>>>,
    pub(crate) closed_jobs: Vec<String>,
    pub(crate) pending: VecDeque<String>,
    pub(crate) ended_gc: VecDeque<String>,
    pub(crate) hosts_in_use: HashSet<HostKey>,
    pub(crate) running_plans: BTreeMap<String, Arc<crate::planworker::PlanWorker<C>>>,
    pub(crate) plan_results: BTreeMap<String, PlanSnapshot>,
}

impl<C: Clock> JobCenterState<C> {
    fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
            closed_jobs: Vec::new(),
            pending: VecDeque::new(),
            ended_gc: VecDeque::new(),
            hosts_in_use: HashSet::new(),
            running_plans: BTreeMap::new(),
            plan_results: BTreeMap::new(),
        }
    }
}

/// Owns every Job and plan the daemon currently knows about.
pub struct JobCenter<C: Clock> {
    pub(crate) clock: C,
    pub(crate) cookie_minter: CookieMinter,
    pub(crate) hooks: Arc<HookRunner>,
    pub(crate) config: JobCenterConfig,
    pub(crate) state: Mutex<JobCenterState<C>>,
}

impl<C: Clock> JobCenter<C> {
    pub fn new(clock: C, hooks: Arc<HookRunner>, config: JobCenterConfig) -> Arc<Self> {
        Arc::new(Self {
            clock,
            cookie_minter: CookieMinter::new(),
            hooks,
            config,
            state: Mutex::new(JobCenterState::new()),
        })
    }

    pub fn hooks(&self) -> &Arc<HookRunner> {
        &self.hooks
    }

    pub fn config(&self) -> &JobCenterConfig {
        &self.config
    }

    /// Mint a cookie, build a session + Job, and store it. Does not start it.
    pub fn submit(&self, spec: JobSpec, preferred_cookie: Option<String>) -> Result<(String, Arc<Job<C>>), EngineError> {
        // Mint/validate the cookie under the lock, but release it before the
        // blocking session-directory creation below — the lock must never
        // be held across I/O.
        let cookie = {
            let state = self.state.lock();
            match preferred_cookie {
                Some(cookie) => {
                    if state.jobs.contains_key(&cookie) {
                        return Err(EngineError::precondition(format!("cookie '{cookie}' already in use")));
                    }
                    cookie
                }
                None => self.cookie_minter.mint(&self.clock, |candidate| state.jobs.contains_key(candidate))?,
            }
        };

        let session = TestSession::new(cookie.clone(), &self.config.session_root)?;
        let job = Job::with_watchdog_interval(cookie.clone(), spec, session, Arc::clone(&self.hooks), self.clock.clone(), self.config.watchdog_interval);
        self.state.lock().jobs.insert(cookie.clone(), Arc::clone(&job));
        Ok((cookie, job))
    }

    fn get(&self, cookie: &str) -> Result<Arc<Job<C>>, EngineError> {
        self.state
            .lock()
            .jobs
            .get(cookie)
            .cloned()
            .ok_or_else(|| EngineError::not_found("job", cookie))
    }

    pub fn get_job(&self, cookie: &str) -> Result<Arc<Job<C>>, EngineError> {
        self.get(cookie)
    }

    pub fn list_jobs(&self) -> Vec<Arc<Job<C>>> {
        self.state.lock().jobs.values().cloned().collect()
    }

    pub fn list_closed(&self, limit: Option<usize>) -> Vec<String> {
        let state = self.state.lock();
        match limit {
            Some(limit) => state.closed_jobs.iter().rev().take(limit).cloned().collect(),
            None => state.closed_jobs.clone(),
        }
    }

    /// Queue a job for the background worker to pick up and start.
    pub fn start_job(&self, cookie: &str) -> Result<(), EngineError> {
        self.get(cookie)?;
        let mut state = self.state.lock();
        if !state.pending.contains(&cookie.to_string()) {
            state.pending.push_back(cookie.to_string());
        }
        Ok(())
    }

    pub async fn finish_test_step(&self, cookie: &str, n: usize, is_success: bool, note: Option<String>) -> Result<usize, EngineError> {
        let job = self.get(cookie)?;
        job.finish_step(n, is_success, note, false, false).await
    }

    pub async fn skip_step(&self, cookie: &str, n: usize) -> Result<usize, EngineError> {
        let job = self.get(cookie)?;
        job.finish_step(n, true, Some("skipped".to_string()), false, true).await
    }

    pub fn test_step_result(&self, cookie: &str, n: usize) -> Result<igor_core::StepRecord, EngineError> {
        let job = self.get(cookie)?;
        job.results().get(n).cloned().ok_or_else(|| EngineError::not_found("step", n.to_string()))
    }

    pub async fn abort_job(&self, cookie: &str) -> Result<(), EngineError> {
        let job = self.get(cookie)?;
        job.abort().await
    }

    pub async fn annotate_current_step(&self, cookie: &str, note: String) -> Result<(), EngineError> {
        let job = self.get(cookie)?;
        job.annotate(note).await
    }

    pub async fn enable_pxe(&self, cookie: &str, enable: bool) -> Result<(), EngineError> {
        let job = self.get(cookie)?;
        job.enable_pxe(enable).await
    }

    pub async fn set_kernelargs(&self, cookie: &str, kargs: &str) -> Result<(), EngineError> {
        let job = self.get(cookie)?;
        job.set_kernelargs(kargs).await
    }

    /// Start a plan worker running, unless one with this name is already up.
    pub fn submit_plan(
        self: &Arc<Self>,
        name: String,
        plan: igor_core::Testplan,
        planid: String,
        inventory: Arc<igor_adapters::Inventory>,
    ) -> Result<Arc<crate::planworker::PlanWorker<C>>, EngineError> {
        let mut state = self.state.lock();
        if state.running_plans.contains_key(&name) {
            return Err(EngineError::precondition(format!("plan '{name}' is already running")));
        }
        let worker = crate::planworker::PlanWorker::spawn(name.clone(), plan, planid, inventory, Arc::clone(self));
        state.running_plans.insert(name, Arc::clone(&worker));
        Ok(worker)
    }

    pub fn status_plan(&self, name: &str) -> Result<PlanSnapshot, EngineError> {
        let state = self.state.lock();
        if let Some(worker) = state.running_plans.get(name) {
            return Ok(worker.snapshot());
        }
        state.plan_results.get(name).cloned().ok_or_else(|| EngineError::not_found("plan", name))
    }

    pub async fn abort_plan(&self, name: &str) -> Result<(), EngineError> {
        let worker = {
            let state = self.state.lock();
            state.running_plans.get(name).cloned()
        };
        match worker {
            Some(worker) => {
                worker.stop().await;
                Ok(())
            }
            None => Err(EngineError::not_found("plan", name)),
        }
    }

    /// Called by a `PlanWorker` once it has finished running, to move its
    /// snapshot from `running_plans` into `plan_results`.
    pub(crate) fn finish_plan(&self, name: &str, snapshot: PlanSnapshot) {
        let mut state = self.state.lock();
        state.running_plans.remove(name);
        state.plan_results.insert(name.to_string(), snapshot);
    }
}

#[cfg(test)]
#[path = "jobcenter_tests.rs"]
mod tests;
