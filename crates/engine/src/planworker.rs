// SPDX-License-Identifier: MIT

//! `PlanWorker`: one background task per running test plan,
//! submitting and running each of its job layouts strictly in sequence so
//! that a later layout can observe state an earlier job's providers left
//! behind.
//!
//! `Testplan.job_specs()`'s "generator" laziness is kept by resolving one
//! `JobLayout` at a time inside the loop body (`igor_catalog::resolve_job_spec`)
//! rather than resolving the whole plan up front — pull-on-demand, avoiding
//! an extra channel/task per plan.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use igor_adapters::Inventory;
use igor_core::{Clock, Testplan};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::jobcenter::JobCenter;

/// A point-in-time view of a plan's progress, returned by `status_plan` both
/// while the plan is still running and after it has finished.
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    pub name: String,
    pub passed: bool,
    pub finished: bool,
    pub job_cookies: Vec<String>,
}

pub struct PlanWorker<C: Clock> {
    name: String,
    plan: Testplan,
    planid: String,
    inventory: Arc<Inventory>,
    center: Arc<JobCenter<C>>,
    stop_requested: AtomicBool,
    current_cookie: Mutex<Option<String>>,
    job_cookies: Mutex<Vec<String>>,
}

impl<C: Clock> PlanWorker<C> {
    pub(crate) fn spawn(name: String, plan: Testplan, planid: String, inventory: Arc<Inventory>, center: Arc<JobCenter<C>>) -> Arc<Self> {
        let worker = Arc::new(Self {
            name,
            plan,
            planid,
            inventory,
            center,
            stop_requested: AtomicBool::new(false),
            current_cookie: Mutex::new(None),
            job_cookies: Mutex::new(Vec::new()),
        });

        let task_handle = Arc::clone(&worker);
        tokio::spawn(async move {
            task_handle.run().await;
        });

        worker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            name: self.name.clone(),
            passed: false,
            finished: false,
            job_cookies: self.job_cookies.lock().clone(),
        }
    }

    pub async fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        let cookie = self.current_cookie.lock().clone();
        if let Some(cookie) = cookie {
            if let Err(err) = self.center.abort_job(&cookie).await {
                warn!(plan = %self.name, cookie, %err, "failed to abort current job while stopping plan");
            }
        }
    }

    async fn run(self: Arc<Self>) {
        let mut all_passed = true;

        for layout in &self.plan.job_layouts {
            if self.stop_requested.load(Ordering::SeqCst) {
                all_passed = false;
                break;
            }

            let spec = match igor_catalog::resolve_job_spec(&self.plan, layout, &self.planid, self.inventory.as_ref()).await {
                Ok(spec) => spec,
                Err(err) => {
                    warn!(plan = %self.name, %err, "failed to resolve job layout");
                    all_passed = false;
                    break;
                }
            };

            let (cookie, job) = match self.center.submit(spec, None) {
                Ok(result) => result,
                Err(err) => {
                    warn!(plan = %self.name, %err, "failed to submit plan job");
                    all_passed = false;
                    break;
                }
            };
            self.job_cookies.lock().push(cookie.clone());
            *self.current_cookie.lock() = Some(cookie.clone());

            if let Err(err) = self.center.start_job(&cookie) {
                warn!(plan = %self.name, cookie, %err, "failed to enqueue plan job");
                all_passed = false;
                break;
            }

            job.wait().await;
            *self.current_cookie.lock() = None;

            if job.state() != igor_core::JobState::Passed {
                all_passed = false;
            }
            if self.stop_requested.load(Ordering::SeqCst) {
                break;
            }
        }

        let snapshot = PlanSnapshot {
            name: self.name.clone(),
            passed: all_passed,
            finished: true,
            job_cookies: self.job_cookies.lock().clone(),
        };
        info!(plan = %self.name, passed = all_passed, "plan finished");
        self.center.finish_plan(&self.name, snapshot);
    }
}

#[cfg(test)]
#[path = "planworker_tests.rs"]
mod tests;
