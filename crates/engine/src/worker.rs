// SPDX-License-Identifier: MIT

//! The background `JobWorker`: one cooperative polling loop
//! per `JobCenter`, responsible for claiming pending jobs onto free hosts,
//! ending jobs that have reached a terminal state, and garbage-collecting
//! ended jobs once the daemon's configured retention window has passed.

use std::sync::Arc;

use igor_adapters::HostKey;
use igor_core::Clock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::job::Job;
use crate::jobcenter::JobCenter;

pub struct JobWorker<C: Clock> {
    center: Arc<JobCenter<C>>,
}

impl<C: Clock> JobWorker<C> {
    pub fn new(center: Arc<JobCenter<C>>) -> Self {
        Self { center }
    }

    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.center.config().worker_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("job worker shutting down");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    async fn tick(&self) {
        self.claim_pending().await;
        self.end_terminal_jobs().await;
        self.collect_garbage().await;
    }

    /// Claim a free host for each pending cookie, in FIFO order. A cookie
    /// whose host is still in use is left queued for the next tick.
    pub(crate) async fn claim_pending(&self) {
        let candidates: Vec<String> = {
            let state = self.center.state.lock();
            state.pending.iter().cloned().collect()
        };

        for cookie in candidates {
            let Ok(job) = self.center.get_job(&cookie) else {
                let mut state = self.center.state.lock();
                state.pending.retain(|c| c != &cookie);
                continue;
            };
            let host_key = HostKey::new(job.host_name());

            let claimed = {
                let mut state = self.center.state.lock();
                if state.hosts_in_use.contains(&host_key) {
                    false
                } else {
                    state.hosts_in_use.insert(host_key.clone());
                    state.pending.retain(|c| c != &cookie);
                    true
                }
            };
            if !claimed {
                continue;
            }

            self.center.hooks().run_hook("pre-job", &cookie).await;
            if let Err(err) = job.setup().await {
                warn!(cookie, %err, "job setup failed");
            } else if let Err(err) = job.start().await {
                warn!(cookie, %err, "job start failed");
            }
        }
    }

    pub(crate) async fn end_terminal_jobs(&self) {
        let terminal: Vec<(String, Arc<Job<C>>)> = {
            let state = self.center.state.lock();
            state
                .jobs
                .iter()
                .filter(|(_, job)| job.is_endstate() && !job.has_ended())
                .map(|(cookie, job)| (cookie.clone(), Arc::clone(job)))
                .collect()
        };

        for (cookie, job) in terminal {
            self.center.hooks().run_hook("post-job", &cookie).await;
            if let Err(err) = job.end().await {
                warn!(cookie, %err, "job end failed");
                continue;
            }
            let host_key = HostKey::new(job.host_name());
            let mut state = self.center.state.lock();
            state.hosts_in_use.remove(&host_key);
            if !state.closed_jobs.contains(&cookie) {
                state.closed_jobs.push(cookie.clone());
            }
            state.ended_gc.push_back(cookie);
        }
    }

    /// While the ended-GC FIFO is over budget, clean the oldest entry old
    /// enough to qualify. A `None` `ended_at` can only mean the job hasn't
    /// actually ended yet despite being queued here — treat that as "not
    /// eligible for GC" rather than computing a bogus age, and stop (FIFO
    /// order means every later entry is at least as young).
    pub(crate) async fn collect_garbage(&self) {
        loop {
            let over_budget = {
                let state = self.center.state.lock();
                state.ended_gc.len() > self.center.config().max_cleaned_jobs
            };
            if !over_budget {
                return;
            }

            let cookie = {
                let state = self.center.state.lock();
                state.ended_gc.front().cloned()
            };
            let Some(cookie) = cookie else { return };

            let Ok(job) = self.center.get_job(&cookie) else {
                let mut state = self.center.state.lock();
                state.ended_gc.pop_front();
                continue;
            };

            let Some(ended_at) = job.ended_at() else {
                break;
            };

            let now = self.center.clock.epoch_ms();
            let age_ms = now.saturating_sub(ended_at);
            if age_ms < self.center.config().cleanup_age.as_millis() as u64 {
                break;
            }

            {
                let mut state = self.center.state.lock();
                state.ended_gc.pop_front();
            }
            if let Err(err) = job.clean().await {
                warn!(cookie, %err, "job cleanup failed");
            }
            let mut state = self.center.state.lock();
            state.jobs.remove(&cookie);
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
