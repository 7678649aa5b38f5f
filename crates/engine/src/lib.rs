// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! igor-engine: the Job state machine, JobCenter, PlanWorker, and the
//! background workers that drive them.

mod error;
mod events;
mod hooks;
mod job;
mod jobcenter;
mod planworker;
mod worker;

pub use error::EngineError;
pub use events::EventPublisher;
pub use hooks::{HookRunner, HOOK_NAMES};
pub use job::Job;
pub use jobcenter::{JobCenter, JobCenterConfig};
pub use planworker::{PlanSnapshot, PlanWorker};
pub use worker::JobWorker;
