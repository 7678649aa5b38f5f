// SPDX-License-Identifier: MIT

//! Daemon-wide shared state: the `JobCenter`, the `Inventory`, and the
//! catalog root archives are built relative to.
//!
//! `igor-wire` stays independent of `igor-engine` (see its own grounding
//! notes); this module is where the two meet — handlers read a live
//! `Job`'s accessors and hand them to `igor_wire::JobSnapshot::new`.

use std::path::PathBuf;
use std::sync::Arc;

use igor_adapters::Inventory;
use igor_core::SystemClock;
use igor_engine::{HookRunner, JobCenter};

#[derive(Clone)]
pub struct AppState {
    pub center: Arc<JobCenter<SystemClock>>,
    pub inventory: Arc<Inventory>,
    pub catalog_root: PathBuf,
    pub auth_token: Option<String>,
}

impl AppState {
    pub fn new(center: Arc<JobCenter<SystemClock>>, inventory: Arc<Inventory>, catalog_root: PathBuf, auth_token: Option<String>) -> Self {
        Self {
            center,
            inventory,
            catalog_root,
            auth_token,
        }
    }
}

pub fn new_hook_runner(hook_dir: Option<PathBuf>) -> (Arc<HookRunner>, igor_engine::EventPublisher) {
    let events = igor_engine::EventPublisher::new();
    let runner = Arc::new(HookRunner::new(hook_dir, events.clone()));
    (runner, events)
}
