// SPDX-License-Identifier: MIT

//! Resolving one [`JobLayout`] into a concrete, runnable job spec.
//!
//! Each layout is only resolved once the previous job has finished, so a
//! later layout can observe state a provider created as a side effect of
//! an earlier one. Laziness is kept by exposing per-layout resolution
//! here rather than resolving a whole plan up front; `igor-engine`'s
//! `PlanWorker` calls this once per layout, in order.

use std::sync::Arc;

use igor_adapters::{Host, Inventory, Profile};
use igor_core::{JobLayout, Testplan, Testsuite};

use crate::error::CatalogError;
use crate::overrides::{apply_overrides, drop_overrides};

/// A layout entry after `{var}` substitution, origin lookup, and override
/// application — everything `igor-engine` needs to submit and run a job.
#[derive(Clone)]
pub struct JobSpec {
    pub testsuite: Testsuite,
    pub profile: Arc<dyn Profile>,
    pub host: Arc<dyn Host>,
    pub additional_kargs: String,
}

pub async fn resolve_job_spec(testplan: &Testplan, layout: &JobLayout, planid: &str, inventory: &Inventory) -> Result<JobSpec, CatalogError> {
    let names = testplan.substitute_layout(layout, planid)?;

    let mut testsuite = inventory
        .testsuites
        .lookup(names.testsuite.name())
        .await?
        .ok_or_else(|| CatalogError::NotFound {
            category: "testsuite",
            name: names.testsuite.name().to_string(),
        })?;
    apply_overrides("testsuite", &mut testsuite, &names.testsuite.overrides());

    let profile = inventory.profiles.lookup(names.profile.name()).await?.ok_or_else(|| CatalogError::NotFound {
        category: "profile",
        name: names.profile.name().to_string(),
    })?;
    drop_overrides("profile", &names.profile.overrides());

    let host = inventory.hosts.lookup(names.host.name()).await?.ok_or_else(|| CatalogError::NotFound {
        category: "host",
        name: names.host.name().to_string(),
    })?;
    drop_overrides("host", &names.host.overrides());

    let additional_kargs = match &names.additional_kargs {
        Some(kargs) => {
            drop_overrides("additional_kargs", &kargs.overrides());
            kargs.name().to_string()
        }
        None => String::new(),
    };

    Ok(JobSpec {
        testsuite,
        profile,
        host,
        additional_kargs,
    })
}

#[cfg(test)]
#[path = "jobspec_tests.rs"]
mod tests;
