// SPDX-License-Identifier: MIT

//! Loading testsuites/testplans off disk and turning a [`Testplan`] job
//! layout into a concrete, runnable job spec.
//!
//! `igor-core` defines the shapes; `igor-adapters` defines how to look
//! things up by name across origins. This crate is the glue: a filesystem
//! [`Origin`] implementation for testsuites and testplans, the archive
//! format testsuites ship to guests in, and the per-layout resolution step
//! `PlanWorker` pulls lazily, one job at a time.

mod archive;
mod error;
mod filesystem;
mod jobspec;
mod overrides;

pub use archive::build_testsuite_archive;
pub use error::CatalogError;
pub use filesystem::FilesystemOrigin;
pub use jobspec::{resolve_job_spec, JobSpec};
pub use overrides::SettableProperties;
