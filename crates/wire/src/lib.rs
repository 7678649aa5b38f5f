// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! igor-wire: snapshot DTOs and JSON/XML/YAML rendering for the HTTP
//! control surface.

mod error;
mod format;
mod report;
mod render;
mod snapshot;
mod xml;

pub use error::WireError;
pub use format::Format;
pub use render::render;
pub use report::{job_report_junit, job_report_rst, plan_report_junit, plan_report_rst};
pub use snapshot::{
    JobListEntry, JobSnapshot, JobsListView, NamedEntry, PlanSnapshotView, StateHistoryEntryView, StepResultView,
    TestplanListEntry, TestsuiteListEntry, ValidationReport,
};
pub use xml::{to_xml_string, xml_to_value, STYLESHEET_HREF};
