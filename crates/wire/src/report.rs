// SPDX-License-Identifier: MIT

//! Minimal built-in report rendering for `/jobs/<cookie>/report[/junit]` and
//! `/testplans/<name>/report[/junit]`.
//!
//! Rendered directly from the typed snapshot rather than through an
//! external stylesheet transform, preserving the textual shape of each
//! format (RST section + table, JUnit `<testsuite>`) without shipping or
//! maintaining arbitrary XSLT.

use std::fmt::Write as _;

use crate::snapshot::JobSnapshot;

/// Plain-text RST report for a single job.
pub fn job_report_rst(job: &JobSnapshot) -> String {
    let mut out = String::new();
    let title = format!("Job {}", job.cookie);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    let _ = writeln!(out);
    let _ = writeln!(out, ":profile: {}", job.profile);
    let _ = writeln!(out, ":host: {}", job.host);
    let _ = writeln!(out, ":state: {}", job.state);
    let _ = writeln!(out, ":runtime_ms: {}", job.runtime_ms);
    let _ = writeln!(out);
    let _ = writeln!(out, "Steps");
    let _ = writeln!(out, "-----");
    let _ = writeln!(out);
    for (n, result) in job.results.iter().enumerate() {
        let label = step_label(result.is_passed, result.is_skipped, result.is_abort);
        let _ = writeln!(out, "{n}. {} [{label}] ({} ms)", result.testcase, result.runtime_ms);
        if let Some(note) = &result.note {
            let _ = writeln!(out, "   note: {note}");
        }
    }
    out
}

/// JUnit XML report for a single job, one `<testcase>` per step.
pub fn job_report_junit(job: &JobSnapshot) -> String {
    let failures = job.results.iter().filter(|r| !r.is_passed).count();
    let mut out = String::new();
    let _ = writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    let _ = writeln!(
        out,
        "<testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"{:.3}\">",
        xml_escape(&job.cookie),
        job.results.len(),
        failures,
        job.runtime_ms as f64 / 1000.0,
    );
    for result in &job.results {
        let time = result.runtime_ms as f64 / 1000.0;
        if result.is_passed {
            let _ = writeln!(out, "  <testcase name=\"{}\" time=\"{time:.3}\"/>", xml_escape(&result.testcase));
        } else if result.is_skipped {
            let _ = writeln!(out, "  <testcase name=\"{}\" time=\"{time:.3}\"><skipped/></testcase>", xml_escape(&result.testcase));
        } else {
            let message = result.note.clone().unwrap_or_else(|| "test failed".to_string());
            let _ = writeln!(
                out,
                "  <testcase name=\"{}\" time=\"{time:.3}\"><failure message=\"{}\"/></testcase>",
                xml_escape(&result.testcase),
                xml_escape(&message),
            );
        }
    }
    let _ = writeln!(out, "</testsuite>");
    out
}

/// Plain-text RST report for a plan: one section per constituent job.
pub fn plan_report_rst(plan_name: &str, jobs: &[JobSnapshot]) -> String {
    let mut out = String::new();
    let title = format!("Plan {plan_name}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    let _ = writeln!(out);
    for job in jobs {
        out.push_str(&job_report_rst(job));
        let _ = writeln!(out);
    }
    out
}

/// JUnit XML report for a plan: one `<testsuite>` per constituent job,
/// wrapped in a `<testsuites>` root.
pub fn plan_report_junit(plan_name: &str, jobs: &[JobSnapshot]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    let _ = writeln!(out, "<testsuites name=\"{}\">", xml_escape(plan_name));
    for job in jobs {
        let inner = job_report_junit(job);
        for line in inner.lines().skip(1) {
            let _ = writeln!(out, "  {line}");
        }
    }
    let _ = writeln!(out, "</testsuites>");
    out
}

fn step_label(is_passed: bool, is_skipped: bool, is_abort: bool) -> &'static str {
    if is_abort {
        "ABORTED"
    } else if is_skipped {
        "SKIPPED"
    } else if is_passed {
        "PASSED"
    } else {
        "FAILED"
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
