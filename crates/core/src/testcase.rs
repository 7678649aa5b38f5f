// SPDX-License-Identifier: MIT

//! Test definition data model: [`Testcase`], [`Testset`], [`Testsuite`].
//!
//! These are plain, immutable-after-load data shapes. Reading them off disk
//! and assembling the archive that ships them to a guest lives in
//! `igor-catalog`; this crate only defines what a loaded suite looks like.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single test case: one script plus its execution contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Testcase {
    pub name: String,
    pub filename: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub expect_failure: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Testcase {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Every name in `dependencies` names one of `known`.
    pub fn dependencies_resolved(&self, known: &[Testcase]) -> bool {
        self.dependencies.iter().all(|dep| known.iter().any(|tc| &tc.name == dep))
    }
}

/// An ordered group of [`Testcase`]s plus any library trees they depend on.
///
/// `libs` maps a library name to a path under the testset's source tree; the
/// archive builder copies each one to `lib/<name>/` (see `igor-catalog`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Testset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub libs: BTreeMap<String, String>,
    #[serde(default)]
    pub testcases: Vec<Testcase>,
}

/// An ordered concatenation of [`Testset`]s — the unit a Job runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Testsuite {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub testsets: Vec<Testset>,
}

impl Testsuite {
    /// Flatten to the ordered sequence of testcases a Job steps through.
    ///
    /// A testcase may appear under more than one ordinal if it is reused
    /// across testsets; this is intentional, not deduplicated.
    pub fn flatten(&self) -> Vec<Testcase> {
        self.testsets
            .iter()
            .flat_map(|set| set.testcases.iter().cloned())
            .collect()
    }

    /// Sum of every flattened testcase's timeout, in seconds.
    pub fn timeout(&self) -> u64 {
        self.flatten().iter().map(Testcase::timeout_seconds).sum()
    }

    /// Union of library trees across all testsets, keyed by lib name.
    ///
    /// Returns the duplicate names found (the caller logs a warning and
    /// keeps the first occurrence, per the archive-format contract).
    pub fn merged_libs(&self) -> (BTreeMap<String, String>, Vec<String>) {
        let mut merged = BTreeMap::new();
        let mut duplicates = Vec::new();
        for set in &self.testsets {
            for (name, path) in &set.libs {
                if merged.insert(name.clone(), path.clone()).is_some() {
                    duplicates.push(name.clone());
                }
            }
        }
        (merged, duplicates)
    }
}

#[cfg(test)]
#[path = "testcase_tests.rs"]
mod tests;
