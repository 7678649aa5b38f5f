// SPDX-License-Identifier: MIT

//! Test builders and proptest strategies shared across crates.
//!
//! Available under `#[cfg(test)]` in this crate and to downstream crates that
//! enable the `test-support` feature.

use crate::testcase::{Testcase, Testset, Testsuite};

crate::builder!(
    pub struct TestcaseBuilder => Testcase {
        into {
            name: String = "case",
            filename: String = "case.sh",
            description: String = "",
        }
        set {
            timeout_seconds: u64 = 60,
            expect_failure: bool = false,
            dependencies: Vec<String> = Vec::new(),
        }
    }
);

crate::builder!(
    pub struct TestsetBuilder => Testset {
        into {
            name: String = "set",
            description: String = "",
        }
        set {
            libs: std::collections::BTreeMap<String, String> = Default::default(),
            testcases: Vec<Testcase> = Vec::new(),
        }
    }
);

crate::builder!(
    pub struct TestsuiteBuilder => Testsuite {
        into {
            name: String = "suite",
            description: String = "",
        }
        set {
            testsets: Vec<Testset> = Vec::new(),
        }
    }
);

/// Build a testsuite of `n` single-case testsets, each with the given
/// per-case timeout, named `case-0`, `case-1`, ...
pub fn linear_suite(n: usize, timeout_seconds: u64) -> Testsuite {
    let testsets = (0..n)
        .map(|i| {
            Testset::builder()
                .name(format!("set-{i}"))
                .testcases(vec![Testcase::builder()
                    .name(format!("case-{i}"))
                    .filename(format!("case-{i}.sh"))
                    .timeout_seconds(timeout_seconds)
                    .build()])
                .build()
        })
        .collect();
    Testsuite::builder().testsets(testsets).build()
}

#[cfg(feature = "proptest")]
pub mod strategies {
    use proptest::prelude::*;

    use super::*;

    pub fn arb_testcase() -> impl Strategy<Value = Testcase> {
        (
            "[a-z][a-z0-9_]{0,8}",
            1u64..120,
            any::<bool>(),
        )
            .prop_map(|(name, timeout_seconds, expect_failure)| {
                Testcase::builder()
                    .name(name.clone())
                    .filename(format!("{name}.sh"))
                    .timeout_seconds(timeout_seconds)
                    .expect_failure(expect_failure)
                    .build()
            })
    }

    pub fn arb_testsuite(max_sets: usize, max_cases_per_set: usize) -> impl Strategy<Value = Testsuite> {
        prop::collection::vec(
            prop::collection::vec(arb_testcase(), 1..=max_cases_per_set.max(1)),
            1..=max_sets.max(1),
        )
        .prop_map(|sets| {
            let testsets = sets
                .into_iter()
                .enumerate()
                .map(|(i, testcases)| {
                    Testset::builder()
                        .name(format!("set-{i}"))
                        .testcases(testcases)
                        .build()
                })
                .collect();
            Testsuite::builder().testsets(testsets).build()
        })
    }
}
