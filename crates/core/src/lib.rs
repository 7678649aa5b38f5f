// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! igor-core: shared data model and primitives for the Igor test-execution daemon.

pub mod macros;

pub mod clock;
pub mod cookie;
pub mod state;
pub mod step;
pub mod testcase;
pub mod testplan;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use cookie::{CookieError, CookieMinter};
pub use state::{State, StateHistory, StateHistoryEntry};
pub use step::{JobState, StepRecord, StepRecordBuilder};
pub use testcase::{Testcase, Testset, Testsuite};
pub use testplan::{JobLayout, JobSpecNames, NameOrOverride, Testplan, TestplanError};
