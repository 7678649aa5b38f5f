// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! igor-storage: the per-job scratch directory (artifacts in, archive out).

mod session;

pub use session::{StorageError, TestSession};
