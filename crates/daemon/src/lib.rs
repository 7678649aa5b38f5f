// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! igor-daemon: the HTTP control surface that drives a `JobCenter` from
//! outside. The binary entry point lives in `src/bin/igord.rs`;
//! this library crate is what it wires together, and what integration tests
//! exercise directly without going through a socket.

pub mod config;
pub mod error;
pub mod http;
pub mod state;

pub use error::DaemonError;
pub use http::router;
pub use state::AppState;
