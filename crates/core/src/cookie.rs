// SPDX-License-Identifier: MIT

//! Job cookie minting.
//!
//! A cookie is the public, URL-safe identifier handed back to a submitter for a
//! job. It is derived from the wall-clock submission time plus a monotonic
//! counter, run through a bijective base-60 encoding, so cookies sort roughly
//! chronologically while staying short and free of characters that need
//! escaping in a URL path segment.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::clock::Clock;

/// 60-symbol alphabet: digits 2-9, then a-z, then A-Z. Excludes 0/1/O/I/l to
/// avoid cookies that are easy to misread or misquote.
const ALPHABET: &[u8; 60] = b"23456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const PREFIX: char = 'i';

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("no unused cookie found after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Mints unique, bijective-base-60-encoded job cookies.
///
/// Holds a monotonic counter behind a mutex so concurrent submissions never
/// mint the same raw number even when they land in the same millisecond.
pub struct CookieMinter {
    counter: Mutex<u64>,
}

impl CookieMinter {
    pub fn new() -> Self {
        Self {
            counter: Mutex::new(0),
        }
    }

    /// Mint a cookie, retrying against `is_taken` until a free one is found.
    ///
    /// `is_taken` is consulted under no lock of ours; callers typically check
    /// it against the set of cookies currently live in the job center.
    pub fn mint(
        &self,
        clock: &impl Clock,
        is_taken: impl Fn(&str) -> bool,
    ) -> Result<String, CookieError> {
        const MAX_ATTEMPTS: u32 = 1000;

        for attempt in 0..MAX_ATTEMPTS {
            let seq = {
                let mut counter = self.counter.lock();
                *counter += 1;
                *counter
            };
            let cookie = self.encode(clock.epoch_ms(), seq);
            if !is_taken(&cookie) {
                return Ok(cookie);
            }
            let _ = attempt;
        }
        Err(CookieError::Exhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    fn encode(&self, epoch_ms: u64, seq: u64) -> String {
        let raw = format!("{epoch_ms}{seq}");
        let n: i128 = raw.parse().unwrap_or(i128::from(seq));
        format!("{PREFIX}{}", surl(n))
    }
}

impl Default for CookieMinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bijective base-60 encoding of a non-negative integer.
///
/// Emits the least-significant symbol first. Unlike plain base-N, this
/// encoding is bijective: every non-negative integer maps to a distinct
/// string and there is no ambiguity from leading "zero" symbols, at the cost
/// of the usual base-N division step being offset by one once a digit would
/// otherwise wrap.
fn surl(mut n: i128) -> String {
    let len = ALPHABET.len() as i128;
    let mut out = String::new();
    loop {
        let key = n.rem_euclid(len) as usize;
        out.push(ALPHABET[key] as char);
        if n < len - 1 {
            break;
        }
        n = n / len - 1;
    }
    out
}

#[cfg(test)]
#[path = "cookie_tests.rs"]
mod tests;
