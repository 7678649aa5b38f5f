// SPDX-License-Identifier: MIT

use super::*;
use crate::clock::FakeClock;

#[test]
fn surl_of_zero_is_first_symbol() {
    assert_eq!(surl(0), "2");
}

#[test]
fn surl_wraps_at_alphabet_boundary() {
    assert_eq!(surl(59), "ZZ");
}

#[test]
fn surl_is_injective_over_a_small_range() {
    let mut seen = std::collections::HashSet::new();
    for n in 0..10_000i128 {
        assert!(seen.insert(surl(n)), "collision at n={n}");
    }
}

#[test]
fn mint_produces_prefixed_cookie() {
    let minter = CookieMinter::new();
    let clock = FakeClock::new();
    let cookie = minter.mint(&clock, |_| false).unwrap();
    assert!(cookie.starts_with('i'));
}

#[test]
fn mint_never_repeats_within_same_millisecond() {
    let minter = CookieMinter::new();
    let clock = FakeClock::new();
    let mut cookies = std::collections::HashSet::new();
    for _ in 0..50 {
        let cookie = minter.mint(&clock, |_| false).unwrap();
        assert!(cookies.insert(cookie), "minter repeated a cookie");
    }
}

#[test]
fn mint_retries_past_a_collision() {
    let minter = CookieMinter::new();
    let clock = FakeClock::new();
    let first = minter.mint(&clock, |_| false).unwrap();
    let second = minter.mint(&clock, |c| c == first).unwrap();
    assert_ne!(first, second);
}

#[test]
fn mint_gives_up_when_every_candidate_is_taken() {
    let minter = CookieMinter::new();
    let clock = FakeClock::new();
    let err = minter.mint(&clock, |_| true).unwrap_err();
    assert!(matches!(err, CookieError::Exhausted { .. }));
}
