// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn terminal_states_are_exactly_the_four_endstates() {
    assert!(!JobState::Open.is_terminal());
    assert!(!JobState::Preparing.is_terminal());
    assert!(!JobState::Prepared.is_terminal());
    assert!(!JobState::Running.is_terminal());
    assert!(JobState::Passed.is_terminal());
    assert!(JobState::Failed.is_terminal());
    assert!(JobState::Aborted.is_terminal());
    assert!(JobState::Timedout.is_terminal());
}

#[test]
fn display_matches_lowercase_name() {
    assert_eq!(JobState::Preparing.to_string(), "preparing");
    assert_eq!(JobState::Timedout.to_string(), "timedout");
}

#[test]
fn as_state_name_matches_display() {
    assert_eq!(JobState::Running.as_state().name(), "running");
}

#[test]
fn from_state_is_the_inverse_of_as_state() {
    for state in [
        JobState::Open,
        JobState::Preparing,
        JobState::Prepared,
        JobState::Running,
        JobState::Passed,
        JobState::Failed,
        JobState::Aborted,
        JobState::Timedout,
    ] {
        assert_eq!(JobState::from_state(state.as_state()), Some(state));
    }
}

#[test]
fn from_state_rejects_an_unknown_name() {
    assert_eq!(JobState::from_state(State("bogus")), None);
}

#[test]
fn builder_computes_is_passed_for_a_normal_success() {
    let testcase = Testcase {
        expect_failure: false,
        ..Default::default()
    };
    let record = StepRecordBuilder::new(0, testcase, true).build();
    assert!(record.is_passed);
}

#[test]
fn builder_computes_is_passed_for_an_expected_failure() {
    let testcase = Testcase {
        expect_failure: true,
        ..Default::default()
    };
    let record = StepRecordBuilder::new(0, testcase, false).build();
    assert!(record.is_passed);
}

#[test]
fn builder_flags_an_unexpected_failure_as_not_passed() {
    let testcase = Testcase {
        expect_failure: false,
        ..Default::default()
    };
    let record = StepRecordBuilder::new(0, testcase, false).build();
    assert!(!record.is_passed);
}

#[test]
fn builder_carries_optional_fields_through() {
    let record = StepRecordBuilder::new(0, Testcase::default(), true)
        .is_abort(true)
        .runtime_ms(1500)
        .note("aborted")
        .log("0-log.txt")
        .annotations(vec!["saw something".to_string()])
        .build();

    assert!(record.is_abort);
    assert_eq!(record.runtime_ms, 1500);
    assert_eq!(record.note.as_deref(), Some("aborted"));
    assert_eq!(record.log.as_deref(), Some("0-log.txt"));
    assert_eq!(record.annotations, vec!["saw something".to_string()]);
}
