// SPDX-License-Identifier: MIT

use std::sync::Arc;

use igor_adapters::fake::{FakeHost, FakeProfile, HostCall};
use igor_core::test_support::linear_suite;
use igor_core::{FakeClock, Testset};
use igor_storage::TestSession;

use super::*;

fn make_job(testsuite: Testsuite, clock: FakeClock) -> (Arc<Job<FakeClock>>, Arc<FakeHost>, Arc<FakeProfile>) {
    let dir = tempfile::tempdir().unwrap();
    let session = TestSession::new("iTEST", dir.path()).unwrap();
    let host = Arc::new(FakeHost::new("host-1"));
    let profile = Arc::new(FakeProfile::new("profile-1"));
    let spec = JobSpec {
        testsuite,
        profile: profile.clone() as Arc<dyn Profile>,
        host: host.clone() as Arc<dyn Host>,
        additional_kargs: String::new(),
    };
    let hooks = Arc::new(HookRunner::new(None, crate::events::EventPublisher::new()));
    let job = Job::new("iTEST", spec, session, hooks, clock);
    (job, host, profile)
}

#[tokio::test]
async fn setup_then_start_walks_open_to_running() {
    let clock = FakeClock::new();
    let (job, host, profile) = make_job(linear_suite(2, 60), clock);

    job.setup().await.unwrap();
    assert_eq!(job.state(), JobState::Prepared);
    assert_eq!(host.calls(), vec![HostCall::Prepare]);
    assert_eq!(profile.kargs_for("host-1"), Some("igor_cookie=iTEST".to_string()));

    job.start().await.unwrap();
    assert_eq!(job.state(), JobState::Running);
    assert_eq!(host.calls(), vec![HostCall::Prepare, HostCall::Start]);
}

#[tokio::test]
async fn setup_appends_the_callback_cookie_to_existing_kargs() {
    let dir = tempfile::tempdir().unwrap();
    let session = TestSession::new("iTEST", dir.path()).unwrap();
    let host = Arc::new(FakeHost::new("host-1"));
    let profile = Arc::new(FakeProfile::new("profile-1"));
    let spec = JobSpec {
        testsuite: linear_suite(1, 60),
        profile: profile.clone() as Arc<dyn Profile>,
        host: host.clone() as Arc<dyn Host>,
        additional_kargs: "console=ttyS0".to_string(),
    };
    let hooks = Arc::new(HookRunner::new(None, crate::events::EventPublisher::new()));
    let job = Job::new("iTEST", spec, session, hooks, FakeClock::new());

    job.setup().await.unwrap();
    assert_eq!(profile.kargs_for("host-1"), Some("console=ttyS0 igor_cookie=iTEST".to_string()));
}

#[tokio::test]
async fn setup_out_of_order_is_rejected() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(1, 60), clock);
    job.setup().await.unwrap();

    let err = job.setup().await.unwrap_err();
    assert!(matches!(err, EngineError::Precondition(_)));
}

#[tokio::test]
async fn finishing_every_step_with_success_passes_the_job() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(2, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    job.finish_step(0, true, None, false, false).await.unwrap();
    assert_eq!(job.state(), JobState::Running);
    job.finish_step(1, true, None, false, false).await.unwrap();
    assert_eq!(job.state(), JobState::Passed);
    assert_eq!(job.results().len(), 2);
}

#[tokio::test]
async fn an_unexpected_failure_fails_the_job_immediately() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(2, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    job.finish_step(0, false, Some("boom".to_string()), false, false).await.unwrap();
    assert_eq!(job.state(), JobState::Failed);
}

#[tokio::test]
async fn an_expected_failure_still_passes_the_job() {
    let testsuite = Testsuite::builder()
        .testsets(vec![Testset::builder()
            .testcases(vec![Testcase::builder().name("case-0").filename("case-0.sh").expect_failure(true).build()])
            .build()])
        .build();
    let clock = FakeClock::new();
    let (job, ..) = make_job(testsuite, clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    job.finish_step(0, false, None, false, false).await.unwrap();
    assert_eq!(job.state(), JobState::Passed);
}

#[tokio::test]
async fn finishing_the_wrong_step_is_rejected() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(2, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    let err = job.finish_step(1, true, None, false, false).await.unwrap_err();
    assert!(matches!(err, EngineError::Precondition(_)));
}

#[tokio::test]
async fn abort_finishes_the_current_step_and_ends_the_job() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(2, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    job.abort().await.unwrap();
    assert_eq!(job.state(), JobState::Aborted);
    assert_eq!(job.results().len(), 1);
    assert!(job.results()[0].is_abort);
}

#[tokio::test]
async fn end_purges_the_host_and_revokes_the_profile_even_after_a_failure() {
    let clock = FakeClock::new();
    let (job, host, profile) = make_job(linear_suite(1, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();
    job.finish_step(0, false, None, false, false).await.unwrap();
    assert_eq!(job.state(), JobState::Failed);

    job.end().await.unwrap();
    assert!(job.has_ended());
    assert_eq!(host.calls(), vec![HostCall::Prepare, HostCall::Start, HostCall::Purge]);
    assert_eq!(profile.kargs_for("host-1"), None);
}

#[tokio::test]
async fn end_tolerates_provider_errors_and_still_marks_the_job_ended() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let session = TestSession::new("iTEST", dir.path()).unwrap();
    let host = Arc::new(FakeHost::new("host-1").fail_on(HostCall::Purge));
    let profile = Arc::new(FakeProfile::new("profile-1"));
    let spec = JobSpec {
        testsuite: linear_suite(1, 60),
        profile: profile.clone() as Arc<dyn Profile>,
        host: host.clone() as Arc<dyn Host>,
        additional_kargs: String::new(),
    };
    let hooks = Arc::new(HookRunner::new(None, crate::events::EventPublisher::new()));
    let job = Job::new("iTEST", spec, session, hooks, clock);

    job.setup().await.unwrap();
    job.start().await.unwrap();
    job.finish_step(0, true, None, false, false).await.unwrap();
    assert_eq!(job.state(), JobState::Passed);

    job.end().await.unwrap();
    assert!(job.has_ended());
}

#[tokio::test]
async fn clean_before_end_is_rejected() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(1, 60), clock);
    let err = job.clean().await.unwrap_err();
    assert!(matches!(err, EngineError::Precondition(_)));
}

#[tokio::test]
async fn clean_removes_the_session_directory() {
    let clock = FakeClock::new();
    let dir = tempfile::tempdir().unwrap();
    let session = TestSession::new("iTEST", dir.path()).unwrap();
    let session_dir = session.dir().to_path_buf();
    let host = Arc::new(FakeHost::new("host-1"));
    let profile = Arc::new(FakeProfile::new("profile-1"));
    let spec = JobSpec {
        testsuite: linear_suite(1, 60),
        profile: profile as Arc<dyn Profile>,
        host: host as Arc<dyn Host>,
        additional_kargs: String::new(),
    };
    let hooks = Arc::new(HookRunner::new(None, crate::events::EventPublisher::new()));
    let job = Job::new("iTEST", spec, session, hooks, clock);

    job.setup().await.unwrap();
    job.start().await.unwrap();
    job.finish_step(0, true, None, false, false).await.unwrap();
    job.end().await.unwrap();
    job.clean().await.unwrap();

    assert!(!session_dir.exists());
}

#[tokio::test]
async fn annotate_appends_to_the_current_steps_annotation_artifact() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(1, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    job.annotate("first".to_string()).await.unwrap();
    job.annotate("second".to_string()).await.unwrap();
    job.finish_step(0, true, None, false, false).await.unwrap();

    assert_eq!(job.results()[0].annotations, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn allowed_time_is_the_cumulative_timeout_up_to_the_current_step() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(3, 10), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    assert_eq!(job.allowed_time_ms(), 10_000);
    job.finish_step(0, true, None, false, false).await.unwrap();
    assert_eq!(job.allowed_time_ms(), 20_000);
}

#[tokio::test]
async fn allowed_time_for_an_empty_suite_is_zero() {
    let empty = Testsuite::builder().build();
    let clock = FakeClock::new();
    let (job, ..) = make_job(empty, clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    assert_eq!(job.allowed_time_ms(), 0);
    assert!(job.is_timedout());
}

#[tokio::test]
async fn runtime_grows_with_the_clock_while_running() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(1, 60), clock.clone());
    job.setup().await.unwrap();
    job.start().await.unwrap();

    assert_eq!(job.runtime_ms(), 0);
    clock.advance(Duration::from_secs(5));
    assert_eq!(job.runtime_ms(), 5_000);
    assert!(!job.is_timedout());

    clock.advance(Duration::from_secs(100));
    assert!(job.is_timedout());
}

#[tokio::test]
async fn wait_returns_once_the_job_reaches_an_endstate() {
    let clock = FakeClock::new();
    let (job, ..) = make_job(linear_suite(1, 60), clock);
    job.setup().await.unwrap();
    job.start().await.unwrap();

    let waiter = tokio::spawn({
        let job = Arc::clone(&job);
        async move { job.wait().await }
    });

    job.finish_step(0, true, None, false, false).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
}
