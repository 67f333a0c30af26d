// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod common;

use std::time::Duration;

use common::{FakeSession, Step};
use sshkit::channel::Conditions;
use sshkit::client::run_command;

#[tokio::test]
async fn test_command_completes_before_deadline() {
    common::init_tracing();

    // `echo hi`: one wake with stdout data, then EOF.
    let session = FakeSession::scripted(vec![
        Step::stdout(b"hi\n", Conditions::STDOUT_DATA),
        Step::bare(Conditions::EOF),
    ])
    .with_exit_status(0);

    let result = run_command(&session, "echo hi", Some(Duration::from_millis(5000)))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.result, "hi\n");
    assert_eq!(result.exit_status, Some(0));
    assert_eq!(session.submitted_commands(), vec!["echo hi".to_string()]);
}

#[tokio::test]
async fn test_command_timeout_is_data_not_error() {
    // A command that never signals EOF or closure.
    let session = FakeSession::scripted(Vec::new()).with_exit_status(0);

    let result = run_command(&session, "sleep 60", Some(Duration::from_millis(100)))
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.result.contains("Timeout"));
    // 100ms rounds down to zero whole seconds.
    assert!(result.result.contains('0'));
    assert_eq!(result.exit_status, None);
}

#[tokio::test]
async fn test_command_merges_streams_in_arrival_order() {
    let session = FakeSession::scripted(vec![
        Step::stderr(b"warning: thing\n", Conditions::STDERR_DATA),
        Step::stdout(b"value\n", Conditions::STDOUT_DATA),
        Step::bare(Conditions::EOF),
    ]);

    let result = run_command(&session, "cmd", None).await.unwrap();

    assert!(result.success);
    assert_eq!(result.result, "warning: thing\nvalue\n");
}

#[tokio::test]
async fn test_command_stdout_drained_before_stderr_within_one_wake() {
    let session = FakeSession::scripted(vec![Step {
        stdout: b"out".to_vec(),
        stderr: b"err".to_vec(),
        conditions: Conditions::STDOUT_DATA | Conditions::STDERR_DATA | Conditions::EOF,
    }]);

    let result = run_command(&session, "cmd", None).await.unwrap();

    assert_eq!(result.result, "outerr");
}

#[tokio::test]
async fn test_command_without_exit_status_report() {
    let session = FakeSession::scripted(vec![Step::bare(Conditions::CLOSED)]);

    let result = run_command(&session, "cmd", Some(Duration::from_secs(5)))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.exit_status, None);
    assert_eq!(result.result, "");
}

#[tokio::test]
async fn test_zero_timeout_means_unbounded() {
    // A zero timeout means "no deadline", not "give up immediately".
    let session = FakeSession::scripted(vec![
        Step::stdout(b"late\n", Conditions::STDOUT_DATA),
        Step::bare(Conditions::EOF),
    ]);

    let result = run_command(&session, "cmd", Some(Duration::ZERO)).await.unwrap();

    assert!(result.success);
    assert_eq!(result.result, "late\n");
}

#[tokio::test]
async fn test_command_execution_time_counts_whole_seconds() {
    let session = FakeSession::scripted(vec![
        Step::stdout(b"hi\n", Conditions::STDOUT_DATA),
        Step::bare(Conditions::EOF),
    ]);

    let result = run_command(&session, "cmd", None).await.unwrap();

    // Fake steps resolve instantly: sub-second elapsed truncates to zero.
    assert_eq!(result.execution_time, Duration::ZERO);
}
