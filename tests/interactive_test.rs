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

use std::sync::Arc;

use common::{FakeSession, Step};
use sshkit::channel::Conditions;
use sshkit::client::run_interactive;

#[tokio::test]
async fn test_local_input_is_forwarded_line_by_line() {
    // Remote side produces a greeting, then the script runs dry; the pump
    // ends when the forwarder hits local EOF and closes the session.
    let session = Arc::new(FakeSession::scripted(vec![Step::stdout(
        b"$ ",
        Conditions::STDOUT_DATA,
    )]));

    let input: &[u8] = b"echo one\nexit\n";
    let mut output = Vec::new();

    run_interactive(Arc::clone(&session), input, &mut output)
        .await
        .unwrap();

    assert_eq!(session.stdin_bytes(), b"echo one\nexit\n");
    assert_eq!(output, b"$ ");
    // The forwarder closed the session when the local input ended.
    assert!(session.close_calls() >= 1);
}

#[tokio::test]
async fn test_remote_closure_ends_the_pump() {
    let session = Arc::new(FakeSession::scripted(vec![
        Step::stdout(b"bye\n", Conditions::STDOUT_DATA),
        Step::bare(Conditions::CLOSED),
    ]));

    // Local input never ends on its own (empty input still closes quickly,
    // so use a line that is consumed before the remote closes).
    let input: &[u8] = b"quit\n";
    let mut output = Vec::new();

    run_interactive(Arc::clone(&session), input, &mut output)
        .await
        .unwrap();

    assert_eq!(output, b"bye\n");
}

#[tokio::test]
async fn test_output_merges_both_streams() {
    let session = Arc::new(FakeSession::scripted(vec![
        Step {
            stdout: b"out".to_vec(),
            stderr: b"err".to_vec(),
            conditions: Conditions::STDOUT_DATA | Conditions::STDERR_DATA,
        },
        Step::bare(Conditions::EOF),
    ]));

    let input: &[u8] = b"";
    let mut output = Vec::new();

    run_interactive(Arc::clone(&session), input, &mut output)
        .await
        .unwrap();

    // Stdout always lands before stderr for the same wake.
    assert_eq!(output, b"outerr");
}
