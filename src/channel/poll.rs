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

use std::io::Write;
use std::time::{Duration, Instant};

use super::{transfer_available, ChannelSession, Conditions, StreamKind};
use crate::error::Result;

/// Ceiling for a single condition wait.
///
/// Short repeated waits keep the loop responsive to the overall deadline
/// without busy-spinning; draining on every wake bounds what the transport
/// has to buffer.
pub const POLL_WAIT: Duration = Duration::from_secs(5);

/// What ended a drain loop.
#[derive(Debug, Clone, Copy)]
pub struct PollOutcome {
    /// The overall deadline passed before the channel reached EOF/closed.
    pub timed_out: bool,
    /// Time spent inside the loop.
    pub elapsed: Duration,
}

/// Repeatedly wait for channel activity and drain both remote streams into
/// `sink` until the channel reaches end-of-input or closes, or until
/// `overall_timeout` (if any) elapses.
///
/// This is the engine behind both command execution and interactive piping;
/// the two differ only in the sink and in what they compute afterwards.
/// Within one wake, stdout is always drained before stderr.
pub async fn drain_until_done<S: ChannelSession + ?Sized>(
    session: &S,
    sink: &mut (dyn Write + Send),
    overall_timeout: Option<Duration>,
) -> Result<PollOutcome> {
    let start = Instant::now();
    let deadline = overall_timeout.map(|t| start + t);

    let interest =
        Conditions::STDOUT_DATA | Conditions::STDERR_DATA | Conditions::EOF | Conditions::CLOSED;

    let mut conditions = Conditions::empty();
    let timed_out = loop {
        if conditions.is_terminal() {
            break false;
        }

        let wait = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    break true;
                }
                (deadline - now).min(POLL_WAIT)
            }
            None => POLL_WAIT,
        };

        conditions = session.wait_for(interest, wait).await;

        if conditions.has_stdout_data() {
            transfer_available(session, StreamKind::Stdout, sink, -1)?;
        }
        if conditions.has_stderr_data() {
            transfer_available(session, StreamKind::Stderr, sink, -1)?;
        }
    };

    Ok(PollOutcome {
        timed_out,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::channel::TerminalRequest;

    /// One scripted wake: bytes to make available, and the conditions the
    /// wait reports.
    struct Step {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        conditions: Conditions,
    }

    struct ScriptedSession {
        steps: Mutex<VecDeque<Step>>,
        stdout: Mutex<Vec<u8>>,
        stderr: Mutex<Vec<u8>>,
    }

    impl ScriptedSession {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                stdout: Mutex::new(Vec::new()),
                stderr: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChannelSession for ScriptedSession {
        async fn submit_command(&self, _command: &str) -> Result<()> {
            Ok(())
        }

        async fn request_terminal(&self, _request: &TerminalRequest) -> Result<()> {
            Ok(())
        }

        async fn start_shell(&self) -> Result<()> {
            Ok(())
        }

        async fn wait_for(&self, _interest: Conditions, timeout: Duration) -> Conditions {
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(step) => {
                    self.stdout.lock().unwrap().extend_from_slice(&step.stdout);
                    self.stderr.lock().unwrap().extend_from_slice(&step.stderr);
                    step.conditions
                }
                None => {
                    // Script exhausted: behave like a silent channel.
                    tokio::time::sleep(timeout).await;
                    Conditions::TIMEOUT
                }
            }
        }

        fn drain(&self, stream: StreamKind, buf: &mut [u8]) -> usize {
            let mut data = match stream {
                StreamKind::Stdout => self.stdout.lock().unwrap(),
                StreamKind::Stderr => self.stderr.lock().unwrap(),
            };
            let n = buf.len().min(data.len());
            buf[..n].copy_from_slice(&data[..n]);
            data.drain(..n);
            n
        }

        async fn send_stdin(&self, _data: &[u8]) -> Result<()> {
            Ok(())
        }

        async fn exit_status(&self, _timeout: Duration) -> Option<u32> {
            None
        }

        async fn close(&self) {}
    }

    #[tokio::test]
    async fn test_drains_stdout_before_stderr_on_same_wake() {
        let session = ScriptedSession::new(vec![
            Step {
                stdout: b"out".to_vec(),
                stderr: b"err".to_vec(),
                conditions: Conditions::STDOUT_DATA | Conditions::STDERR_DATA,
            },
            Step {
                stdout: Vec::new(),
                stderr: Vec::new(),
                conditions: Conditions::EOF,
            },
        ]);

        let mut sink = Vec::new();
        let outcome = drain_until_done(&session, &mut sink, None).await.unwrap();

        assert!(!outcome.timed_out);
        assert_eq!(sink, b"outerr");
    }

    #[tokio::test]
    async fn test_drains_data_delivered_alongside_eof() {
        let session = ScriptedSession::new(vec![Step {
            stdout: b"tail\n".to_vec(),
            stderr: Vec::new(),
            conditions: Conditions::STDOUT_DATA | Conditions::EOF,
        }]);

        let mut sink = Vec::new();
        let outcome = drain_until_done(&session, &mut sink, None).await.unwrap();

        assert!(!outcome.timed_out);
        assert_eq!(sink, b"tail\n");
    }

    #[tokio::test]
    async fn test_deadline_ends_a_silent_channel() {
        let session = ScriptedSession::new(Vec::new());

        let mut sink = Vec::new();
        let outcome = drain_until_done(
            &session,
            &mut sink,
            Some(Duration::from_millis(50)),
        )
        .await
        .unwrap();

        assert!(outcome.timed_out);
        assert!(sink.is_empty());
        assert!(outcome.elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_closed_stops_the_loop() {
        let session = ScriptedSession::new(vec![Step {
            stdout: Vec::new(),
            stderr: Vec::new(),
            conditions: Conditions::CLOSED,
        }]);

        let mut sink = Vec::new();
        let outcome = drain_until_done(&session, &mut sink, None).await.unwrap();
        assert!(!outcome.timed_out);
    }
}
