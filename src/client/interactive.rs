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
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::core::SshClient;
use crate::channel::{drain_until_done, ChannelSession, TerminalRequest};
use crate::error::Result;

/// Pump an interactive session: local input lines to remote stdin, remote
/// output to the local sink.
///
/// One spawned task forwards lines from `input` (each followed by a
/// newline) to the remote standard input; when the local input ends, it
/// closes the session so the foreground drain loop observes closure and
/// exits. The foreground loop runs with no overall deadline, only the
/// 5-second per-wait ceiling.
///
/// There is no explicit cancellation handle: the session ends on local
/// input exhaustion or on remote closure/EOF.
pub async fn run_interactive<S, I, O>(session: Arc<S>, input: I, output: &mut O) -> Result<()>
where
    S: ChannelSession + ?Sized + 'static,
    I: AsyncBufRead + Unpin + Send + 'static,
    O: Write + Send,
{
    let forwarder_session = Arc::clone(&session);
    let forwarder = tokio::spawn(async move {
        let mut input = input;
        let mut line = String::new();
        loop {
            line.clear();
            match input.read_line(&mut line).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let mut bytes = line.trim_end_matches(['\r', '\n']).as_bytes().to_vec();
                    bytes.push(b'\n');
                    if forwarder_session.send_stdin(&bytes).await.is_err() {
                        break;
                    }
                }
            }
        }
        // End of the local input: close the session so the foreground loop
        // exits nicely.
        forwarder_session.close().await;
    });

    let outcome = drain_until_done(session.as_ref(), output, None).await;

    // Best effort: a forwarder blocked inside a truly blocking local read
    // cannot be unblocked and may stay parked until the process exits.
    if !forwarder.is_finished() {
        forwarder.abort();
    }

    outcome.map(|_| ())
}

impl SshClient {
    /// Start an interactive session.
    ///
    /// Opens a session channel, requests a very wide no-echo terminal and a
    /// shell, then pipes `input` to the remote shell and the remote output
    /// (stdout and stderr, stdout first within each wake) to `output`.
    ///
    /// Returns when the local input is exhausted or the remote side closes.
    pub async fn interactive_session<I, O>(&mut self, input: I, output: &mut O) -> Result<()>
    where
        I: AsyncBufRead + Unpin + Send + 'static,
        O: Write + Send,
    {
        let session = self.open_channel_session().await?;
        session.request_terminal(&TerminalRequest::wide()).await?;
        session.start_shell().await?;

        let session = Arc::new(session);
        let result = run_interactive(Arc::clone(&session), input, output).await;
        session.close().await;
        result
    }
}
