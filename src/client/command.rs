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

use std::time::Duration;

use super::core::SshClient;
use super::result::CommandResult;
use crate::channel::{drain_until_done, ChannelSession};
use crate::error::Result;

/// How long to wait for the exit status once the command has terminated.
const EXIT_STATUS_WAIT: Duration = Duration::from_secs(5);

/// Run one command on an already-open session and aggregate its output.
///
/// `timeout` of `None` (or zero) waits indefinitely; the 5-second per-wait
/// ceiling of the polling loop still applies internally. The session is not
/// closed here: the caller owns its lifecycle.
///
/// No pseudo-terminal is requested: some remote platforms hang a command
/// executed under a requested terminal.
pub async fn run_command<S: ChannelSession + ?Sized>(
    session: &S,
    command: &str,
    timeout: Option<Duration>,
) -> Result<CommandResult> {
    let timeout = timeout.filter(|t| !t.is_zero());

    session.submit_command(command).await?;

    let mut output: Vec<u8> = Vec::new();
    let outcome = drain_until_done(session, &mut output, timeout).await?;

    if outcome.timed_out {
        let seconds = timeout.map_or(0, |t| t.as_secs());
        return Ok(CommandResult {
            success: false,
            execution_time: Duration::ZERO,
            exit_status: None,
            result: format!("Timeout ({seconds} seconds)"),
        });
    }

    // Whole seconds, matching how callers consume it.
    let execution_time = Duration::from_secs(outcome.elapsed.as_secs());
    let exit_status = session.exit_status(EXIT_STATUS_WAIT).await;

    Ok(CommandResult {
        success: true,
        execution_time,
        exit_status,
        result: String::from_utf8_lossy(&output).to_string(),
    })
}

impl SshClient {
    /// Execute a command on the remote host.
    ///
    /// Opens a dedicated session channel, runs the command to completion or
    /// to the deadline, and closes the channel on every exit path. stdout
    /// and stderr are merged into [`CommandResult::result`] in arrival
    /// order.
    ///
    /// `timeout` of `None` or zero waits indefinitely. A deadline that
    /// passes before the command terminates yields `success = false` and a
    /// timeout message, not an error.
    pub async fn execute_command(
        &mut self,
        command: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandResult> {
        tracing::debug!("Executing command: {}", command);

        let session = self.open_channel_session().await?;
        let result = run_command(&session, command, timeout).await;
        session.close().await;

        if let Ok(result) = &result {
            tracing::debug!(
                "Command completed: success={} exit_status={:?}",
                result.success,
                result.exit_status
            );
        }
        result
    }
}
