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

/// Result of a remote command execution.
///
/// A timeout is reported here, not as an error: `success` is `false` and
/// `result` carries a timeout message, so callers can tell "the command is
/// still running remotely" from "the call itself is unusable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command ran to completion before the deadline.
    pub success: bool,
    /// Time taken by the execution itself (not counting connection setup),
    /// in whole seconds.
    pub execution_time: Duration,
    /// The exit status reported by the command (process return code).
    /// `None` if unsupported by the remote platform or if it timed out.
    pub exit_status: Option<u32>,
    /// The output of the command, stdout and stderr merged in arrival
    /// order; a timeout message when `success` is `false`.
    pub result: String,
}

impl CommandResult {
    /// Shell convention: a reported status of 0 means success.
    pub fn exited_cleanly(&self) -> bool {
        self.success && self.exit_status.map_or(true, |status| status == 0)
    }
}
