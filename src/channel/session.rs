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

use async_trait::async_trait;

use super::Conditions;
use crate::error::Result;

/// Which remote byte stream to read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// A pseudo-terminal request.
///
/// Interactive shells need a terminal; plain command execution must not
/// request one (some remote platforms hang an exec under a requested PTY).
#[derive(Debug, Clone)]
pub struct TerminalRequest {
    pub term: String,
    pub cols: u32,
    pub rows: u32,
    pub pix_width: u32,
    pub pix_height: u32,
    /// Local echo on the remote PTY (RFC 4254 section 8, opcode 53).
    pub echo: bool,
}

impl TerminalRequest {
    /// The terminal used for interactive piping: very wide so the remote
    /// side does not wrap command lines, with echo disabled.
    pub fn wide() -> Self {
        Self {
            term: "dumb".to_string(),
            cols: 10000,
            rows: 24,
            pix_width: 640,
            pix_height: 480,
            echo: false,
        }
    }
}

/// One open channel on an authenticated transport.
///
/// This is the capability interface consumed by the polling loop, the
/// command executor and the interactive pump. The production implementation
/// is [`RemoteSession`](super::RemoteSession); tests substitute in-memory
/// fakes.
///
/// All methods take `&self`: a session handle is shared between the
/// foreground drain loop and the interactive pump's stdin-forwarding task,
/// which only writes stdin and closes.
#[async_trait]
pub trait ChannelSession: Send + Sync {
    /// Submit a command for execution on this channel.
    async fn submit_command(&self, command: &str) -> Result<()>;

    /// Request a pseudo-terminal on this channel.
    async fn request_terminal(&self, request: &TerminalRequest) -> Result<()>;

    /// Start a shell on this channel.
    async fn start_shell(&self) -> Result<()>;

    /// Block until at least one fact in `interest` holds, or `timeout`
    /// elapses.
    ///
    /// Returns every fact currently true (not only the requested ones),
    /// with [`Conditions::TIMEOUT`] added when the wait expired first.
    async fn wait_for(&self, interest: Conditions, timeout: Duration) -> Conditions;

    /// Read bytes that are already buffered on the given stream into `buf`,
    /// without blocking. Returns the number of bytes copied; 0 means no
    /// bytes are currently available.
    fn drain(&self, stream: StreamKind, buf: &mut [u8]) -> usize;

    /// Write bytes to the remote standard input.
    async fn send_stdin(&self, data: &[u8]) -> Result<()>;

    /// Wait up to `timeout` for the remote command's exit status.
    ///
    /// `None` if the remote platform did not report one in time.
    async fn exit_status(&self, timeout: Duration) -> Option<u32>;

    /// Close the channel. Idempotent: closing an already-closed session is
    /// a no-op and never fails.
    async fn close(&self);
}
