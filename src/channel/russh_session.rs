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

//! russh-backed [`ChannelSession`].
//!
//! A pump task owns the russh channel and translates its message stream
//! into buffered stdout/stderr bytes plus condition flags; handles only
//! carry shared state and a request sender, so they can be cloned across
//! the foreground drain loop and the interactive stdin forwarder.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use russh::client::Msg;
use russh::{Channel, ChannelMsg, Pty};
use tokio::sync::{mpsc, oneshot, Notify};

use super::{ChannelSession, Conditions, StreamKind, TerminalRequest};
use crate::error::{Error, Result};

/// Capacity of the channel-request queue between handles and the pump.
const REQUEST_QUEUE_SIZE: usize = 64;

/// Requests forwarded from session handles to the pump task, which is the
/// only owner of the underlying russh channel.
enum ChannelRequest {
    Exec {
        command: String,
        reply: oneshot::Sender<std::result::Result<(), russh::Error>>,
    },
    RequestPty {
        request: TerminalRequest,
        reply: oneshot::Sender<std::result::Result<(), russh::Error>>,
    },
    Shell {
        reply: oneshot::Sender<std::result::Result<(), russh::Error>>,
    },
    Stdin {
        data: Vec<u8>,
        reply: oneshot::Sender<std::result::Result<(), russh::Error>>,
    },
    Close,
}

#[derive(Default)]
struct StreamState {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    eof: bool,
    closed: bool,
    exit_status: Option<u32>,
}

impl StreamState {
    fn conditions(&self) -> Conditions {
        let mut conditions = Conditions::empty();
        if !self.stdout.is_empty() {
            conditions |= Conditions::STDOUT_DATA;
        }
        if !self.stderr.is_empty() {
            conditions |= Conditions::STDERR_DATA;
        }
        if self.eof {
            conditions |= Conditions::EOF;
        }
        if self.closed {
            conditions |= Conditions::CLOSED;
        }
        if self.exit_status.is_some() {
            conditions |= Conditions::EXIT_STATUS;
        }
        conditions
    }
}

struct SessionState {
    streams: Mutex<StreamState>,
    notify: Notify,
}

impl SessionState {
    fn mutate(&self, f: impl FnOnce(&mut StreamState)) {
        {
            let mut streams = self.streams.lock().unwrap();
            f(&mut streams);
        }
        self.notify.notify_waiters();
    }

    fn mark_closed(&self) {
        self.mutate(|s| s.closed = true);
    }
}

/// An open channel on an authenticated transport, usable for command
/// execution or an interactive shell.
///
/// Cheap to clone; all clones observe the same channel. The session does
/// not keep the transport alive on its own: when the transport goes away
/// the channel surfaces as closed.
#[derive(Clone)]
pub struct RemoteSession {
    requests: mpsc::Sender<ChannelRequest>,
    state: Arc<SessionState>,
}

impl RemoteSession {
    /// Wrap a freshly opened session channel.
    pub fn new(channel: Channel<Msg>) -> Self {
        let state = Arc::new(SessionState {
            streams: Mutex::new(StreamState::default()),
            notify: Notify::new(),
        });
        let (requests, request_rx) = mpsc::channel(REQUEST_QUEUE_SIZE);

        tokio::spawn(pump(channel, state.clone(), request_rx));

        Self { requests, state }
    }

    /// Whether the channel has been observed closed.
    pub fn is_closed(&self) -> bool {
        self.state.streams.lock().unwrap().closed
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<std::result::Result<(), russh::Error>>) -> ChannelRequest,
    ) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(build(reply))
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response
            .await
            .map_err(|_| Error::ChannelClosed)?
            .map_err(Error::Ssh)
    }
}

#[async_trait]
impl ChannelSession for RemoteSession {
    async fn submit_command(&self, command: &str) -> Result<()> {
        let command = command.to_string();
        self.request(|reply| ChannelRequest::Exec { command, reply })
            .await
    }

    async fn request_terminal(&self, request: &TerminalRequest) -> Result<()> {
        let request = request.clone();
        self.request(|reply| ChannelRequest::RequestPty { request, reply })
            .await
    }

    async fn start_shell(&self) -> Result<()> {
        self.request(|reply| ChannelRequest::Shell { reply }).await
    }

    async fn wait_for(&self, interest: Conditions, timeout: Duration) -> Conditions {
        let deadline = Instant::now() + timeout;
        loop {
            // Register for a wakeup before inspecting the state, so a
            // notification between the check and the await is not lost.
            let notified = self.state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let current = self.state.streams.lock().unwrap().conditions();
            if current.intersects(interest) {
                return current;
            }

            let now = Instant::now();
            if now >= deadline {
                return current | Conditions::TIMEOUT;
            }
            let _ = tokio::time::timeout(deadline - now, notified).await;
        }
    }

    fn drain(&self, stream: StreamKind, buf: &mut [u8]) -> usize {
        let mut streams = self.state.streams.lock().unwrap();
        let data = match stream {
            StreamKind::Stdout => &mut streams.stdout,
            StreamKind::Stderr => &mut streams.stderr,
        };
        let n = buf.len().min(data.len());
        buf[..n].copy_from_slice(&data[..n]);
        data.drain(..n);
        n
    }

    async fn send_stdin(&self, data: &[u8]) -> Result<()> {
        let data = data.to_vec();
        self.request(|reply| ChannelRequest::Stdin { data, reply })
            .await
    }

    async fn exit_status(&self, timeout: Duration) -> Option<u32> {
        // A channel that closes without reporting a status should not make
        // the caller sit out the full wait.
        self.wait_for(Conditions::EXIT_STATUS | Conditions::CLOSED, timeout)
            .await;
        self.state.streams.lock().unwrap().exit_status
    }

    async fn close(&self) {
        if self.requests.send(ChannelRequest::Close).await.is_err() {
            // Pump already gone; the channel is closed either way.
            self.state.mark_closed();
        }
    }
}

/// Drive the russh channel: fold its message stream into the shared state
/// and serve requests from session handles.
async fn pump(
    mut channel: Channel<Msg>,
    state: Arc<SessionState>,
    mut requests: mpsc::Receiver<ChannelRequest>,
) {
    loop {
        tokio::select! {
            msg = channel.wait() => {
                match msg {
                    Some(ChannelMsg::Data { ref data }) => {
                        state.mutate(|s| s.stdout.extend_from_slice(data));
                    }
                    Some(ChannelMsg::ExtendedData { ref data, ext }) => {
                        if ext == 1 {
                            state.mutate(|s| s.stderr.extend_from_slice(data));
                        }
                    }
                    // The status report does not mean end of communications;
                    // data may still follow it.
                    Some(ChannelMsg::ExitStatus { exit_status }) => {
                        state.mutate(|s| s.exit_status = Some(exit_status));
                    }
                    Some(ChannelMsg::Eof) => {
                        state.mutate(|s| s.eof = true);
                    }
                    Some(ChannelMsg::Close) => {
                        state.mutate(|s| s.closed = true);
                    }
                    Some(_) => {}
                    None => {
                        tracing::debug!("SSH channel ended");
                        break;
                    }
                }
            }
            req = requests.recv() => {
                match req {
                    Some(ChannelRequest::Exec { command, reply }) => {
                        let result = channel.exec(true, command.as_str()).await;
                        let _ = reply.send(result);
                    }
                    Some(ChannelRequest::RequestPty { request, reply }) => {
                        let modes = [(Pty::ECHO, u32::from(request.echo))];
                        let result = channel
                            .request_pty(
                                false,
                                &request.term,
                                request.cols,
                                request.rows,
                                request.pix_width,
                                request.pix_height,
                                &modes,
                            )
                            .await;
                        let _ = reply.send(result);
                    }
                    Some(ChannelRequest::Shell { reply }) => {
                        let result = channel.request_shell(false).await;
                        let _ = reply.send(result);
                    }
                    Some(ChannelRequest::Stdin { data, reply }) => {
                        let result = channel.data(&data[..]).await;
                        let _ = reply.send(result);
                    }
                    Some(ChannelRequest::Close) | None => {
                        if let Err(e) = channel.eof().await {
                            tracing::debug!("Failed to send EOF on close: {e}");
                        }
                        break;
                    }
                }
            }
        }
    }

    // Dropping the channel closes it on the wire; every waiter sees CLOSED.
    state.mark_closed();
}
