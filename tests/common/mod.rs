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

//! In-memory fakes for the channel and remote file-system capability
//! traits, used to exercise the polling, execution and walking logic
//! without a transport.

#![allow(dead_code)]

/// Route library tracing to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sshkit::channel::{ChannelSession, Conditions, StreamKind, TerminalRequest};
use sshkit::error::Result;
use sshkit::sftp::{FileAttributes, RemoteDirEntry, RemoteFileRead, RemoteFs};
use sshkit::Error;

/// One scripted wake of [`FakeSession::wait_for`]: the bytes that become
/// available and the conditions reported.
pub struct Step {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub conditions: Conditions,
}

impl Step {
    pub fn stdout(data: &[u8], conditions: Conditions) -> Self {
        Self {
            stdout: data.to_vec(),
            stderr: Vec::new(),
            conditions,
        }
    }

    pub fn stderr(data: &[u8], conditions: Conditions) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: data.to_vec(),
            conditions,
        }
    }

    pub fn bare(conditions: Conditions) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            conditions,
        }
    }
}

#[derive(Default)]
struct FakeState {
    steps: VecDeque<Step>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    closed: bool,
    stdin: Vec<u8>,
    submitted: Vec<String>,
    terminal_requested: bool,
    shell_started: bool,
    close_calls: usize,
}

/// A scripted, transport-free [`ChannelSession`].
///
/// Each `wait_for` call consumes one scripted step; once the script is
/// exhausted the session behaves like a silent channel (sleeps out the
/// wait and reports `TIMEOUT`), unless it has been closed, in which case
/// it reports `CLOSED` immediately.
#[derive(Default)]
pub struct FakeSession {
    state: Mutex<FakeState>,
    pub exit_status: Option<u32>,
}

impl FakeSession {
    pub fn scripted(steps: Vec<Step>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                steps: steps.into(),
                ..Default::default()
            }),
            exit_status: None,
        }
    }

    pub fn with_exit_status(mut self, status: u32) -> Self {
        self.exit_status = Some(status);
        self
    }

    pub fn stdin_bytes(&self) -> Vec<u8> {
        self.state.lock().unwrap().stdin.clone()
    }

    pub fn submitted_commands(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn close_calls(&self) -> usize {
        self.state.lock().unwrap().close_calls
    }

    pub fn terminal_requested(&self) -> bool {
        self.state.lock().unwrap().terminal_requested
    }

    pub fn shell_started(&self) -> bool {
        self.state.lock().unwrap().shell_started
    }
}

#[async_trait]
impl ChannelSession for FakeSession {
    async fn submit_command(&self, command: &str) -> Result<()> {
        self.state.lock().unwrap().submitted.push(command.to_string());
        Ok(())
    }

    async fn request_terminal(&self, _request: &TerminalRequest) -> Result<()> {
        self.state.lock().unwrap().terminal_requested = true;
        Ok(())
    }

    async fn start_shell(&self) -> Result<()> {
        self.state.lock().unwrap().shell_started = true;
        Ok(())
    }

    async fn wait_for(&self, _interest: Conditions, timeout: Duration) -> Conditions {
        // Scripted wakes are delivered before closure is reported, the way
        // a real channel surfaces pending events ahead of its close.
        let step = {
            let mut state = self.state.lock().unwrap();
            match state.steps.pop_front() {
                Some(step) => {
                    state.stdout.extend_from_slice(&step.stdout);
                    state.stderr.extend_from_slice(&step.stderr);
                    Some(step.conditions)
                }
                None if state.closed => Some(Conditions::CLOSED),
                None => None,
            }
        };

        match step {
            Some(conditions) => conditions,
            None => {
                // Script exhausted: nothing will ever arrive, but honor the
                // closed flag so a concurrent close is observed.
                let poll = Duration::from_millis(10);
                let mut waited = Duration::ZERO;
                while waited < timeout {
                    let slice = poll.min(timeout - waited);
                    tokio::time::sleep(slice).await;
                    waited += slice;
                    if self.state.lock().unwrap().closed {
                        return Conditions::CLOSED;
                    }
                }
                Conditions::TIMEOUT
            }
        }
    }

    fn drain(&self, stream: StreamKind, buf: &mut [u8]) -> usize {
        let mut state = self.state.lock().unwrap();
        let data = match stream {
            StreamKind::Stdout => &mut state.stdout,
            StreamKind::Stderr => &mut state.stderr,
        };
        let n = buf.len().min(data.len());
        buf[..n].copy_from_slice(&data[..n]);
        data.drain(..n);
        n
    }

    async fn send_stdin(&self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(Error::ChannelClosed);
        }
        state.stdin.extend_from_slice(data);
        Ok(())
    }

    async fn exit_status(&self, _timeout: Duration) -> Option<u32> {
        self.exit_status
    }

    async fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        state.close_calls += 1;
    }
}

/// An in-memory directory tree implementing [`RemoteFs`].
#[derive(Default)]
pub struct FakeFs {
    pub dirs: HashMap<String, Vec<RemoteDirEntry>>,
    pub files: HashMap<String, Vec<u8>>,
}

impl FakeFs {
    pub fn add_dir(&mut self, path: &str, entries: Vec<RemoteDirEntry>) {
        self.dirs.insert(path.to_string(), entries);
    }
}

pub fn dir_entry(filename: &str, permissions: u32, mtime: u32, size: u64) -> RemoteDirEntry {
    RemoteDirEntry {
        filename: filename.to_string(),
        attributes: FileAttributes {
            permissions: Some(permissions),
            size: Some(size),
            mtime: Some(mtime),
            ..Default::default()
        },
    }
}

struct FakeFile {
    contents: Vec<u8>,
}

#[async_trait]
impl RemoteFileRead for FakeFile {
    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let offset = offset.min(self.contents.len() as u64) as usize;
        let n = buf.len().min(self.contents.len() - offset);
        buf[..n].copy_from_slice(&self.contents[offset..offset + n]);
        Ok(n)
    }
}

#[async_trait]
impl RemoteFs for FakeFs {
    async fn stat(&self, path: &str) -> Result<FileAttributes> {
        if let Some(contents) = self.files.get(path) {
            return Ok(FileAttributes {
                permissions: Some(0o100644),
                size: Some(contents.len() as u64),
                ..Default::default()
            });
        }
        if self.dirs.contains_key(path) {
            return Ok(FileAttributes {
                permissions: Some(0o040755),
                ..Default::default()
            });
        }
        Err(not_found(path))
    }

    async fn canonicalize(&self, path: &str) -> Result<String> {
        Ok(path.to_string())
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteDirEntry>> {
        self.dirs.get(path).cloned().ok_or_else(|| not_found(path))
    }

    async fn open_read(&self, path: &str) -> Result<Box<dyn RemoteFileRead>> {
        let contents = self.files.get(path).cloned().ok_or_else(|| not_found(path))?;
        Ok(Box::new(FakeFile { contents }))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        if self.files.contains_key(path) {
            Ok(())
        } else {
            Err(not_found(path))
        }
    }
}

fn not_found(path: &str) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no such path: {path}"),
    ))
}
