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

//! Direct write/read operations on the client-held session.

use std::time::Duration;

use super::core::SshClient;
use crate::channel::{transfer_available, ChannelSession, Conditions, StreamKind};
use crate::error::{Error, Result};

/// Write text to the remote standard input of a session, normalizing line
/// breaks of any flavor to a single `'\n'`. Empty text is a no-op.
pub async fn write_text<S: ChannelSession + ?Sized>(session: &S, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    session.send_stdin(normalized.as_bytes()).await
}

/// Read stdout and stderr from a session after a single bounded wait.
///
/// Waits up to `timeout` seconds (strictly positive, rejected otherwise
/// before any I/O) for data, end-of-input or closure, then drains what is
/// available: stdout first, up to `size` bytes, then stderr with the
/// remaining budget. `size <= 0` means everything available.
///
/// Returns `Ok(None)` when neither stream had data within the timeout.
pub async fn read_output<S: ChannelSession + ?Sized>(
    session: &S,
    size: i32,
    timeout: i32,
) -> Result<Option<String>> {
    if timeout <= 0 {
        return Err(Error::InvalidArgument {
            name: "timeout",
            value: timeout as i64,
        });
    }

    let conditions = session
        .wait_for(
            Conditions::STDOUT_DATA
                | Conditions::STDERR_DATA
                | Conditions::EOF
                | Conditions::CLOSED,
            Duration::from_secs(timeout as u64),
        )
        .await;

    let stdout_data = conditions.has_stdout_data();
    let stderr_data = conditions.has_stderr_data();

    let mut output: Vec<u8> = Vec::new();

    let mut stdout_read: i64 = 0;
    if stdout_data {
        stdout_read =
            transfer_available(session, StreamKind::Stdout, &mut output, size as i64)? as i64;
        if size > 0 && stdout_read >= size as i64 {
            return Ok(Some(String::from_utf8_lossy(&output).to_string()));
        }
    }

    // Budget left over from stdout (unbounded when size <= 0).
    if stderr_data {
        transfer_available(
            session,
            StreamKind::Stderr,
            &mut output,
            size as i64 - stdout_read,
        )?;
    }

    if stdout_data || stderr_data {
        Ok(Some(String::from_utf8_lossy(&output).to_string()))
    } else {
        Ok(None)
    }
}

impl SshClient {
    /// Write text to the remote standard input of the current session.
    ///
    /// Line breaks of any flavor are written as a single `'\n'`. Empty
    /// text is a no-op.
    pub async fn write(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        self.authenticated_transport()?;
        write_text(self.session()?, text).await
    }

    /// Read stdout and stderr from the current session.
    ///
    /// See [`read_output`] for the wait and budget semantics.
    pub async fn read(&mut self, size: i32, timeout: i32) -> Result<Option<String>> {
        if timeout <= 0 {
            return Err(Error::InvalidArgument {
                name: "timeout",
                value: timeout as i64,
            });
        }

        self.authenticated_transport()?;
        read_output(self.session()?, size, timeout).await
    }
}
