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

use std::io;

/// Error type for SSH client operations.
///
/// State and argument errors are raised before any I/O is attempted; the
/// caller must fix the call order or the argument. Transport errors carry
/// the underlying failure unmodified. Command timeouts are NOT errors: they
/// are reported through [`CommandResult`](crate::CommandResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation attempted before `connect`.
    #[error("Connection is required first")]
    NotConnected,

    /// Operation attempted before successful authentication.
    #[error("Authentication is required first")]
    NotAuthenticated,

    /// Operation attempted before `open_session`.
    #[error("SSH session should be opened first")]
    SessionNotOpened,

    /// A numeric argument that must be strictly positive was not.
    #[error("{name}={value} must not be negative or zero")]
    InvalidArgument { name: &'static str, value: i64 },

    /// The session's channel task is gone (closed or transport dropped).
    #[error("SSH channel is closed")]
    ChannelClosed,

    /// The server's host key did not pass the configured check.
    #[error("Server key verification failed")]
    ServerCheckFailed,

    /// Connection attempt did not complete within the requested timeout.
    #[error("Connection timed out after {0} ms")]
    ConnectTimeout(u64),

    /// An invalid file-mask pattern was supplied to a directory listing.
    #[error("Invalid file mask pattern: {0}")]
    InvalidMask(#[from] regex::Error),

    /// SSH error from russh.
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// SFTP error from russh-sftp.
    #[error("SFTP error: {0}")]
    Sftp(#[from] russh_sftp::client::error::Error),

    /// Invalid private key material.
    #[error("Invalid key: {0}")]
    KeyInvalid(#[from] russh::keys::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for SSH client operations.
pub type Result<T> = std::result::Result<T, Error>;
