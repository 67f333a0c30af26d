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

//! Session-oriented SSH client library.
//!
//! The entry point is [`SshClient`]: connect, authenticate, then execute
//! commands, pump an interactive shell, or enumerate remote directories.
//! The transport and cryptography are provided by russh; this crate layers
//! the session orchestration on top:
//!
//! * command execution with merged stdout/stderr and timeout-as-data,
//! * bidirectional interactive piping with a background stdin forwarder,
//! * recursive SFTP directory listing with file-type classification.
//!
//! The channel and remote file-system providers are consumed through the
//! [`channel::ChannelSession`] and [`sftp::RemoteFs`] traits, so the polling
//! and walking logic can be exercised against in-memory fakes.

pub mod channel;
pub mod client;
pub mod error;
pub mod sftp;

pub use client::{CommandResult, ServerCheckMethod, SshClient};
pub use error::Error;
