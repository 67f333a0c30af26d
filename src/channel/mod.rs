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

//! Channel I/O multiplexing: condition polling, bounded transfers and the
//! drain loop shared by command execution and interactive sessions.
//!
//! This module is organized into several submodules:
//! - `conditions`: the set of observable facts about a live channel
//! - `session`: the `ChannelSession` capability trait consumed by the loop
//! - `transfer`: bounded/unbounded relay of already-available bytes
//! - `poll`: the condition-wait/drain cycle with per-wait ceiling
//! - `russh_session`: the russh-backed `ChannelSession` implementation

mod conditions;
mod poll;
mod russh_session;
mod session;
mod transfer;

pub(crate) use transfer::READ_BUFFER_SIZE;

// Re-export public API
pub use conditions::Conditions;
pub use poll::{drain_until_done, PollOutcome, POLL_WAIT};
pub use russh_session::RemoteSession;
pub use session::{ChannelSession, StreamKind, TerminalRequest};
pub use transfer::transfer_available;
