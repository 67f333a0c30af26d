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

//! High-level SSH client operations.
//!
//! This module is organized into several submodules:
//! - `core`: the `SshClient` facade and its connect/session state machine
//! - `auth`: authentication methods and host-key verification policy
//! - `command`: command execution with merged output and timeout
//! - `interactive`: bidirectional piping to a remote shell
//! - `io`: direct write/read operations on an open session
//! - `result`: command result handling

mod auth;
mod command;
mod core;
mod interactive;
mod io;
mod result;

// Re-export public API
pub use auth::ServerCheckMethod;
pub use command::run_command;
pub use core::SshClient;
pub use interactive::run_interactive;
pub use io::{read_output, write_text};
pub use result::CommandResult;
