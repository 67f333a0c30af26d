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

//! Remote file-system access over SFTP.
//!
//! This module is organized into several submodules:
//! - `fs`: the `RemoteFs` capability trait and file attribute model
//! - `russh_fs`: the russh-sftp backed implementation
//! - `walker`: recursive directory enumeration with type classification
//! - `operations`: stat, chunked read, remove and upload passthroughs

mod fs;
mod operations;
mod russh_fs;
mod walker;

// Re-export public API
pub use fs::{EntryKind, FileAttributes, RemoteDirEntry, RemoteFileRead, RemoteFs};
pub use operations::{read_file_slice, stat_record};
pub use russh_fs::RusshRemoteFs;
pub use walker::{walk, MAX_LIST_DEPTH};
