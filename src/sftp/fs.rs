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

use async_trait::async_trait;

use crate::error::Result;

/// What a directory entry is, derived from its permission bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    Symlink,
    BlockDevice,
    CharDevice,
    Socket,
    Other,
}

/// SFTPv3-shaped file attributes; every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttributes {
    /// Permission bits including the file-type bits (`S_IFMT`).
    pub permissions: Option<u32>,
    pub size: Option<u64>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    /// Access time, seconds since the epoch.
    pub atime: Option<u32>,
    /// Modification time, seconds since the epoch.
    pub mtime: Option<u32>,
}

impl FileAttributes {
    /// Classify this entry from its permission bits.
    pub fn kind(&self) -> EntryKind {
        const S_IFMT: u32 = 0o170000;
        match self.permissions.map(|permissions| permissions & S_IFMT) {
            Some(0o100000) => EntryKind::Regular,
            Some(0o040000) => EntryKind::Directory,
            Some(0o120000) => EntryKind::Symlink,
            Some(0o060000) => EntryKind::BlockDevice,
            Some(0o020000) => EntryKind::CharDevice,
            Some(0o140000) => EntryKind::Socket,
            _ => EntryKind::Other,
        }
    }

    /// True for the kinds a directory listing reports as files:
    /// regular files, block devices, character devices and sockets.
    pub fn is_listable_file(&self) -> bool {
        matches!(
            self.kind(),
            EntryKind::Regular | EntryKind::BlockDevice | EntryKind::CharDevice | EntryKind::Socket
        )
    }
}

/// One entry from a remote directory listing.
#[derive(Debug, Clone)]
pub struct RemoteDirEntry {
    pub filename: String,
    pub attributes: FileAttributes,
}

/// A remote file opened for reading.
#[async_trait]
pub trait RemoteFileRead: Send {
    /// Read up to `buf.len()` bytes starting at `offset`. Returns the
    /// number of bytes read; 0 at end of file.
    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;
}

/// The remote file-system capability consumed by the directory walker and
/// the file passthroughs.
///
/// The production implementation is [`RusshRemoteFs`](super::RusshRemoteFs);
/// tests substitute an in-memory tree.
#[async_trait]
pub trait RemoteFs: Send + Sync {
    /// Attributes of the file at `path` (following symlinks).
    async fn stat(&self, path: &str) -> Result<FileAttributes>;

    /// The canonical absolute form of `path`.
    async fn canonicalize(&self, path: &str) -> Result<String>;

    /// Entries of the directory at `path`, `.`/`..` included or not at the
    /// provider's discretion (the walker skips them either way).
    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteDirEntry>>;

    /// Open the file at `path` for reading.
    async fn open_read(&self, path: &str) -> Result<Box<dyn RemoteFileRead>>;

    /// Remove the file at `path`.
    async fn remove(&self, path: &str) -> Result<()>;
}
