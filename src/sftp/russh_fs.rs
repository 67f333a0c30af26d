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

//! russh-sftp backed [`RemoteFs`].

use std::io::SeekFrom;

use async_trait::async_trait;
use russh::client::Msg;
use russh::Channel;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use super::fs::{FileAttributes, RemoteDirEntry, RemoteFileRead, RemoteFs};
use crate::error::Result;

/// Remote file-system access over an `sftp` subsystem channel.
pub struct RusshRemoteFs {
    sftp: SftpSession,
}

impl RusshRemoteFs {
    /// Start an SFTP session on a freshly opened channel.
    ///
    /// Some sshd_config does not enable sftp by default; a line like
    /// `Subsystem sftp internal-sftp` is needed on the remote machine.
    pub async fn open(channel: Channel<Msg>) -> Result<Self> {
        channel.request_subsystem(true, "sftp").await?;
        let sftp = SftpSession::new(channel.into_stream()).await?;
        Ok(Self { sftp })
    }

    /// Create (or truncate) a remote file with the given contents.
    pub async fn put(&self, path: &str, contents: &[u8]) -> Result<()> {
        let mut file = self
            .sftp
            .open_with_flags(
                path,
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            )
            .await?;
        file.write_all(contents).await?;
        file.flush().await?;
        file.shutdown().await?;
        Ok(())
    }
}

fn convert_attributes(attributes: &russh_sftp::protocol::FileAttributes) -> FileAttributes {
    FileAttributes {
        permissions: attributes.permissions,
        size: attributes.size,
        uid: attributes.uid,
        gid: attributes.gid,
        atime: attributes.atime,
        mtime: attributes.mtime,
    }
}

#[async_trait]
impl RemoteFs for RusshRemoteFs {
    async fn stat(&self, path: &str) -> Result<FileAttributes> {
        let attributes = self.sftp.metadata(path).await?;
        Ok(convert_attributes(&attributes))
    }

    async fn canonicalize(&self, path: &str) -> Result<String> {
        Ok(self.sftp.canonicalize(path).await?)
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteDirEntry>> {
        let entries = self.sftp.read_dir(path).await?;
        Ok(entries
            .map(|entry| RemoteDirEntry {
                filename: entry.file_name(),
                attributes: convert_attributes(&entry.metadata()),
            })
            .collect())
    }

    async fn open_read(&self, path: &str) -> Result<Box<dyn RemoteFileRead>> {
        let file = self.sftp.open_with_flags(path, OpenFlags::READ).await?;
        Ok(Box::new(RusshRemoteFile { file }))
    }

    async fn remove(&self, path: &str) -> Result<()> {
        Ok(self.sftp.remove_file(path).await?)
    }
}

struct RusshRemoteFile {
    file: russh_sftp::client::fs::File,
}

#[async_trait]
impl RemoteFileRead for RusshRemoteFile {
    async fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(offset)).await?;
        Ok(self.file.read(buf).await?)
    }
}
