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

//! Remote file operations: stat-like records, chunked reads, removal and
//! upload, exposed on [`SshClient`].

use std::path::Path;
use std::time::Duration;

use super::fs::{EntryKind, RemoteFs};
use super::russh_fs::RusshRemoteFs;
use super::walker;
use crate::channel::{ChannelSession, Conditions, READ_BUFFER_SIZE};
use crate::client::SshClient;
use crate::error::{Error, Result};

/// How long the removal fallback waits for each `rm` to finish.
const REMOVE_FALLBACK_WAIT: Duration = Duration::from_secs(5);

/// Build a `stat`-like record for a remote file:
///
/// `mtime\tatime\t-\tpermissions\tsize\t-\tTYPE\tuid\tgid\tpath`
///
/// with permissions in octal and TYPE one of FILE, DIR, LINK, UNKNOWN.
pub async fn stat_record<F: RemoteFs + ?Sized>(fs: &F, file_path: &str) -> Result<String> {
    let attributes = fs.stat(file_path).await?;
    let file_type = match attributes.kind() {
        EntryKind::Regular => "FILE",
        EntryKind::Directory => "DIR",
        EntryKind::Symlink => "LINK",
        _ => "UNKNOWN",
    };

    Ok(format!(
        "{}\t{}\t-\t{:o}\t{}\t-\t{}\t{}\t{}\t{}",
        attributes.mtime.unwrap_or(0),
        attributes.atime.unwrap_or(0),
        attributes.permissions.unwrap_or(0) & 0o777,
        attributes.size.unwrap_or(0),
        file_type,
        attributes.uid.unwrap_or(0),
        attributes.gid.unwrap_or(0),
        fs.canonicalize(file_path).await?,
    ))
}

/// Read a remote file, or a slice of it, in 8192-byte seeked chunks.
///
/// `offset` defaults to the beginning; with no `size` the file is read
/// from the offset to its stat-reported end. Reading past the actual end
/// simply stops short.
pub async fn read_file_slice<F: RemoteFs + ?Sized>(
    fs: &F,
    remote_file_path: &str,
    offset: Option<u64>,
    size: Option<u64>,
) -> Result<String> {
    let mut offset = offset.unwrap_or(0);
    let mut remaining = match size {
        Some(size) => size,
        None => {
            let attributes = fs.stat(remote_file_path).await?;
            attributes.size.unwrap_or(0).saturating_sub(offset)
        }
    };

    let mut file = fs.open_read(remote_file_path).await?;
    let mut output = Vec::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    while remaining > 0 {
        let chunk = remaining.min(READ_BUFFER_SIZE as u64) as usize;
        let n = file.read_at(offset, &mut buffer[..chunk]).await?;
        if n == 0 {
            // End of file before the requested amount; probably asked to
            // read more than what is available.
            break;
        }
        output.extend_from_slice(&buffer[..n]);
        remaining -= n as u64;
        offset += n as u64;
    }

    Ok(String::from_utf8_lossy(&output).to_string())
}

impl SshClient {
    /// List the content of the specified remote directory.
    ///
    /// `file_mask` is a regular expression the filenames must contain a
    /// match of (compiled case-insensitive; `None` or empty lists
    /// everything). One `path;mtime;size` line is emitted per matched
    /// regular file, block device, character device or socket; symlinks are
    /// skipped, and subdirectories are walked when `include_subfolders` is
    /// set, down to 15 levels. Entries beyond that depth are silently
    /// omitted.
    pub async fn list_files(
        &mut self,
        remote_directory_path: &str,
        file_mask: Option<&str>,
        include_subfolders: bool,
    ) -> Result<String> {
        self.authenticated_transport()?;

        let mask = walker::mask_pattern(file_mask)?;
        let fs = self.open_remote_fs().await?;

        walker::walk(&fs, remote_directory_path, &mask, include_subfolders).await
    }

    /// Return information about a remote file in the format documented on
    /// [`stat_record`].
    pub async fn read_file_attributes(&mut self, file_path: &str) -> Result<String> {
        let fs = self.open_remote_fs().await?;
        stat_record(&fs, file_path).await
    }

    /// Read a remote file, or a slice of it.
    ///
    /// See [`read_file_slice`] for the offset and size semantics.
    pub async fn read_file(
        &mut self,
        remote_file_path: &str,
        offset: Option<u64>,
        size: Option<u64>,
    ) -> Result<String> {
        let fs = self.open_remote_fs().await?;
        read_file_slice(&fs, remote_file_path, offset, size).await
    }

    /// Remove files on the remote system.
    ///
    /// Tries a structured SFTP removal first; if that fails, falls back to
    /// running `/usr/bin/rm -f` over a fresh session per file, and
    /// surfaces the fallback's own error if it fails too.
    pub async fn remove_files(&mut self, remote_file_paths: &[&str]) -> Result<()> {
        // State errors fail fast and never trigger the fallback.
        self.authenticated_transport()?;

        match self.remove_files_sftp(remote_file_paths).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("SFTP removal failed ({e}); retrying with rm");
                self.remove_files_with_rm(remote_file_paths).await
            }
        }
    }

    /// Remove a single file on the remote system.
    pub async fn remove_file(&mut self, remote_file_path: &str) -> Result<()> {
        self.remove_files(&[remote_file_path]).await
    }

    /// Copy a local file to the remote host.
    pub async fn upload_file(
        &mut self,
        local_file_path: impl AsRef<Path>,
        remote_file_path: &str,
    ) -> Result<()> {
        self.authenticated_transport()?;

        let contents = tokio::fs::read(local_file_path.as_ref()).await?;
        let fs = self.open_remote_fs().await?;
        fs.put(remote_file_path, &contents).await
    }

    async fn remove_files_sftp(&mut self, remote_file_paths: &[&str]) -> Result<()> {
        let fs = self.open_remote_fs().await?;
        for path in remote_file_paths {
            fs.remove(path).await?;
        }
        Ok(())
    }

    async fn remove_files_with_rm(&mut self, remote_file_paths: &[&str]) -> Result<()> {
        for path in remote_file_paths {
            let session = self.open_channel_session().await?;
            let submitted = session
                .submit_command(&format!("/usr/bin/rm -f \"{path}\""))
                .await;
            if submitted.is_ok() {
                session
                    .wait_for(
                        Conditions::CLOSED | Conditions::EOF,
                        REMOVE_FALLBACK_WAIT,
                    )
                    .await;
            }
            session.close().await;
            submitted?;
        }
        Ok(())
    }

    async fn open_remote_fs(&self) -> Result<RusshRemoteFs> {
        let transport = self.authenticated_transport()?;
        let channel = transport
            .channel_open_session()
            .await
            .map_err(Error::Ssh)?;
        RusshRemoteFs::open(channel).await
    }
}
