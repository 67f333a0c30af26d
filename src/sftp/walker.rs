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

//! Recursive remote-directory enumeration.

use std::future::Future;
use std::pin::Pin;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::fs::{EntryKind, RemoteFs};
use crate::error::Result;

/// Recursion below this depth is refused; deeper entries are silently
/// omitted from the listing, not reported as an error.
pub const MAX_LIST_DEPTH: u32 = 15;

static MATCH_EVERYTHING: Lazy<Regex> =
    Lazy::new(|| Regex::new(".*").expect("default mask pattern"));

/// Compile a caller-supplied file mask, case-insensitive. `None` or an
/// empty mask matches everything.
pub(crate) fn mask_pattern(mask: Option<&str>) -> Result<Regex> {
    match mask {
        Some(mask) if !mask.is_empty() => Ok(RegexBuilder::new(mask)
            .case_insensitive(true)
            .build()?),
        _ => Ok(MATCH_EVERYTHING.clone()),
    }
}

/// Enumerate `root`, emitting one `path;mtime;size` line per entry that is
/// not a symlink, is a regular file, block device, character device or
/// socket, and whose filename matches `mask` (a substring search; anchor
/// the pattern for exact matching).
///
/// Symlinks are skipped entirely, so cycles through symlinked directories
/// cannot occur. Directories are recursed into when `include_subfolders`
/// is set, down to depth [`MAX_LIST_DEPTH`]; they are never emitted
/// themselves.
pub async fn walk<F: RemoteFs + ?Sized>(
    fs: &F,
    root: &str,
    mask: &Regex,
    include_subfolders: bool,
) -> Result<String> {
    let mut output = String::new();
    walk_dir(fs, root.to_string(), mask, include_subfolders, 1, &mut output).await?;
    Ok(output)
}

fn walk_dir<'a, F: RemoteFs + ?Sized>(
    fs: &'a F,
    dir: String,
    mask: &'a Regex,
    include_subfolders: bool,
    depth: u32,
    output: &'a mut String,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        if depth > MAX_LIST_DEPTH {
            return Ok(());
        }

        let entries = fs.read_dir(&dir).await?;

        // Children are built as `dir + "/" + name`; a trailing separator on
        // the directory would double up.
        let dir = dir.strip_suffix('/').unwrap_or(&dir);

        for entry in entries {
            let filename = entry.filename.trim();
            if filename == "." || filename == ".." {
                continue;
            }

            let attributes = &entry.attributes;
            let path = format!("{dir}/{filename}");

            if attributes.kind() == EntryKind::Symlink {
                continue;
            }

            if attributes.is_listable_file() {
                if mask.find(filename).is_some() {
                    let mtime = attributes.mtime.unwrap_or(0);
                    let size = attributes.size.unwrap_or(0);
                    output.push_str(&format!("{path};{mtime};{size}\n"));
                }
                continue;
            }

            if attributes.kind() == EntryKind::Directory && include_subfolders {
                walk_dir(fs, path, mask, include_subfolders, depth + 1, output).await?;
            }
        }

        Ok(())
    })
}
