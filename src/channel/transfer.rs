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

use std::io::Write;

use super::{ChannelSession, StreamKind};

/// Buffer size for channel stream relays.
/// - 8KB matches typical SSH channel window sizes
/// - Each chunk is flushed before the next read to keep interactive
///   output responsive
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

/// Relay bytes already available on `stream` into `sink`.
///
/// Stops when the stream reports no more immediately-available bytes, or
/// when `max_bytes` (if positive) have been moved; `max_bytes <= 0` means
/// no cap. The copy is an exact prefix of the stream: at most
/// `min(available, max_bytes)` bytes are consumed.
///
/// This never blocks waiting for new data to arrive; availability must
/// already have been established by the caller, typically through
/// [`ChannelSession::wait_for`]. A short read is not an error; only sink
/// failures are propagated.
///
/// Returns the total number of bytes moved.
pub fn transfer_available<S: ChannelSession + ?Sized>(
    session: &S,
    stream: StreamKind,
    sink: &mut dyn Write,
    max_bytes: i64,
) -> std::io::Result<u64> {
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let chunk = if max_bytes > 0 {
            let remaining = (max_bytes as u64).saturating_sub(total);
            if remaining == 0 {
                break;
            }
            remaining.min(READ_BUFFER_SIZE as u64) as usize
        } else {
            READ_BUFFER_SIZE
        };

        let n = session.drain(stream, &mut buffer[..chunk]);
        if n == 0 {
            break;
        }

        sink.write_all(&buffer[..n])?;
        sink.flush()?;
        total += n as u64;
    }

    Ok(total)
}
