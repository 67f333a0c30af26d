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

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of independently observable facts about a channel at a point in
/// time, as returned by [`ChannelSession::wait_for`].
///
/// Several facts may hold in the same observation (e.g. buffered stdout data
/// together with EOF). `CLOSED` and `EOF` are terminal for the polling loop
/// regardless of which other bits accompany them.
///
/// [`ChannelSession::wait_for`]: super::ChannelSession::wait_for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Conditions(u32);

impl Conditions {
    /// Bytes are buffered and readable on standard output.
    pub const STDOUT_DATA: Conditions = Conditions(1 << 0);
    /// Bytes are buffered and readable on standard error.
    pub const STDERR_DATA: Conditions = Conditions(1 << 1);
    /// The remote side sent end-of-input; no further data will arrive.
    pub const EOF: Conditions = Conditions(1 << 2);
    /// The channel is closed.
    pub const CLOSED: Conditions = Conditions(1 << 3);
    /// The wait expired before any requested fact became true.
    pub const TIMEOUT: Conditions = Conditions(1 << 4);
    /// The remote command's exit status has been reported.
    pub const EXIT_STATUS: Conditions = Conditions(1 << 5);

    /// The empty set.
    pub const fn empty() -> Self {
        Conditions(0)
    }

    /// True if no fact is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every fact in `other` is also in `self`.
    pub const fn contains(self, other: Conditions) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if at least one fact in `other` is also in `self`.
    pub const fn intersects(self, other: Conditions) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn has_stdout_data(self) -> bool {
        self.intersects(Self::STDOUT_DATA)
    }

    pub const fn has_stderr_data(self) -> bool {
        self.intersects(Self::STDERR_DATA)
    }

    pub const fn is_eof(self) -> bool {
        self.intersects(Self::EOF)
    }

    pub const fn is_closed(self) -> bool {
        self.intersects(Self::CLOSED)
    }

    pub const fn timed_out(self) -> bool {
        self.intersects(Self::TIMEOUT)
    }

    pub const fn has_exit_status(self) -> bool {
        self.intersects(Self::EXIT_STATUS)
    }

    /// The polling loop stops on either of these.
    pub const fn is_terminal(self) -> bool {
        self.is_eof() || self.is_closed()
    }
}

impl BitOr for Conditions {
    type Output = Conditions;

    fn bitor(self, rhs: Conditions) -> Conditions {
        Conditions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Conditions {
    fn bitor_assign(&mut self, rhs: Conditions) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Conditions {
    type Output = Conditions;

    fn bitand(self, rhs: Conditions) -> Conditions {
        Conditions(self.0 & rhs.0)
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.has_stdout_data() {
            names.push("STDOUT_DATA");
        }
        if self.has_stderr_data() {
            names.push("STDERR_DATA");
        }
        if self.is_eof() {
            names.push("EOF");
        }
        if self.is_closed() {
            names.push("CLOSED");
        }
        if self.timed_out() {
            names.push("TIMEOUT");
        }
        if self.has_exit_status() {
            names.push("EXIT_STATUS");
        }
        write!(f, "{}", names.join("|"))
    }
}
