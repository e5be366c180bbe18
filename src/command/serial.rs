// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw serial command.

use chrono::{Datelike, Timelike};

use crate::command::Command;
use crate::mcu;

/// Command forwarding a hex frame to the MCU serial port (`SerialSend5`).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use beca_climate::command::{Command, SerialSendCommand};
///
/// let now = NaiveDate::from_ymd_opt(2019, 2, 15).unwrap().and_hms_opt(16, 4, 18).unwrap();
/// let cmd = SerialSendCommand::time_sync(&now);
/// assert_eq!(cmd.name(), "SerialSend5");
/// assert_eq!(cmd.payload(), "55AA001C00080113020F1004120573");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSendCommand {
    frame: String,
}

impl SerialSendCommand {
    /// Creates a command carrying an already encoded frame.
    #[must_use]
    pub fn new(frame: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
        }
    }

    /// Creates the clock synchronisation command for the given moment.
    #[must_use]
    pub fn time_sync<T: Datelike + Timelike>(now: &T) -> Self {
        Self::new(mcu::encode_time_set_frame(now))
    }

    /// Creates the clock synchronisation command for the current local time.
    #[must_use]
    pub fn time_sync_now() -> Self {
        Self::new(mcu::encode_time_set_frame_now())
    }
}

impl Command for SerialSendCommand {
    fn name(&self) -> String {
        "SerialSend5".to_string()
    }

    fn payload(&self) -> String {
        self.frame.clone()
    }
}
