// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tasmota command definitions.
//!
//! Commands are published as plain text on `<base>/cmnd/<name>`.
//!
//! # Available Commands
//!
//! | Command Type | Topic suffix | Payload | Purpose |
//! |-------------|--------------|---------|---------|
//! | [`TuyaValueCommand`] | `TuyaSend2` | `2,43.0` | Write a value data point |
//! | [`PowerCommand`] | `POWER1` | `on` / `off` | Switch the relay |
//! | [`SerialSendCommand`] | `SerialSend5` | hex frame | Raw bytes to the MCU |
//!
//! # Examples
//!
//! ```
//! use beca_climate::command::{Command, PowerCommand, TuyaValueCommand};
//! use beca_climate::types::PowerState;
//!
//! let cmd = TuyaValueCommand::target_temperature(21.5);
//! assert_eq!(cmd.name(), "TuyaSend2");
//! assert_eq!(cmd.payload(), "2,43.0");
//! assert_eq!(cmd.mqtt_topic("beca"), "beca/cmnd/TuyaSend2");
//!
//! let power = PowerCommand::new(PowerState::On);
//! assert_eq!(power.name(), "POWER1");
//! assert_eq!(power.payload(), "on");
//! ```

mod power;
mod serial;
mod tuya;

pub use power::PowerCommand;
pub use serial::SerialSendCommand;
pub use tuya::TuyaValueCommand;

/// A command that can be sent to a Tasmota device.
pub trait Command {
    /// Returns the command name, used as the topic suffix.
    fn name(&self) -> String;

    /// Returns the command payload.
    fn payload(&self) -> String;

    /// Returns the full command topic for a device base topic.
    fn mqtt_topic(&self, base_topic: &str) -> String {
        format!("{base_topic}/cmnd/{}", self.name())
    }
}
