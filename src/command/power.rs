// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay power command.

use crate::command::Command;
use crate::types::{HvacMode, PowerState};

/// Command to switch the thermostat relay.
///
/// The thermostat exposes a single relay, so the command always targets
/// `POWER1`.
///
/// # Examples
///
/// ```
/// use beca_climate::command::{Command, PowerCommand};
/// use beca_climate::types::HvacMode;
///
/// let cmd = PowerCommand::from(HvacMode::Off);
/// assert_eq!(cmd.payload(), "off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerCommand {
    state: PowerState,
}

impl PowerCommand {
    /// Creates a power command.
    #[must_use]
    pub const fn new(state: PowerState) -> Self {
        Self { state }
    }

    /// Returns the requested power state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }
}

impl From<HvacMode> for PowerCommand {
    fn from(mode: HvacMode) -> Self {
        Self::new(PowerState::from(mode))
    }
}

impl Command for PowerCommand {
    fn name(&self) -> String {
        "POWER1".to_string()
    }

    fn payload(&self) -> String {
        self.state.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_command_on() {
        let cmd = PowerCommand::new(PowerState::On);
        assert_eq!(cmd.name(), "POWER1");
        assert_eq!(cmd.payload(), "on");
    }

    #[test]
    fn power_command_from_mode() {
        assert_eq!(PowerCommand::from(HvacMode::Heat).state(), PowerState::On);
        assert_eq!(PowerCommand::from(HvacMode::Off).state(), PowerState::Off);
    }
}
