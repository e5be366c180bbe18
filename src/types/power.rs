// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay power state.

use std::fmt;

use super::HvacMode;

/// Power state sent on the relay power command.
///
/// # Examples
///
/// ```
/// use beca_climate::types::{HvacMode, PowerState};
///
/// assert_eq!(PowerState::from(HvacMode::Heat).as_str(), "on");
/// assert_eq!(PowerState::from(HvacMode::Off).as_str(), "off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the command payload.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<HvacMode> for PowerState {
    fn from(mode: HvacMode) -> Self {
        Self::from(mode.is_on())
    }
}
