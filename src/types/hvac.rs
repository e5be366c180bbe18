// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC operation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operation mode of the thermostat.
///
/// The Beca thermostats handled by this crate only heat, so the mode is
/// either [`HvacMode::Off`] or [`HvacMode::Heat`].
///
/// # Examples
///
/// ```
/// use beca_climate::types::HvacMode;
///
/// let mode: HvacMode = "heat".parse().unwrap();
/// assert_eq!(mode, HvacMode::Heat);
/// assert_eq!(mode.as_str(), "heat");
/// assert!(mode.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    /// The thermostat is switched off.
    #[default]
    Off,
    /// The thermostat is heating towards its target temperature.
    Heat,
}

impl HvacMode {
    /// All supported modes, `Off` first.
    pub const ALL: [HvacMode; 2] = [HvacMode::Off, HvacMode::Heat];

    /// Returns the host string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
        }
    }

    /// Returns `true` for every mode except [`HvacMode::Off`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Maps the Tuya power data point value to a mode.
    ///
    /// `1` means heating, any other value means off.
    #[must_use]
    pub const fn from_power_value(value: u32) -> Self {
        if value == 1 { Self::Heat } else { Self::Off }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            _ => Err(ValueError::InvalidHvacMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hvac_mode_from_str() {
        assert_eq!("off".parse::<HvacMode>().unwrap(), HvacMode::Off);
        assert_eq!("HEAT".parse::<HvacMode>().unwrap(), HvacMode::Heat);
    }

    #[test]
    fn hvac_mode_from_str_unsupported() {
        let result = "cool".parse::<HvacMode>();
        assert!(matches!(result, Err(ValueError::InvalidHvacMode(_))));
    }

    #[test]
    fn hvac_mode_from_power_value() {
        assert_eq!(HvacMode::from_power_value(1), HvacMode::Heat);
        assert_eq!(HvacMode::from_power_value(0), HvacMode::Off);
        assert_eq!(HvacMode::from_power_value(2), HvacMode::Off);
    }

    #[test]
    fn hvac_mode_serde_uses_host_names() {
        assert_eq!(serde_json::to_string(&HvacMode::Heat).unwrap(), "\"heat\"");
        let mode: HvacMode = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(mode, HvacMode::Off);
    }

    #[test]
    fn hvac_mode_is_on() {
        assert!(!HvacMode::Off.is_on());
        assert!(HvacMode::Heat.is_on());
    }
}
