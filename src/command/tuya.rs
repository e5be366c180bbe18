// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuya data point commands.

use crate::command::Command;
use crate::telemetry::DataPointId;

/// Command writing a value-type data point (`TuyaSend2 <dp>,<value>`).
///
/// The thermostat stores temperatures doubled, so half-degree steps are
/// whole numbers on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuyaValueCommand {
    dp_id: u32,
    value: String,
}

impl TuyaValueCommand {
    /// Creates a command for an arbitrary data point.
    #[must_use]
    pub fn new(dp_id: u32, value: impl Into<String>) -> Self {
        Self {
            dp_id,
            value: value.into(),
        }
    }

    /// Creates the command setting the target temperature in degrees.
    #[must_use]
    pub fn target_temperature(temperature: f64) -> Self {
        Self::new(
            DataPointId::TargetTemperature.id(),
            format!("{:.1}", temperature * 2.0),
        )
    }

    /// Returns the data point id.
    #[must_use]
    pub fn dp_id(&self) -> u32 {
        self.dp_id
    }
}

impl Command for TuyaValueCommand {
    fn name(&self) -> String {
        "TuyaSend2".to_string()
    }

    fn payload(&self) -> String {
        format!("{},{}", self.dp_id, self.value)
    }
}
