// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuya data points.

use crate::error::ParseError;
use crate::state::StateChange;
use crate::types::HvacMode;

/// Known data point ids of the thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataPointId {
    /// Relay power, decimal `1` (on) or `0` (off).
    Power,
    /// Target temperature, hex, doubled.
    TargetTemperature,
    /// Measured temperature, hex, doubled.
    CurrentTemperature,
}

impl DataPointId {
    /// Returns the numeric id.
    #[must_use]
    pub const fn id(&self) -> u32 {
        match self {
            Self::Power => 1,
            Self::TargetTemperature => 2,
            Self::CurrentTemperature => 3,
        }
    }

    /// Looks up a known id.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Power),
            2 => Some(Self::TargetTemperature),
            3 => Some(Self::CurrentTemperature),
            _ => None,
        }
    }
}

/// A single data point reported by the MCU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPoint {
    id: u32,
    raw_value: String,
}

impl DataPoint {
    /// Creates a data point.
    #[must_use]
    pub fn new(id: u32, raw_value: impl Into<String>) -> Self {
        Self {
            id,
            raw_value: raw_value.into(),
        }
    }

    /// Returns the numeric id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the raw `DpIdData` value.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Returns the known id, if any.
    #[must_use]
    pub fn kind(&self) -> Option<DataPointId> {
        DataPointId::from_id(self.id)
    }

    /// Maps the data point to a state change.
    ///
    /// Unknown ids yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the raw value is not a number in
    /// the base expected by the data point.
    pub fn to_state_change(&self) -> Result<Option<StateChange>, ParseError> {
        let Some(kind) = self.kind() else {
            return Ok(None);
        };

        let change = match kind {
            DataPointId::CurrentTemperature => {
                StateChange::CurrentTemperature(self.halved_hex("current temperature")?)
            }
            DataPointId::TargetTemperature => {
                StateChange::TargetTemperature(self.halved_hex("target temperature")?)
            }
            DataPointId::Power => {
                let value = self
                    .raw_value
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| self.invalid("power", &e))?;
                StateChange::HvacMode(HvacMode::from_power_value(value))
            }
        };

        Ok(Some(change))
    }

    fn halved_hex(&self, field: &str) -> Result<f64, ParseError> {
        let raw = self.raw_value.trim();
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        let value = u32::from_str_radix(digits, 16).map_err(|e| self.invalid(field, &e))?;
        Ok(f64::from(value) / 2.0)
    }

    fn invalid(&self, field: &str, err: &dyn std::fmt::Display) -> ParseError {
        ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("{:?} ({err})", self.raw_value),
        }
    }
}
