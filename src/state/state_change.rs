// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.

use crate::types::HvacMode;

/// Represents a change in climate state.
///
/// Changes come from two sources: telemetry decoded from the device and
/// requests made by the user. Both are applied through
/// [`ClimateState::apply`](super::ClimateState::apply) and forwarded to
/// subscribers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Operation mode changed.
    HvacMode(HvacMode),

    /// Target temperature changed, in degrees.
    TargetTemperature(f64),

    /// Measured temperature changed, in degrees.
    CurrentTemperature(f64),
}
