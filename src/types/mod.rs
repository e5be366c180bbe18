// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for thermostat control.
//!
//! # Types
//!
//! - [`HvacMode`] - Operation mode of the climate entity (off/heat)
//! - [`PowerState`] - On/Off payload for the relay power command
//! - [`Precision`] - Rounding applied to requested target temperatures
//! - [`TemperatureUnit`] - Unit reported to the host

mod hvac;
mod power;
mod temperature;

pub use hvac::HvacMode;
pub use power::PowerState;
pub use temperature::{Precision, TemperatureUnit};
