// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature precision and units.

use serde::{Deserialize, Serialize};

/// Precision of the target temperature.
///
/// The step advertised to the host is the precision value. Requested
/// temperatures are rounded to whole degrees for [`Precision::Whole`] and to
/// one decimal otherwise. Ties go to the even neighbour, so 22.5 becomes 22.
///
/// # Examples
///
/// ```
/// use beca_climate::types::Precision;
///
/// assert_eq!(Precision::Halves.step(), 0.5);
/// assert_eq!(Precision::Whole.round(21.6), 22.0);
/// assert_eq!(Precision::Halves.round(21.54), 21.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 0.1 degree steps.
    Tenths,
    /// 0.5 degree steps.
    #[default]
    Halves,
    /// 1 degree steps.
    Whole,
}

impl Precision {
    /// Returns the step size in degrees.
    #[must_use]
    pub const fn step(&self) -> f64 {
        match self {
            Self::Tenths => 0.1,
            Self::Halves => 0.5,
            Self::Whole => 1.0,
        }
    }

    /// Rounds a requested temperature.
    #[must_use]
    pub fn round(&self, temperature: f64) -> f64 {
        match self {
            Self::Whole => temperature.round_ties_even(),
            Self::Tenths | Self::Halves => (temperature * 10.0).round_ties_even() / 10.0,
        }
    }
}

/// Temperature unit reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    #[serde(rename = "°C")]
    Celsius,
    /// Degrees Fahrenheit.
    #[serde(rename = "°F")]
    Fahrenheit,
}
