// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate entity configuration.

use serde::Deserialize;

use crate::error::{Error, ValueError};
use crate::types::{Precision, TemperatureUnit};

/// Default entity name.
pub const DEFAULT_NAME: &str = "BecaTasmota Climate";

/// Configuration of one thermostat.
///
/// Only the device base topic is required. Commands go to
/// `<mqtt_topic>/cmnd/<command>`; telemetry is read from `state_topic`,
/// which defaults to `<mqtt_topic>/tele/RESULT`.
///
/// # Examples
///
/// ```
/// use beca_climate::ClimateConfig;
/// use beca_climate::types::Precision;
///
/// let config = ClimateConfig::new("tasmota_beca")
///     .with_name("Living Room")
///     .with_unique_id("beca_living_room")
///     .with_precision(Precision::Halves);
///
/// assert_eq!(config.state_topic(), "tasmota_beca/tele/RESULT");
/// assert_eq!(config.min_temp(), 5.0);
/// assert_eq!(config.max_temp(), 35.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClimateConfig {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    unique_id: Option<String>,
    mqtt_topic: String,
    #[serde(default)]
    state_topic: Option<String>,
    #[serde(default = "default_min_temp")]
    min_temp: f64,
    #[serde(default = "default_max_temp")]
    max_temp: f64,
    #[serde(default)]
    precision: Precision,
    #[serde(default)]
    temperature_unit: TemperatureUnit,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_min_temp() -> f64 {
    5.0
}

fn default_max_temp() -> f64 {
    35.0
}

impl ClimateConfig {
    /// Creates a configuration for the device with the given base topic.
    #[must_use]
    pub fn new(mqtt_topic: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            unique_id: None,
            mqtt_topic: mqtt_topic.into(),
            state_topic: None,
            min_temp: default_min_temp(),
            max_temp: default_max_temp(),
            precision: Precision::default(),
            temperature_unit: TemperatureUnit::default(),
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` for malformed JSON and `Error::Value` if the
    /// temperature range is empty.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(crate::error::ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the temperature range is usable.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidRange` if `min_temp > max_temp` or either
    /// bound is not a number.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.min_temp <= self.max_temp {
            Ok(())
        } else {
            Err(ValueError::InvalidRange {
                min: self.min_temp,
                max: self.max_temp,
            })
        }
    }

    /// Sets the entity name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the unique ID.
    #[must_use]
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Sets the telemetry topic.
    #[must_use]
    pub fn with_state_topic(mut self, topic: impl Into<String>) -> Self {
        self.state_topic = Some(topic.into());
        self
    }

    /// Sets the accepted target temperature range.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidRange` if `min > max`.
    pub fn with_temperature_range(mut self, min: f64, max: f64) -> Result<Self, ValueError> {
        self.min_temp = min;
        self.max_temp = max;
        self.validate()?;
        Ok(self)
    }

    /// Sets the target temperature precision.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the temperature unit.
    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Returns the entity name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique ID, if configured.
    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Returns the device base topic.
    #[must_use]
    pub fn mqtt_topic(&self) -> &str {
        &self.mqtt_topic
    }

    /// Returns the telemetry topic.
    #[must_use]
    pub fn state_topic(&self) -> String {
        self.state_topic
            .clone()
            .unwrap_or_else(|| format!("{}/tele/RESULT", self.mqtt_topic))
    }

    /// Returns the minimum target temperature.
    #[must_use]
    pub fn min_temp(&self) -> f64 {
        self.min_temp
    }

    /// Returns the maximum target temperature.
    #[must_use]
    pub fn max_temp(&self) -> f64 {
        self.max_temp
    }

    /// Returns the target temperature precision.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Returns the temperature unit.
    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.temperature_unit
    }
}
