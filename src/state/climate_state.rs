// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory climate state.

use crate::types::HvacMode;

use super::{PersistedState, StateChange};

/// Tracked state of the climate entity.
///
/// The measured temperature is unknown until the device reports it. The
/// target temperature always has a value; it starts at the configured minimum.
///
/// # Examples
///
/// ```
/// use beca_climate::state::{ClimateState, StateChange};
///
/// let mut state = ClimateState::new(5.0);
/// state.apply(&StateChange::TargetTemperature(21.5));
/// assert_eq!(state.target_temperature(), 21.5);
/// assert_eq!(state.current_temperature(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateState {
    target_temperature: f64,
    hvac_mode: HvacMode,
    last_on_operation: Option<HvacMode>,
    current_temperature: Option<f64>,
}

impl ClimateState {
    /// Creates a state that is off with the given target temperature.
    #[must_use]
    pub fn new(target_temperature: f64) -> Self {
        Self {
            target_temperature,
            hvac_mode: HvacMode::Off,
            last_on_operation: None,
            current_temperature: None,
        }
    }

    /// Returns the target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    /// Returns the operation mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.hvac_mode
    }

    /// Returns the last mode other than off, if any.
    #[must_use]
    pub fn last_on_operation(&self) -> Option<HvacMode> {
        self.last_on_operation
    }

    /// Returns the measured temperature, if reported.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.current_temperature
    }

    /// Returns the mode to use when the entity is turned on.
    #[must_use]
    pub fn resume_mode(&self) -> HvacMode {
        self.last_on_operation.unwrap_or(HvacMode::Heat)
    }

    /// Sets the operation mode, remembering it when it is not off.
    pub fn set_hvac_mode(&mut self, mode: HvacMode) {
        self.hvac_mode = mode;
        if mode.is_on() {
            self.last_on_operation = Some(mode);
        }
    }

    /// Sets the target temperature.
    pub fn set_target_temperature(&mut self, temperature: f64) {
        self.target_temperature = temperature;
    }

    /// Applies a state change.
    ///
    /// Returns `true` if the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let before = self.clone();
        match *change {
            StateChange::HvacMode(mode) => self.set_hvac_mode(mode),
            StateChange::TargetTemperature(t) => self.target_temperature = t,
            StateChange::CurrentTemperature(t) => self.current_temperature = Some(t),
        }
        *self != before
    }

    /// Restores persisted values.
    ///
    /// The measured temperature is not persisted and is left untouched.
    pub fn restore(&mut self, persisted: &PersistedState) {
        self.hvac_mode = persisted.state;
        if let Some(t) = persisted.temperature {
            self.target_temperature = t;
        }
        if persisted.last_on_operation.is_some() {
            self.last_on_operation = persisted.last_on_operation;
        }
    }

    /// Returns the values the host should persist.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            state: self.hvac_mode,
            temperature: Some(self.target_temperature),
            last_on_operation: self.last_on_operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_off() {
        let state = ClimateState::new(5.0);
        assert_eq!(state.hvac_mode(), HvacMode::Off);
        assert!(state.last_on_operation().is_none());
        assert!(state.current_temperature().is_none());
        assert!((state.target_temperature() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn turning_off_keeps_last_on_operation() {
        let mut state = ClimateState::new(5.0);
        state.set_hvac_mode(HvacMode::Heat);
        state.set_hvac_mode(HvacMode::Off);
        assert_eq!(state.hvac_mode(), HvacMode::Off);
        assert_eq!(state.last_on_operation(), Some(HvacMode::Heat));
        assert_eq!(state.resume_mode(), HvacMode::Heat);
    }

    #[test]
    fn resume_mode_defaults_to_heat() {
        assert_eq!(ClimateState::new(5.0).resume_mode(), HvacMode::Heat);
    }

    #[test]
    fn apply_reports_changes() {
        let mut state = ClimateState::new(5.0);
        assert!(state.apply(&StateChange::CurrentTemperature(19.5)));
        assert!(!state.apply(&StateChange::CurrentTemperature(19.5)));
        assert!(state.apply(&StateChange::HvacMode(HvacMode::Heat)));
        assert!(!state.apply(&StateChange::HvacMode(HvacMode::Heat)));
    }

    #[test]
    fn restore_and_persist() {
        let mut state = ClimateState::new(5.0);
        state.restore(&PersistedState {
            state: HvacMode::Heat,
            temperature: Some(22.0),
            last_on_operation: Some(HvacMode::Heat),
        });
        assert_eq!(state.hvac_mode(), HvacMode::Heat);
        assert!((state.target_temperature() - 22.0).abs() < f64::EPSILON);

        let persisted = state.to_persisted();
        assert_eq!(persisted.state, HvacMode::Heat);
        assert_eq!(persisted.temperature, Some(22.0));
        assert_eq!(persisted.last_on_operation, Some(HvacMode::Heat));
    }

    #[test]
    fn restore_without_temperature_keeps_default() {
        let mut state = ClimateState::new(5.0);
        state.restore(&PersistedState {
            state: HvacMode::Off,
            temperature: None,
            last_on_operation: None,
        });
        assert!((state.target_temperature() - 5.0).abs() < f64::EPSILON);
    }
}
