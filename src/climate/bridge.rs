// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate entity bound to a Tuya MCU thermostat.

use std::sync::Arc;

use chrono::{Datelike, Local, Timelike};
use parking_lot::RwLock;
use tokio::sync::{Mutex, mpsc};

use crate::command::{PowerCommand, SerialSendCommand, TuyaValueCommand};
use crate::error::{Error, ValueError};
use crate::protocol::Publisher;
use crate::state::{ClimateState, PersistedState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::telemetry::decode_state_change;
use crate::types::{HvacMode, TemperatureUnit};

use super::ClimateConfig;

/// A thermostat exposed as a climate entity.
///
/// User requests are validated, applied to the in-memory state and turned
/// into Tasmota commands. Telemetry fed through [`handle_telemetry`] or
/// [`run`] updates the state and notifies subscribers.
///
/// Clones share state, subscriptions and the transport.
///
/// [`handle_telemetry`]: ClimateBridge::handle_telemetry
/// [`run`]: ClimateBridge::run
///
/// # Examples
///
/// ```
/// use beca_climate::{ClimateBridge, ClimateConfig};
/// use beca_climate::protocol::RecordingPublisher;
/// use beca_climate::types::HvacMode;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> beca_climate::Result<()> {
/// let publisher = RecordingPublisher::new();
/// let bridge = ClimateBridge::new(ClimateConfig::new("beca"), publisher.clone());
///
/// bridge.turn_on().await?;
/// bridge.set_temperature(21.5).await?;
///
/// assert_eq!(bridge.hvac_mode(), HvacMode::Heat);
/// assert_eq!(publisher.payloads_for("/TuyaSend2"), vec!["2,43.0"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClimateBridge<P: Publisher> {
    config: ClimateConfig,
    publisher: Arc<P>,
    state: Arc<RwLock<ClimateState>>,
    callbacks: Arc<CallbackRegistry>,
    device_lock: Arc<Mutex<()>>,
}

impl<P: Publisher> Clone for ClimateBridge<P> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            publisher: Arc::clone(&self.publisher),
            state: Arc::clone(&self.state),
            callbacks: Arc::clone(&self.callbacks),
            device_lock: Arc::clone(&self.device_lock),
        }
    }
}

impl<P: Publisher> ClimateBridge<P> {
    /// Creates a bridge in the off state, targeting the minimum temperature.
    #[must_use]
    pub fn new(config: ClimateConfig, publisher: P) -> Self {
        let state = ClimateState::new(config.min_temp());
        Self {
            config,
            publisher: Arc::new(publisher),
            state: Arc::new(RwLock::new(state)),
            callbacks: Arc::new(CallbackRegistry::new()),
            device_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClimateConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ClimateState {
        self.state.read().clone()
    }

    /// Returns the entity state string shown by the host (`"off"` or `"heat"`).
    #[must_use]
    pub fn entity_state(&self) -> &'static str {
        self.hvac_mode().as_str()
    }

    /// Returns the entity name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Returns the unique ID, if configured.
    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        self.config.unique_id()
    }

    /// Returns the minimum target temperature.
    #[must_use]
    pub fn min_temp(&self) -> f64 {
        self.config.min_temp()
    }

    /// Returns the maximum target temperature.
    #[must_use]
    pub fn max_temp(&self) -> f64 {
        self.config.max_temp()
    }

    /// Returns the target temperature increment offered to users.
    #[must_use]
    pub fn target_temperature_step(&self) -> f64 {
        self.config.precision().step()
    }

    /// Returns the temperature unit.
    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.config.temperature_unit()
    }

    /// Returns the supported operation modes.
    #[must_use]
    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &HvacMode::ALL
    }

    /// Returns the operation mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        self.state.read().hvac_mode()
    }

    /// Returns the last mode other than off, if any.
    #[must_use]
    pub fn last_on_operation(&self) -> Option<HvacMode> {
        self.state.read().last_on_operation()
    }

    /// Returns the measured temperature, if reported.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.state.read().current_temperature()
    }

    /// Returns the target temperature.
    #[must_use]
    pub fn target_temperature(&self) -> f64 {
        self.state.read().target_temperature()
    }

    /// Returns the extra attributes the host stores with the entity.
    #[must_use]
    pub fn state_attributes(&self) -> serde_json::Value {
        serde_json::json!({
            "last_on_operation": self.last_on_operation(),
        })
    }

    /// Returns the values to persist across restarts.
    #[must_use]
    pub fn persisted_state(&self) -> PersistedState {
        self.state.read().to_persisted()
    }

    /// Brings the entity online.
    ///
    /// Restores the persisted state, applies the last telemetry payload seen
    /// on the state topic and sets the device clock.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the clock frame cannot be published.
    pub async fn attach(
        &self,
        restored: Option<&PersistedState>,
        initial_telemetry: Option<&str>,
    ) -> Result<(), Error> {
        if let Some(persisted) = restored {
            tracing::debug!(?persisted, "Restoring climate state");
            self.state.write().restore(persisted);
        }

        if let Some(payload) = initial_telemetry {
            self.handle_telemetry(payload);
        }

        self.sync_clock().await
    }

    /// Sends the current local time to the MCU.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the frame cannot be published.
    pub async fn sync_clock(&self) -> Result<(), Error> {
        self.sync_clock_at(&Local::now().naive_local()).await
    }

    /// Sends the given time to the MCU.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the frame cannot be published.
    pub async fn sync_clock_at<T: Datelike + Timelike + Sync>(&self, now: &T) -> Result<(), Error> {
        let command = SerialSendCommand::time_sync(now);
        let _guard = self.device_lock.lock().await;
        self.publisher
            .send_command(self.config.mqtt_topic(), &command)
            .await?;
        Ok(())
    }

    /// Sets the target temperature.
    ///
    /// The value is rounded to the configured precision and stored. It is sent
    /// to the thermostat only while the entity is on, and the rounded value is
    /// what goes out: 21.56 with one-decimal precision is sent as `2,43.2`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TemperatureOutOfRange` if the value is outside
    /// `[min_temp, max_temp]`; the state is left untouched. Returns
    /// `Error::Protocol` if the command cannot be published.
    pub async fn set_temperature(&self, temperature: f64) -> Result<(), Error> {
        let (min, max) = (self.config.min_temp(), self.config.max_temp());
        if !(min..=max).contains(&temperature) {
            tracing::warn!(
                temperature,
                min,
                max,
                "Requested temperature is out of range"
            );
            return Err(ValueError::TemperatureOutOfRange {
                min,
                max,
                actual: temperature,
            }
            .into());
        }

        let target = self.config.precision().round(temperature);
        let _guard = self.device_lock.lock().await;

        let change = StateChange::TargetTemperature(target);
        let (changed, mode) = {
            let mut state = self.state.write();
            (state.apply(&change), state.hvac_mode())
        };
        if changed {
            self.callbacks.dispatch(&change);
        }

        if mode.is_on() {
            self.publisher
                .send_command(
                    self.config.mqtt_topic(),
                    &TuyaValueCommand::target_temperature(target),
                )
                .await?;
        }
        Ok(())
    }

    /// Sets the operation mode and switches the relay accordingly.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the command cannot be published.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), Error> {
        let _guard = self.device_lock.lock().await;

        let change = StateChange::HvacMode(mode);
        if self.state.write().apply(&change) {
            self.callbacks.dispatch(&change);
        }

        self.publisher
            .send_command(self.config.mqtt_topic(), &PowerCommand::from(mode))
            .await?;
        Ok(())
    }

    /// Turns the entity on, resuming the last mode other than off.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the command cannot be published.
    pub async fn turn_on(&self) -> Result<(), Error> {
        let mode = self.state.read().resume_mode();
        self.set_hvac_mode(mode).await
    }

    /// Turns the entity off.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the command cannot be published.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.set_hvac_mode(HvacMode::Off).await
    }

    /// Applies one telemetry payload.
    ///
    /// Returns the decoded change, whether or not it altered the state.
    /// Malformed payloads are logged and dropped.
    pub fn handle_telemetry(&self, payload: &str) -> Option<StateChange> {
        let change = match decode_state_change(payload) {
            Ok(Some(change)) => change,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(payload = %payload, error = %e, "Failed to decode telemetry");
                return None;
            }
        };

        tracing::debug!(?change, "Decoded telemetry");

        if self.state.write().apply(&change) {
            self.callbacks.dispatch(&change);
        }
        Some(change)
    }

    /// Feeds inbound telemetry to [`handle_telemetry`] until the channel closes.
    ///
    /// [`handle_telemetry`]: ClimateBridge::handle_telemetry
    pub async fn run<M: AsRef<str>>(&self, mut inbound: mpsc::Receiver<M>) {
        while let Some(message) = inbound.recv().await {
            self.handle_telemetry(message.as_ref());
        }
        tracing::debug!(name = %self.config.name(), "Telemetry channel closed");
    }
}

#[cfg(feature = "mqtt")]
impl ClimateBridge<crate::protocol::MqttClient> {
    /// Connects to the broker and subscribes to the configured state topic.
    ///
    /// Pass the returned receiver to [`run`](ClimateBridge::run). A bridge
    /// clone held by `run` keeps the connection alive; call
    /// `bridge.publisher().disconnect()` to end it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the broker URL is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn connect(
        config: ClimateConfig,
        mqtt: &crate::protocol::MqttConfig,
    ) -> Result<(Self, mpsc::Receiver<crate::protocol::InboundMessage>), Error> {
        let (client, inbound) =
            crate::protocol::MqttClient::connect(mqtt, vec![config.state_topic()])?;
        Ok((Self::new(config, client), inbound))
    }
}

impl<P: Publisher> Subscribable for ClimateBridge<P> {
    fn on_hvac_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(HvacMode) + Send + Sync + 'static,
    {
        self.callbacks.on_hvac_mode_changed(callback)
    }

    fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.callbacks.on_target_temperature_changed(callback)
    }

    fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.callbacks.on_current_temperature_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use super::*;
    use crate::protocol::RecordingPublisher;
    use crate::types::Precision;

    fn bridge() -> (ClimateBridge<RecordingPublisher>, RecordingPublisher) {
        let publisher = RecordingPublisher::new();
        let bridge = ClimateBridge::new(ClimateConfig::new("beca"), publisher.clone());
        (bridge, publisher)
    }

    #[test]
    fn initial_state() {
        let (bridge, _) = bridge();
        assert_eq!(bridge.hvac_mode(), HvacMode::Off);
        assert_eq!(bridge.entity_state(), "off");
        assert!(bridge.last_on_operation().is_none());
        assert!(bridge.current_temperature().is_none());
        assert!((bridge.target_temperature() - 5.0).abs() < f64::EPSILON);
        assert!((bridge.target_temperature_step() - 0.5).abs() < f64::EPSILON);
        assert_eq!(bridge.hvac_modes(), &[HvacMode::Off, HvacMode::Heat]);
        assert_eq!(bridge.name(), "BecaTasmota Climate");
    }

    #[tokio::test]
    async fn out_of_range_temperature_is_rejected() {
        let (bridge, publisher) = bridge();
        bridge.turn_on().await.unwrap();
        publisher.clear();

        for t in [4.5, 35.5, f64::NAN] {
            let err = bridge.set_temperature(t).await.unwrap_err();
            assert!(matches!(
                err,
                Error::Value(ValueError::TemperatureOutOfRange { .. })
            ));
        }
        assert!((bridge.target_temperature() - 5.0).abs() < f64::EPSILON);
        assert!(publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn range_bounds_are_inclusive() {
        let (bridge, _) = bridge();
        bridge.set_temperature(5.0).await.unwrap();
        bridge.set_temperature(35.0).await.unwrap();
        assert!((bridge.target_temperature() - 35.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn temperature_while_off_is_stored_not_sent() {
        let (bridge, publisher) = bridge();
        bridge.set_temperature(21.5).await.unwrap();
        assert!((bridge.target_temperature() - 21.5).abs() < f64::EPSILON);
        assert!(publisher.messages().is_empty());
    }

    #[tokio::test]
    async fn temperature_while_heating_is_sent() {
        let (bridge, publisher) = bridge();
        bridge.set_hvac_mode(HvacMode::Heat).await.unwrap();
        bridge.set_temperature(21.5).await.unwrap();

        let messages = publisher.messages();
        assert_eq!(messages.last().unwrap().topic, "beca/cmnd/TuyaSend2");
        assert_eq!(messages.last().unwrap().payload, "2,43.0");
    }

    #[tokio::test]
    async fn temperature_is_rounded_to_precision() {
        let publisher = RecordingPublisher::new();
        let bridge = ClimateBridge::new(
            ClimateConfig::new("beca").with_precision(Precision::Whole),
            publisher.clone(),
        );
        bridge.turn_on().await.unwrap();
        bridge.set_temperature(21.6).await.unwrap();

        assert!((bridge.target_temperature() - 22.0).abs() < f64::EPSILON);
        assert_eq!(publisher.payloads_for("/TuyaSend2"), vec!["2,44.0"]);
    }

    #[tokio::test]
    async fn rounded_temperature_is_what_gets_sent() {
        let (bridge, publisher) = bridge();
        bridge.turn_on().await.unwrap();
        bridge.set_temperature(21.56).await.unwrap();

        assert!((bridge.target_temperature() - 21.6).abs() < 1e-9);
        assert_eq!(publisher.payloads_for("/TuyaSend2"), vec!["2,43.2"]);
    }

    #[tokio::test]
    async fn set_hvac_mode_publishes_power() {
        let (bridge, publisher) = bridge();
        bridge.set_hvac_mode(HvacMode::Heat).await.unwrap();
        bridge.set_hvac_mode(HvacMode::Off).await.unwrap();

        assert_eq!(publisher.payloads_for("/POWER1"), vec!["on", "off"]);
        assert_eq!(bridge.last_on_operation(), Some(HvacMode::Heat));
        assert_eq!(
            bridge.state_attributes(),
            serde_json::json!({"last_on_operation": "heat"})
        );
    }

    #[tokio::test]
    async fn turn_on_resumes_heat() {
        let (bridge, publisher) = bridge();
        bridge.turn_on().await.unwrap();
        assert_eq!(bridge.hvac_mode(), HvacMode::Heat);
        bridge.turn_off().await.unwrap();
        assert_eq!(bridge.hvac_mode(), HvacMode::Off);
        assert_eq!(publisher.payloads_for("/POWER1"), vec!["on", "off"]);
    }

    #[tokio::test]
    async fn publish_failure_is_reported() {
        let (bridge, publisher) = bridge();
        publisher.set_failing(true);
        assert!(matches!(
            bridge.turn_on().await,
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn telemetry_target_temperature() {
        let (bridge, publisher) = bridge();
        let change = bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":2,"DpIdData":"2B"}}"#);
        assert_eq!(change, Some(StateChange::TargetTemperature(21.5)));
        assert!((bridge.target_temperature() - 21.5).abs() < f64::EPSILON);
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn telemetry_target_temperature_skips_range_check() {
        let (bridge, _) = bridge();
        bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":2,"DpIdData":"64"}}"#);
        assert!((bridge.target_temperature() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn telemetry_current_temperature() {
        let (bridge, _) = bridge();
        bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":3,"DpIdData":"0000002B"}}"#);
        assert_eq!(bridge.current_temperature(), Some(21.5));
    }

    #[test]
    fn telemetry_power_on() {
        let (bridge, _) = bridge();
        bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":1,"DpIdData":"1"}}"#);
        assert_eq!(bridge.hvac_mode(), HvacMode::Heat);
        assert_eq!(bridge.last_on_operation(), Some(HvacMode::Heat));
    }

    #[test]
    fn telemetry_power_is_idempotent() {
        let (bridge, _) = bridge();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        bridge.on_hvac_mode_changed(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let payload = r#"{"TuyaReceived":{"DpId":1,"DpIdData":"1"}}"#;
        bridge.handle_telemetry(payload);
        let once = bridge.state();
        bridge.handle_telemetry(payload);

        assert_eq!(bridge.state(), once);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_telemetry_is_dropped() {
        let (bridge, _) = bridge();
        let before = bridge.state();
        assert!(bridge.handle_telemetry("{\"TuyaReceived\":").is_none());
        assert!(bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":3,"DpIdData":"zz"}}"#).is_none());
        assert_eq!(bridge.state(), before);
    }

    #[test]
    fn unknown_data_point_is_ignored() {
        let (bridge, _) = bridge();
        let before = bridge.state();
        assert!(bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":101,"DpIdData":"01"}}"#).is_none());
        assert_eq!(bridge.state(), before);
    }

    #[tokio::test]
    async fn attach_restores_and_syncs_clock() {
        let (bridge, publisher) = bridge();
        let persisted = PersistedState {
            state: HvacMode::Heat,
            temperature: Some(20.0),
            last_on_operation: Some(HvacMode::Heat),
        };

        bridge
            .attach(
                Some(&persisted),
                Some(r#"{"TuyaReceived":{"DpId":3,"DpIdData":"28"}}"#),
            )
            .await
            .unwrap();

        assert_eq!(bridge.hvac_mode(), HvacMode::Heat);
        assert!((bridge.target_temperature() - 20.0).abs() < f64::EPSILON);
        assert_eq!(bridge.current_temperature(), Some(20.0));
        assert_eq!(bridge.persisted_state(), persisted);

        let frames = publisher.payloads_for("/SerialSend5");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].starts_with("55AA001C000801"));
        assert_eq!(frames[0].len(), 30);
    }

    #[tokio::test]
    async fn sync_clock_at_fixed_time() {
        let (bridge, publisher) = bridge();
        let now = NaiveDate::from_ymd_opt(2019, 2, 15)
            .unwrap()
            .and_hms_opt(16, 4, 18)
            .unwrap();
        bridge.sync_clock_at(&now).await.unwrap();

        let messages = publisher.messages();
        assert_eq!(messages[0].topic, "beca/cmnd/SerialSend5");
        assert_eq!(messages[0].payload, "55AA001C00080113020F1004120573");
    }

    #[tokio::test]
    async fn callbacks_follow_user_requests() {
        let (bridge, _) = bridge();
        let targets = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&targets);
        bridge.on_target_temperature_changed(move |t| sink.lock().push(t));

        bridge.set_temperature(19.0).await.unwrap();
        bridge.set_temperature(19.0).await.unwrap();
        bridge.handle_telemetry(r#"{"TuyaReceived":{"DpId":2,"DpIdData":"2A"}}"#);

        assert_eq!(*targets.lock(), vec![19.0, 21.0]);
    }

    #[tokio::test]
    async fn run_consumes_channel() {
        let (bridge, _) = bridge();
        let (tx, rx) = mpsc::channel::<String>(4);

        tx.send(r#"{"TuyaReceived":{"DpId":1,"DpIdData":"1"}}"#.to_string())
            .await
            .unwrap();
        tx.send("garbage".to_string()).await.unwrap();
        tx.send(r#"{"TuyaReceived":{"DpId":3,"DpIdData":"2D"}}"#.to_string())
            .await
            .unwrap();
        drop(tx);

        bridge.run(rx).await;

        assert_eq!(bridge.hvac_mode(), HvacMode::Heat);
        assert_eq!(bridge.current_temperature(), Some(22.5));
    }
}
