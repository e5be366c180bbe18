// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `beca_climate` - Drive Tuya MCU thermostats running Tasmota as a climate entity.
//!
//! The thermostat's Tuya MCU is bridged to MQTT by Tasmota. This crate maps
//! the climate abstraction (operation mode, target temperature) onto
//! Tasmota commands and decodes the `TuyaReceived` telemetry the firmware
//! relays back.
//!
//! # Supported Features
//!
//! - **Operation mode**: Off and heat, switched through the relay
//! - **Target temperature**: Range-checked, rounded and sent as a Tuya data point
//! - **Telemetry**: Power, target and measured temperature data points
//! - **Clock sync**: MCU "set date and time" frame sent on attach
//! - **Self-update**: Release manifest check and file download (`updater` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use beca_climate::{ClimateBridge, ClimateConfig};
//! use beca_climate::protocol::MqttConfig;
//!
//! #[tokio::main]
//! async fn main() -> beca_climate::Result<()> {
//!     let config = ClimateConfig::new("tasmota_beca");
//!     let mqtt = MqttConfig::new("mqtt://192.168.1.50:1883");
//!
//!     let (bridge, inbound) = ClimateBridge::connect(config, &mqtt)?;
//!     bridge.attach(None, None).await?;
//!
//!     let telemetry = bridge.clone();
//!     tokio::spawn(async move { telemetry.run(inbound).await });
//!
//!     bridge.turn_on().await?;
//!     bridge.set_temperature(21.5).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Callbacks
//!
//! ```ignore
//! use beca_climate::subscription::Subscribable;
//!
//! bridge.on_hvac_mode_changed(|mode| println!("Mode is now {mode}"));
//! bridge.on_current_temperature_changed(|t| println!("Room at {t}"));
//! ```

pub mod climate;
pub mod command;
pub mod error;
pub mod mcu;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod telemetry;
pub mod types;
#[cfg(feature = "updater")]
pub mod updater;

pub use climate::{ClimateBridge, ClimateConfig};
pub use command::{Command, PowerCommand, SerialSendCommand, TuyaValueCommand};
pub use error::{Error, ParseError, ProtocolError, Result, UpdateError, ValueError};
pub use mcu::{HexFrame, command_chars_to_serial, encode_time_set_frame};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttClient, MqttConfig};
pub use protocol::{Publisher, RecordingPublisher};
pub use state::{ClimateState, PersistedState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{HvacMode, PowerState, Precision, TemperatureUnit};
#[cfg(feature = "updater")]
pub use updater::{Notification, UpdateOutcome, Updater, UpdaterConfig};
