// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate entity for Tuya MCU thermostats.
//!
//! The thermostat has two operation modes, off and heat:
//!
//! ```text
//!            turn_on / DpId 1 = 1
//!     Off  ------------------------>  Heat
//!          <------------------------
//!            turn_off / DpId 1 = 0
//! ```
//!
//! Outbound requests become Tasmota commands on `<mqtt_topic>/cmnd/...`;
//! inbound `TuyaReceived` telemetry updates the state and notifies
//! subscribers.
//!
//! # Example
//!
//! ```no_run
//! use beca_climate::{ClimateBridge, ClimateConfig};
//! use beca_climate::protocol::MqttConfig;
//!
//! # async fn example() -> beca_climate::Result<()> {
//! let config = ClimateConfig::new("tasmota_beca").with_name("Living Room");
//! let mqtt = MqttConfig::new("mqtt://192.168.1.50:1883");
//!
//! let (bridge, inbound) = ClimateBridge::connect(config, &mqtt)?;
//! bridge.attach(None, None).await?;
//!
//! let telemetry = bridge.clone();
//! tokio::spawn(async move { telemetry.run(inbound).await });
//!
//! bridge.turn_on().await?;
//! bridge.set_temperature(21.5).await?;
//! # Ok(())
//! # }
//! ```

mod bridge;
mod config;

pub use bridge::ClimateBridge;
pub use config::{ClimateConfig, DEFAULT_NAME};
