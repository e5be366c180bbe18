// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry parsing for Tuya MCU messages relayed by Tasmota.
//!
//! When the MCU reports a data point, Tasmota publishes a JSON message
//! wrapping it under `TuyaReceived`:
//!
//! ```json
//! {"TuyaReceived": {"Data": "55AA0307...", "DpId": 3, "DpIdData": "0000002B"}}
//! ```
//!
//! Decoding happens in two steps: the payload is parsed into a transient
//! [`DataPoint`], which is then mapped to a [`StateChange`] by its id.
//!
//! # Examples
//!
//! ```
//! use beca_climate::state::StateChange;
//! use beca_climate::telemetry::parse_telemetry;
//!
//! let dp = parse_telemetry(r#"{"TuyaReceived":{"DpId":2,"DpIdData":"2B"}}"#)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(dp.id(), 2);
//! assert_eq!(dp.to_state_change().unwrap(), Some(StateChange::TargetTemperature(21.5)));
//! ```

mod data_point;

pub use data_point::{DataPoint, DataPointId};

use serde::Deserialize;

use crate::error::ParseError;
use crate::state::StateChange;

/// Top-level telemetry message.
#[derive(Debug, Deserialize)]
struct TelemetryEnvelope {
    #[serde(rename = "TuyaReceived", default)]
    tuya_received: Option<TuyaReceived>,
}

/// Content of the `TuyaReceived` wrapper.
///
/// Tasmota adds more keys (raw frame, command byte, typed DP fields); only the
/// data point id and its value are needed here.
#[derive(Debug, Deserialize)]
struct TuyaReceived {
    #[serde(rename = "DpId", default)]
    dp_id: Option<u32>,

    #[serde(rename = "DpIdData", default)]
    dp_id_data: Option<String>,
}

/// Parses a telemetry payload into a data point.
///
/// Returns `Ok(None)` when the message is valid JSON but carries no Tuya
/// data point (for example a plain command result).
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON and
/// `ParseError::MissingField` when a data point id comes without data.
pub fn parse_telemetry(payload: &str) -> Result<Option<DataPoint>, ParseError> {
    let envelope: TelemetryEnvelope = serde_json::from_str(payload)?;

    let Some(received) = envelope.tuya_received else {
        return Ok(None);
    };
    let Some(id) = received.dp_id else {
        return Ok(None);
    };
    let raw_value = received
        .dp_id_data
        .ok_or_else(|| ParseError::MissingField("DpIdData".to_string()))?;

    Ok(Some(DataPoint::new(id, raw_value)))
}

/// Parses a telemetry payload straight into a state change.
///
/// # Errors
///
/// Returns `ParseError` if the payload or the data point value is malformed.
pub fn decode_state_change(payload: &str) -> Result<Option<StateChange>, ParseError> {
    match parse_telemetry(payload)? {
        Some(dp) => dp.to_state_change(),
        None => Ok(None),
    }
}
