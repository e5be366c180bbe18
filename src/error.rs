// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `beca_climate` library.
//!
//! Failures fall into four groups: value validation (rejected user requests),
//! protocol communication (MQTT and HTTP transport), parsing (telemetry and
//! manifests) and self-update.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while checking for or installing an update.
    #[error("update error: {0}")]
    Update(#[from] UpdateError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A requested target temperature is outside the configured range.
    #[error("temperature {actual} is out of range [{min}, {max}]")]
    TemperatureOutOfRange {
        /// Minimum allowed temperature.
        min: f64,
        /// Maximum allowed temperature.
        max: f64,
        /// The requested temperature.
        actual: f64,
    },

    /// An unknown HVAC mode string was provided.
    #[error("invalid hvac mode: {0}")]
    InvalidHvacMode(String),

    /// An unknown update branch was provided.
    #[error("invalid update branch: {0}")]
    InvalidBranch(String),

    /// The configured temperature range is empty.
    #[error("min temperature {min} is greater than max temperature {max}")]
    InvalidRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
}

/// Errors related to protocol communication (MQTT/HTTP).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "updater")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker or server failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device payloads and manifests.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to the self-update mechanism.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The update server could not be reached.
    #[error("unable to reach update server: {0}")]
    Unreachable(String),

    /// The update server answered with a non-success status.
    #[error("invalid response from update server: HTTP {0}")]
    InvalidResponse(u16),

    /// The manifest could not be decoded.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// A version string is not a valid strict version.
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    /// A file listed in the manifest could not be installed.
    #[error("failed to update {file}: {message}")]
    Download {
        /// The manifest-relative file path.
        file: String,
        /// Description of the failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_out_of_range_display() {
        let err = ValueError::TemperatureOutOfRange {
            min: 5.0,
            max: 35.0,
            actual: 40.5,
        };
        assert_eq!(err.to_string(), "temperature 40.5 is out of range [5, 35]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidHvacMode("cool".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidHvacMode(_))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("DpIdData".to_string());
        assert_eq!(err.to_string(), "missing field in payload: DpIdData");
    }

    #[test]
    fn update_error_display() {
        let err = UpdateError::Download {
            file: "climate.py".to_string(),
            message: "HTTP 404".to_string(),
        };
        assert_eq!(err.to_string(), "failed to update climate.py: HTTP 404");
    }
}
