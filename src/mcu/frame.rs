// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hex frame construction and checksum.

use std::fmt;

use chrono::{Datelike, Local, Timelike};

use crate::error::ParseError;

/// Header of the Tuya MCU "set date and time" command.
pub const TIME_SET_PREFIX: [u8; 7] = [0x55, 0xAA, 0x00, 0x1C, 0x00, 0x08, 0x01];

/// An ordered sequence of bytes rendered as two-digit hex tokens.
///
/// # Examples
///
/// ```
/// use beca_climate::mcu::HexFrame;
///
/// let frame = HexFrame::parse("55 AA 00 1C").unwrap();
/// assert_eq!(frame.len(), 4);
/// assert_eq!(frame.checksum(), 0x1B);
/// assert_eq!(frame.to_serial_string(), "55AA001C1B");
/// assert_eq!(frame.to_string(), "55 AA 00 1C");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexFrame {
    bytes: Vec<u8>,
}

impl HexFrame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frame from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Parses a frame from hex text.
    ///
    /// Whitespace is ignored; the remaining characters are read in pairs.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the text has an odd number of
    /// hex digits or contains a non-hex character.
    pub fn parse(command: &str) -> Result<Self, ParseError> {
        let digits: Vec<char> = command.chars().filter(|c| !c.is_whitespace()).collect();

        if digits.len() % 2 != 0 {
            return Err(ParseError::InvalidValue {
                field: "frame".to_string(),
                message: format!("odd number of hex digits in {command:?}"),
            });
        }

        let bytes = digits
            .chunks(2)
            .map(|pair| {
                let token: String = pair.iter().collect();
                u8::from_str_radix(&token, 16).map_err(|e| ParseError::InvalidValue {
                    field: "frame".to_string(),
                    message: format!("invalid hex token {token:?}: {e}"),
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Self { bytes })
    }

    /// Returns the frame bytes, without checksum.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of byte tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the frame holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sum of all bytes modulo 256.
    #[must_use]
    pub fn checksum(&self) -> u8 {
        self.bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    /// Whether a checksum is appended when serializing.
    ///
    /// Frames of one or two tokens are sent as-is.
    #[must_use]
    pub fn has_checksum(&self) -> bool {
        self.bytes.len() > 2
    }

    /// Renders the frame for `SerialSend5`: tokens joined without
    /// separators, followed by the checksum token when applicable.
    #[must_use]
    pub fn to_serial_string(&self) -> String {
        let mut out: String = self.bytes.iter().map(|b| format!("{b:02X}")).collect();
        if self.has_checksum() {
            out.push_str(&format!("{:02X}", self.checksum()));
        }
        out
    }
}

impl Extend<u8> for HexFrame {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        self.bytes.extend(iter);
    }
}

impl fmt::Display for HexFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

/// Converts hex command text into a serial string with trailing checksum.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the text is not valid hex.
///
/// # Examples
///
/// ```
/// use beca_climate::mcu::command_chars_to_serial;
///
/// assert_eq!(command_chars_to_serial("55 AA 00 1C").unwrap(), "55AA001C1B");
/// // Two tokens or fewer carry no checksum.
/// assert_eq!(command_chars_to_serial("55 AA").unwrap(), "55AA");
/// ```
pub fn command_chars_to_serial(command: &str) -> Result<String, ParseError> {
    HexFrame::parse(command).map(|frame| frame.to_serial_string())
}

/// Builds the "set date and time" frame for the given moment.
///
/// Fields after the prefix are: year within the century, month, day, hour,
/// minute, second and ISO weekday (1 = Monday .. 7 = Sunday).
#[must_use]
pub fn encode_time_set_frame<T: Datelike + Timelike>(now: &T) -> String {
    time_set_frame(now).to_serial_string()
}

/// Builds the "set date and time" frame for the current local time.
#[must_use]
pub fn encode_time_set_frame_now() -> String {
    encode_time_set_frame(&Local::now().naive_local())
}

fn time_set_frame<T: Datelike + Timelike>(now: &T) -> HexFrame {
    let mut frame = HexFrame::from_bytes(&TIME_SET_PREFIX);

    // Safe: every field is below 100
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let fields = [
        now.year().rem_euclid(100) as u8,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
        now.weekday().number_from_monday() as u8,
    ];
    frame.extend(fields);
    frame
}
