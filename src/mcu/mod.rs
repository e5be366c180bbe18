// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuya MCU serial frames.
//!
//! Tasmota forwards raw bytes to the thermostat's MCU with `SerialSend5`,
//! which takes the frame as a hex string. A frame is a fixed header followed
//! by payload bytes and a trailing checksum byte:
//!
//! ```text
//!                        ?? YY MM DD HH MM SS Weekday
//! HEX: 55 AA 00 1C 00 08 01 13 02 0F 10 04 12 05 <checksum>
//! ```
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use beca_climate::mcu::encode_time_set_frame;
//!
//! let now = NaiveDate::from_ymd_opt(2019, 2, 15)
//!     .unwrap()
//!     .and_hms_opt(16, 4, 18)
//!     .unwrap();
//!
//! assert_eq!(encode_time_set_frame(&now), "55AA001C00080113020F1004120573");
//! ```

mod frame;

pub use frame::{
    HexFrame, TIME_SET_PREFIX, command_chars_to_serial, encode_time_set_frame,
    encode_time_set_frame_now,
};
