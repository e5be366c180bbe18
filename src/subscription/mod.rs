// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for climate state changes.
//!
//! Hosts register callbacks to refresh their UI when the thermostat reports
//! new values or when a user request changes the state.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches changes
//! - [`Subscribable`] - Trait for types that support subscriptions
//!
//! # Usage
//!
//! ```
//! use beca_climate::{ClimateBridge, ClimateConfig};
//! use beca_climate::protocol::RecordingPublisher;
//! use beca_climate::subscription::Subscribable;
//!
//! let bridge = ClimateBridge::new(ClimateConfig::new("beca"), RecordingPublisher::new());
//!
//! let sub_id = bridge.on_current_temperature_changed(|celsius| {
//!     println!("Room is at {celsius}");
//! });
//!
//! bridge.unsubscribe(sub_id);
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
