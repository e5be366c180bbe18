// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::HvacMode;

/// Trait for types that support state change subscriptions.
pub trait Subscribable {
    /// Subscribes to operation mode changes.
    fn on_hvac_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(HvacMode) + Send + Sync + 'static;

    /// Subscribes to target temperature changes.
    fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static;

    /// Subscribes to measured temperature changes.
    fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
