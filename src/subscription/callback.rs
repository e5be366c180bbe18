// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback storage and dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::HvacMode;

/// Unique identifier for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type HvacModeCallback = Arc<dyn Fn(HvacMode) + Send + Sync>;
type TemperatureCallback = Arc<dyn Fn(f64) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for state change callbacks.
///
/// Callbacks are cloned out of the lock before being called, so a callback
/// may register or remove subscriptions without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    hvac_mode_callbacks: RwLock<HashMap<SubscriptionId, HvacModeCallback>>,
    target_temperature_callbacks: RwLock<HashMap<SubscriptionId, TemperatureCallback>>,
    current_temperature_callbacks: RwLock<HashMap<SubscriptionId, TemperatureCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            hvac_mode_callbacks: RwLock::new(HashMap::new()),
            target_temperature_callbacks: RwLock::new(HashMap::new()),
            current_temperature_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for operation mode changes.
    pub fn on_hvac_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(HvacMode) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.hvac_mode_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for target temperature changes.
    pub fn on_target_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.target_temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for measured temperature changes.
    pub fn on_current_temperature_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.current_temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving every change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.hvac_mode_callbacks.write().remove(&id).is_some()
            || self.target_temperature_callbacks.write().remove(&id).is_some()
            || self
                .current_temperature_callbacks
                .write()
                .remove(&id)
                .is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Dispatches a state change to the matching callbacks.
    pub fn dispatch(&self, change: &StateChange) {
        let generic: Vec<_> = self.state_changed_callbacks.read().values().cloned().collect();
        for callback in generic {
            callback(change);
        }

        match *change {
            StateChange::HvacMode(mode) => {
                let callbacks: Vec<_> = self.hvac_mode_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(mode);
                }
            }
            StateChange::TargetTemperature(t) => {
                let callbacks: Vec<_> = self
                    .target_temperature_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(t);
                }
            }
            StateChange::CurrentTemperature(t) => {
                let callbacks: Vec<_> = self
                    .current_temperature_callbacks
                    .read()
                    .values()
                    .cloned()
                    .collect();
                for callback in callbacks {
                    callback(t);
                }
            }
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("hvac_mode_callbacks", &self.hvac_mode_callbacks.read().len())
            .field(
                "target_temperature_callbacks",
                &self.target_temperature_callbacks.read().len(),
            )
            .field(
                "current_temperature_callbacks",
                &self.current_temperature_callbacks.read().len(),
            )
            .field(
                "state_changed_callbacks",
                &self.state_changed_callbacks.read().len(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn dispatch_reaches_specific_and_generic_callbacks() {
        let registry = CallbackRegistry::new();
        let modes = Arc::new(AtomicUsize::new(0));
        let all = Arc::new(AtomicUsize::new(0));

        let m = modes.clone();
        registry.on_hvac_mode_changed(move |mode| {
            assert_eq!(mode, HvacMode::Heat);
            m.fetch_add(1, Ordering::SeqCst);
        });
        let a = all.clone();
        registry.on_state_changed(move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::HvacMode(HvacMode::Heat));
        registry.dispatch(&StateChange::CurrentTemperature(20.0));

        assert_eq!(modes.load(Ordering::SeqCst), 1);
        assert_eq!(all.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn temperature_callbacks_are_separate() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(RwLock::new(Vec::new()));

        let s = seen.clone();
        registry.on_target_temperature_changed(move |t| s.write().push(("target", t)));
        let s = seen.clone();
        registry.on_current_temperature_changed(move |t| s.write().push(("current", t)));

        registry.dispatch(&StateChange::TargetTemperature(21.5));
        registry.dispatch(&StateChange::CurrentTemperature(19.0));

        assert_eq!(*seen.read(), vec![("target", 21.5), ("current", 19.0)]);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let id = registry.on_state_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));

        registry.dispatch(&StateChange::TargetTemperature(20.0));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_state_changed(|_| {});
        let b = registry.on_hvac_mode_changed(|_| {});
        assert_ne!(a, b);
        assert_eq!(a.to_string(), format!("Sub({})", a.value()));
    }
}
