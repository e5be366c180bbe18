// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate state management types.
//!
//! [`ClimateState`] holds the in-memory state of the climate entity,
//! [`StateChange`] represents one update decoded from telemetry or issued by
//! the user, and [`PersistedState`] is what the host stores between restarts.
//!
//! # Examples
//!
//! ```
//! use beca_climate::state::{ClimateState, StateChange};
//! use beca_climate::types::HvacMode;
//!
//! let mut state = ClimateState::new(5.0);
//! assert!(state.apply(&StateChange::HvacMode(HvacMode::Heat)));
//!
//! assert_eq!(state.hvac_mode(), HvacMode::Heat);
//! assert_eq!(state.last_on_operation(), Some(HvacMode::Heat));
//! ```

mod climate_state;
mod persisted;
mod state_change;

pub use climate_state::ClimateState;
pub use persisted::PersistedState;
pub use state_change::StateChange;
