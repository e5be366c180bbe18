// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State persisted by the host between restarts.

use serde::{Deserialize, Serialize};

use crate::types::HvacMode;

/// Last known state of the entity as stored by the host.
///
/// Field names follow the host's entity state layout: the mode is the entity
/// state, the target temperature and last operation are attributes.
///
/// # Examples
///
/// ```
/// use beca_climate::state::PersistedState;
/// use beca_climate::types::HvacMode;
///
/// let json = r#"{"state":"heat","temperature":21.5,"last_on_operation":"heat"}"#;
/// let restored: PersistedState = serde_json::from_str(json).unwrap();
///
/// assert_eq!(restored.state, HvacMode::Heat);
/// assert_eq!(restored.temperature, Some(21.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    /// Operation mode.
    pub state: HvacMode,

    /// Target temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Last mode other than off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_on_operation: Option<HvacMode>,
}
