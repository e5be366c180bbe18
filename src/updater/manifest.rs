// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Release manifest.

use serde::Deserialize;

use crate::error::UpdateError;

use super::Version;

/// Manifest published next to the component sources.
///
/// ```json
/// {
///   "homeassistant": "0.96.0",
///   "updater": {
///     "version": "0.0.2",
///     "releaseNotes": "Fix clock sync",
///     "files": ["__init__.py", "climate.py"]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Minimum host version required by the release.
    #[serde(default)]
    pub homeassistant: Option<String>,

    /// Release description.
    pub updater: ReleaseInfo,
}

/// The `updater` section of a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    /// Version of the release.
    pub version: String,

    /// Free-form release notes.
    #[serde(rename = "releaseNotes", default)]
    pub release_notes: String,

    /// Component-relative paths of the files to install.
    #[serde(default)]
    pub files: Vec<String>,
}

impl Manifest {
    /// Parses a manifest document.
    ///
    /// # Errors
    ///
    /// Returns `UpdateError::InvalidManifest` if the JSON does not match.
    pub fn from_json(json: &str) -> Result<Self, UpdateError> {
        serde_json::from_str(json).map_err(|e| UpdateError::InvalidManifest(e.to_string()))
    }

    /// Returns the release version.
    ///
    /// # Errors
    ///
    /// Returns `UpdateError::InvalidVersion` if it is not a strict version.
    pub fn version(&self) -> Result<Version, UpdateError> {
        self.updater.version.parse()
    }

    /// Returns the minimum host version, if the manifest names one.
    ///
    /// # Errors
    ///
    /// Returns `UpdateError::InvalidVersion` if it is not a strict version.
    pub fn min_host_version(&self) -> Result<Option<Version>, UpdateError> {
        self.homeassistant.as_deref().map(str::parse).transpose()
    }
}
