// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Updater configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ValueError;

/// Manifest location; `{branch}` is replaced by the update branch.
pub const DEFAULT_MANIFEST_URL: &str = "https://raw.githubusercontent.com/emanuelecavestri/BecaTasmota/{branch}/custom_components/becatasmota/manifest.json";

/// Base URL of the component files; `{branch}` is replaced by the update branch.
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://raw.githubusercontent.com/emanuelecavestri/BecaTasmota/{branch}/custom_components/becatasmota/";

/// Version of the installed component.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Release channel to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateBranch {
    /// Stable releases.
    #[default]
    Master,
    /// Release candidates.
    Rc,
}

impl UpdateBranch {
    /// Returns the branch name used in URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Rc => "rc",
        }
    }
}

impl fmt::Display for UpdateBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateBranch {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Self::Master),
            "rc" => Ok(Self::Rc),
            other => Err(ValueError::InvalidBranch(other.to_string())),
        }
    }
}

/// Configuration of the self-updater.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use beca_climate::updater::{UpdateBranch, UpdaterConfig};
///
/// let config = UpdaterConfig::new("2024.10.1", "/config/custom_components/becatasmota")
///     .with_branch(UpdateBranch::Rc)
///     .with_timeout(Duration::from_secs(5));
///
/// assert!(config.manifest_url().contains("/rc/"));
/// assert!(config.check_updates());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct UpdaterConfig {
    #[serde(default = "default_true")]
    check_updates: bool,
    #[serde(default, rename = "update_branch")]
    branch: UpdateBranch,
    #[serde(default = "default_current_version")]
    current_version: String,
    host_version: String,
    component_dir: PathBuf,
    #[serde(default = "default_manifest_url")]
    manifest_url: String,
    #[serde(default = "default_remote_base_url")]
    remote_base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_current_version() -> String {
    CURRENT_VERSION.to_string()
}

fn default_manifest_url() -> String {
    DEFAULT_MANIFEST_URL.to_string()
}

fn default_remote_base_url() -> String {
    DEFAULT_REMOTE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl UpdaterConfig {
    /// Creates a configuration for a host running `host_version`, with the
    /// component installed in `component_dir`.
    #[must_use]
    pub fn new(host_version: impl Into<String>, component_dir: impl Into<PathBuf>) -> Self {
        Self {
            check_updates: true,
            branch: UpdateBranch::default(),
            current_version: default_current_version(),
            host_version: host_version.into(),
            component_dir: component_dir.into(),
            manifest_url: default_manifest_url(),
            remote_base_url: default_remote_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Enables or disables the check on startup.
    #[must_use]
    pub fn with_check_updates(mut self, enabled: bool) -> Self {
        self.check_updates = enabled;
        self
    }

    /// Sets the release channel.
    #[must_use]
    pub fn with_branch(mut self, branch: UpdateBranch) -> Self {
        self.branch = branch;
        self
    }

    /// Overrides the installed component version.
    #[must_use]
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Sets the manifest URL template.
    #[must_use]
    pub fn with_manifest_url(mut self, template: impl Into<String>) -> Self {
        self.manifest_url = template.into();
        self
    }

    /// Sets the file base URL template.
    #[must_use]
    pub fn with_remote_base_url(mut self, template: impl Into<String>) -> Self {
        self.remote_base_url = template.into();
        self
    }

    /// Sets the HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Returns whether to check on startup.
    #[must_use]
    pub fn check_updates(&self) -> bool {
        self.check_updates
    }

    /// Returns the release channel.
    #[must_use]
    pub fn branch(&self) -> UpdateBranch {
        self.branch
    }

    /// Returns the installed component version.
    #[must_use]
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Returns the host version.
    #[must_use]
    pub fn host_version(&self) -> &str {
        &self.host_version
    }

    /// Returns the component directory.
    #[must_use]
    pub fn component_dir(&self) -> &Path {
        &self.component_dir
    }

    /// Returns the HTTP timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the manifest URL for the configured branch.
    #[must_use]
    pub fn manifest_url(&self) -> String {
        self.manifest_url.replace("{branch}", self.branch.as_str())
    }

    /// Returns the download URL of a component file.
    #[must_use]
    pub fn file_url(&self, file: &str) -> String {
        let base = self.remote_base_url.replace("{branch}", self.branch.as_str());
        format!("{base}{file}")
    }
}
