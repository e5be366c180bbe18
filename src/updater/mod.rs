// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Self-update of the installed component.
//!
//! A release manifest is fetched from the configured branch. When it names a
//! newer version that the host supports, the listed files can be downloaded
//! over the local copies. Every result maps to a [`Notification`] for the
//! host to display.
//!
//! # Examples
//!
//! ```no_run
//! use beca_climate::updater::{Updater, UpdaterConfig};
//!
//! # async fn example() -> beca_climate::Result<()> {
//! let config = UpdaterConfig::new("2024.10.1", "/config/custom_components/becatasmota");
//! let updater = Updater::new(config)?;
//!
//! if let Some(outcome) = updater.on_startup().await? {
//!     let notice = outcome.notification();
//!     println!("{}: {}", notice.title, notice.message);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod manifest;
mod outcome;
mod version;

pub use config::{
    CURRENT_VERSION, DEFAULT_MANIFEST_URL, DEFAULT_REMOTE_BASE_URL, UpdateBranch, UpdaterConfig,
};
pub use manifest::{Manifest, ReleaseInfo};
pub use outcome::{NOTIFICATION_TITLE, Notification, UpdateOutcome};
pub use version::Version;

use std::path::{Component, Path};

use reqwest::{Client, StatusCode};

use crate::error::{Error, ProtocolError, UpdateError};

/// Checks for and installs new releases.
#[derive(Debug, Clone)]
pub struct Updater {
    config: UpdaterConfig,
    client: Client,
}

impl Updater {
    /// Creates an updater.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the HTTP client cannot be created.
    pub fn new(config: UpdaterConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ProtocolError::Http)?;
        Ok(Self { config, client })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Runs the check made when the component is loaded.
    ///
    /// Returns `None` when checks are disabled or nothing is worth telling
    /// the user (already up to date).
    ///
    /// # Errors
    ///
    /// Same as [`check_updates`](Updater::check_updates).
    pub async fn on_startup(&self) -> Result<Option<UpdateOutcome>, Error> {
        if !self.config.check_updates() {
            return Ok(None);
        }
        match self.check_updates().await? {
            UpdateOutcome::UpToDate => Ok(None),
            outcome => Ok(Some(outcome)),
        }
    }

    /// Checks for a new release without installing it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Update` if the server cannot be reached, answers with
    /// a non-200 status, or serves an invalid manifest.
    pub async fn check_updates(&self) -> Result<UpdateOutcome, Error> {
        self.update(false).await
    }

    /// Checks for a new release and installs it.
    ///
    /// Files are written in place; failed files are reported in
    /// [`UpdateOutcome::PartiallyUpdated`] and the others are kept.
    ///
    /// # Errors
    ///
    /// Same as [`check_updates`](Updater::check_updates).
    pub async fn update_component(&self) -> Result<UpdateOutcome, Error> {
        self.update(true).await
    }

    async fn update(&self, install: bool) -> Result<UpdateOutcome, Error> {
        let manifest = self.fetch_manifest().await?;

        let latest = manifest.version()?;
        let current: Version = self.config.current_version().parse()?;
        if latest <= current {
            tracing::debug!(%latest, %current, "Component is up to date");
            return Ok(UpdateOutcome::UpToDate);
        }

        if let Some(required) = manifest.min_host_version()? {
            let host: Version = self.config.host_version().parse()?;
            if host < required {
                tracing::warn!(%latest, %required, %host, "New release needs a newer host");
                return Ok(UpdateOutcome::Incompatible { version: latest });
            }
        }

        if !install {
            return Ok(UpdateOutcome::Available {
                version: latest,
                release_notes: manifest.updater.release_notes,
            });
        }

        let mut failed = Vec::new();
        for file in &manifest.updater.files {
            if let Err(e) = self.install_file(file).await {
                tracing::error!(file = %file, error = %e, "Error updating file, please update it manually");
                failed.push(file.clone());
            }
        }

        if failed.is_empty() {
            tracing::info!(version = %latest, "Component updated");
            Ok(UpdateOutcome::Updated { version: latest })
        } else {
            Ok(UpdateOutcome::PartiallyUpdated {
                version: latest,
                failed,
            })
        }
    }

    async fn fetch_manifest(&self) -> Result<Manifest, UpdateError> {
        let url = self.config.manifest_url();
        tracing::debug!(url = %url, "Fetching release manifest");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                "An error occurred while checking for updates. Please check your internet connection."
            );
            UpdateError::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                status = status.as_u16(),
                "Invalid response from the server while checking for a new version"
            );
            return Err(UpdateError::InvalidResponse(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::InvalidManifest(e.to_string()))?;
        Manifest::from_json(&body)
    }

    async fn install_file(&self, file: &str) -> Result<(), UpdateError> {
        let download_error = |message: String| UpdateError::Download {
            file: file.to_string(),
            message,
        };

        if !is_safe_relative_path(file) {
            return Err(download_error("path escapes the component directory".to_string()));
        }

        let url = self.config.file_url(file);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(download_error(format!("HTTP {}", status.as_u16())));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let dest = self.config.component_dir().join(file);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| download_error(e.to_string()))?;
        }
        tokio::fs::write(&dest, &content)
            .await
            .map_err(|e| download_error(e.to_string()))?;

        tracing::debug!(file = %file, bytes = content.len(), "Installed file");
        Ok(())
    }
}

/// Whether a manifest path stays inside the component directory.
fn is_safe_relative_path(file: &str) -> bool {
    let path = Path::new(file);
    !file.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
