// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Update results and the notices shown to users.

use super::Version;

/// Title of every update notice.
pub const NOTIFICATION_TITLE: &str = "BecaTasmota";

/// A persistent notice for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notice title.
    pub title: String,
    /// Markdown body.
    pub message: String,
}

impl Notification {
    fn new(message: String) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            message,
        }
    }
}

/// Result of an update check or installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The installed version is the latest.
    UpToDate,
    /// A newer release requires a newer host.
    Incompatible {
        /// The release version.
        version: Version,
    },
    /// A newer release can be installed.
    Available {
        /// The release version.
        version: Version,
        /// The release notes.
        release_notes: String,
    },
    /// Every file was installed.
    Updated {
        /// The installed version.
        version: Version,
    },
    /// Some files could not be installed.
    PartiallyUpdated {
        /// The release version.
        version: Version,
        /// Files that failed.
        failed: Vec<String>,
    },
}

impl UpdateOutcome {
    /// Returns the notice to show for this outcome.
    #[must_use]
    pub fn notification(&self) -> Notification {
        let message = match self {
            Self::UpToDate => "You're already using the latest version!".to_string(),
            Self::Incompatible { .. } => "There is a new version of BecaTasmota integration, \
                but it is **incompatible** with your system. \
                Please first update Home Assistant."
                .to_string(),
            Self::Available {
                version,
                release_notes,
            } => format!(
                "A new version of BecaTasmota integration is available ({version}). \
                 Call the ``becatasmota.update_component`` service to update the integration. \
                 \n\n **Release notes:** \n{release_notes}"
            ),
            Self::Updated { version } => {
                format!("Successfully updated to {version}. Please restart Home Assistant.")
            }
            Self::PartiallyUpdated { .. } => "There was an error updating one or more files \
                of BecaTasmota. Please check the logs for more information."
                .to_string(),
        };
        Notification::new(message)
    }
}
