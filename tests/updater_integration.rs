// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the self-updater using wiremock.

use std::path::PathBuf;

use beca_climate::Error;
use beca_climate::error::UpdateError;
use beca_climate::updater::{UpdateBranch, UpdateOutcome, Updater, UpdaterConfig, Version};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fresh scratch directory for installed files.
fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("beca_updater_{}", uuid::Uuid::new_v4().simple()))
}

fn updater_for(server: &MockServer, dir: PathBuf) -> Updater {
    let config = UpdaterConfig::new("2024.10.1", dir)
        .with_current_version("0.0.1")
        .with_manifest_url(format!("{}/{{branch}}/manifest.json", server.uri()))
        .with_remote_base_url(format!("{}/{{branch}}/", server.uri()));
    Updater::new(config).unwrap()
}

async fn mount_manifest(server: &MockServer, branch: &str, manifest: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{branch}/manifest.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
        .mount(server)
        .await;
}

fn manifest(version: &str, host: &str, files: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "domain": "becatasmota",
        "homeassistant": host,
        "updater": {
            "version": version,
            "releaseNotes": "Clock sync fix",
            "files": files,
        }
    })
}

// ============================================================================
// Checks
// ============================================================================

mod check {
    use super::*;

    #[tokio::test]
    async fn up_to_date() {
        let server = MockServer::start().await;
        mount_manifest(&server, "master", manifest("0.0.1", "0.96.0", &[])).await;

        let updater = updater_for(&server, scratch_dir());
        let outcome = updater.check_updates().await.unwrap();

        assert_eq!(outcome, UpdateOutcome::UpToDate);
        assert_eq!(
            outcome.notification().message,
            "You're already using the latest version!"
        );
    }

    #[tokio::test]
    async fn startup_check_is_silent_when_up_to_date() {
        let server = MockServer::start().await;
        mount_manifest(&server, "master", manifest("0.0.1", "0.96.0", &[])).await;

        let updater = updater_for(&server, scratch_dir());
        assert!(updater.on_startup().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_version_available() {
        let server = MockServer::start().await;
        mount_manifest(&server, "master", manifest("0.0.2", "0.96.0", &["climate.py"])).await;

        let updater = updater_for(&server, scratch_dir());
        let outcome = updater.on_startup().await.unwrap().unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Available {
                version: Version::new(0, 0, 2),
                release_notes: "Clock sync fix".to_string(),
            }
        );
        assert!(outcome.notification().message.contains("(0.0.2)"));
    }

    #[tokio::test]
    async fn incompatible_host() {
        let server = MockServer::start().await;
        mount_manifest(&server, "master", manifest("0.0.2", "2099.1.0", &["climate.py"])).await;

        let updater = updater_for(&server, scratch_dir());
        let outcome = updater.update_component().await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::Incompatible { .. }));
    }

    #[tokio::test]
    async fn follows_configured_branch() {
        let server = MockServer::start().await;
        mount_manifest(&server, "rc", manifest("0.1.0b1", "0.96.0", &[])).await;

        let dir = scratch_dir();
        let config = UpdaterConfig::new("2024.10.1", dir)
            .with_current_version("0.0.1")
            .with_branch(UpdateBranch::Rc)
            .with_manifest_url(format!("{}/{{branch}}/manifest.json", server.uri()));
        let updater = Updater::new(config).unwrap();

        let outcome = updater.check_updates().await.unwrap();
        assert!(matches!(outcome, UpdateOutcome::Available { .. }));
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let updater = updater_for(&server, scratch_dir());
        let result = updater.check_updates().await;

        assert!(matches!(
            result,
            Err(Error::Update(UpdateError::InvalidResponse(404)))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_reported() {
        let config = UpdaterConfig::new("2024.10.1", scratch_dir())
            .with_manifest_url("http://127.0.0.1:9/{branch}/manifest.json");
        let updater = Updater::new(config).unwrap();

        let result = updater.check_updates().await;
        assert!(matches!(
            result,
            Err(Error::Update(UpdateError::Unreachable(_)))
        ));
    }

    #[tokio::test]
    async fn invalid_manifest_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let updater = updater_for(&server, scratch_dir());
        assert!(matches!(
            updater.check_updates().await,
            Err(Error::Update(UpdateError::InvalidManifest(_)))
        ));
    }
}

// ============================================================================
// Installation
// ============================================================================

mod install {
    use super::*;

    #[tokio::test]
    async fn downloads_every_file() {
        let server = MockServer::start().await;
        mount_manifest(
            &server,
            "master",
            manifest("0.0.2", "0.96.0", &["climate.py", "translations/en.json"]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/master/climate.py"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# climate"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/master/translations/en.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let dir = scratch_dir();
        let updater = updater_for(&server, dir.clone());
        let outcome = updater.update_component().await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                version: Version::new(0, 0, 2)
            }
        );
        assert_eq!(
            outcome.notification().message,
            "Successfully updated to 0.0.2. Please restart Home Assistant."
        );
        assert_eq!(
            std::fs::read_to_string(dir.join("climate.py")).unwrap(),
            "# climate"
        );
        assert_eq!(
            std::fs::read_to_string(dir.join("translations/en.json")).unwrap(),
            "{}"
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn failed_files_are_collected() {
        let server = MockServer::start().await;
        mount_manifest(
            &server,
            "master",
            manifest("0.0.2", "0.96.0", &["climate.py", "missing.py", "../escape.py"]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/master/climate.py"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# climate"))
            .mount(&server)
            .await;

        let dir = scratch_dir();
        let updater = updater_for(&server, dir.clone());
        let outcome = updater.update_component().await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::PartiallyUpdated {
                version: Version::new(0, 0, 2),
                failed: vec!["missing.py".to_string(), "../escape.py".to_string()],
            }
        );
        // Successful files are kept
        assert!(dir.join("climate.py").exists());
        assert!(!dir.join("missing.py").exists());

        let _ = std::fs::remove_dir_all(dir);
    }
}
