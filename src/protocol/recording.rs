// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory publisher.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ProtocolError;
use crate::protocol::Publisher;

/// A message captured by [`RecordingPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    /// Full topic.
    pub topic: String,
    /// Text payload.
    pub payload: String,
}

/// Publisher that stores every message instead of sending it.
///
/// Clones share the same buffer, so a clone kept by a test sees what the
/// bridge published. It can also be switched to fail, to exercise transport
/// error paths.
///
/// # Examples
///
/// ```
/// use beca_climate::protocol::{Publisher, RecordingPublisher};
///
/// # async fn example() {
/// let publisher = RecordingPublisher::new();
/// publisher.publish("beca/cmnd/POWER1", "on").await.unwrap();
///
/// let sent = publisher.messages();
/// assert_eq!(sent[0].topic, "beca/cmnd/POWER1");
/// assert_eq!(sent[0].payload, "on");
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    messages: Arc<Mutex<Vec<PublishedMessage>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingPublisher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every message published so far.
    #[must_use]
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.lock().clone()
    }

    /// Returns the payloads published on topics ending with `suffix`.
    #[must_use]
    pub fn payloads_for(&self, suffix: &str) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.topic.ends_with(suffix))
            .map(|m| m.payload.clone())
            .collect()
    }

    /// Forgets every recorded message.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    /// Makes subsequent publishes fail with a connection error.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ProtocolError> {
        if *self.failing.lock() {
            return Err(ProtocolError::ConnectionFailed(
                "publisher is offline".to_string(),
            ));
        }

        tracing::debug!(topic = %topic, payload = %payload, "Recording publish");

        self.messages.lock().push(PublishedMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}
