// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message bus access.
//!
//! The bridge only needs to publish text payloads; the [`Publisher`] trait is
//! that seam. [`MqttClient`] implements it over a real broker and also
//! forwards telemetry from subscribed topics. [`RecordingPublisher`] keeps
//! published messages in memory.

#[cfg(feature = "mqtt")]
mod mqtt;
mod recording;

#[cfg(feature = "mqtt")]
pub use mqtt::{InboundMessage, MqttClient, MqttConfig};
pub use recording::{PublishedMessage, RecordingPublisher};

use crate::command::Command;
use crate::error::ProtocolError;

/// Trait for transports that can publish commands to the device.
///
/// Publishing is fire-and-forget: implementations return once the message
/// has been handed to the transport.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    /// Publishes a raw payload on a topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport rejects the message.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), ProtocolError>;

    /// Publishes a command under the device base topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport rejects the message.
    async fn send_command<C: Command + Sync>(
        &self,
        base_topic: &str,
        command: &C,
    ) -> Result<(), ProtocolError> {
        self.publish(&command.mqtt_topic(base_topic), &command.payload())
            .await
    }
}
