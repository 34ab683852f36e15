//! Transport layer and its collaborator seams

pub mod ble;
pub mod mock_sink;

#[cfg(test)]
pub use mock_sink::MockNotificationSink;

use trait_variant::make;

use crate::core::error::TransportResult;
use crate::protocol::{Notification, ProvisioningCommand};

/// Outbound notification delivery, implemented by the BLE channel
///
/// Delivery is best-effort: with no active connection the send fails
/// and the message is dropped, never buffered.
#[make(Send)]
pub trait NotificationSink: Clone + Sync + 'static {
    async fn send(&self, message: Notification) -> TransportResult<()>;
}

/// Inbound command dispatch, implemented by the provisioning
/// controller
///
/// Dispatch never fails outward; anything that goes wrong is logged
/// and the channel stays open.
#[make(Send)]
pub trait CommandSink: Sync + 'static {
    async fn handle_command(&self, command: ProvisioningCommand);
}

/// The provisioning subsystem entry point network bring-up hands
/// control to
#[make(Send)]
pub trait Provisioner: Sync + 'static {
    async fn start(&self) -> TransportResult<()>;
}
