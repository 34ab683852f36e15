//! Adapter event loop: connect and disconnect tracking
//!
//! BlueZ does not hand GATT servers an explicit disconnect callback,
//! so the loop watches adapter and device events and feeds link-down
//! transitions back into the channel.

use bluer::{AdapterEvent, Address, DeviceEvent, DeviceProperty};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::transport::CommandSink;

use super::channel::ProvisioningChannel;

/// Process adapter events until the stream ends
pub async fn run_event_loop<C: CommandSink>(
    channel: Arc<ProvisioningChannel<C>>,
) -> Result<(), bluer::Error> {
    let mut events = channel.adapter().events().await?;

    info!("BLE event loop started");

    while let Some(event) = events.next().await {
        match event {
            AdapterEvent::DeviceAdded(addr) => {
                debug!("device added: {addr}");
                tokio::spawn(monitor_device(channel.clone(), addr));
            }
            AdapterEvent::DeviceRemoved(addr) => {
                debug!("device removed: {addr}");
                channel.handle_disconnect(addr).await;
            }
            AdapterEvent::PropertyChanged(_) => {}
        }
    }

    warn!("BLE event loop ended");
    Ok(())
}

/// Watch one device for its connection dropping
async fn monitor_device<C: CommandSink>(channel: Arc<ProvisioningChannel<C>>, addr: Address) {
    let device = match channel.adapter().device(addr) {
        Ok(device) => device,
        Err(e) => {
            debug!("cannot track device {addr}: {e}");
            return;
        }
    };

    let mut events = match device.events().await {
        Ok(events) => events,
        Err(e) => {
            debug!("cannot watch device {addr} events: {e}");
            return;
        }
    };

    while let Some(DeviceEvent::PropertyChanged(property)) = events.next().await {
        if let DeviceProperty::Connected(false) = property {
            debug!("device {addr} reported disconnected");
            channel.handle_disconnect(addr).await;
        }
    }
}
