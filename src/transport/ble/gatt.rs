//! GATT application for the provisioning service
//!
//! A single primary service with a single characteristic carries the
//! whole protocol: peers write JSON commands and subscribe to the same
//! characteristic for JSON notifications.

use bluer::gatt::local::{
    Application, Characteristic, CharacteristicNotify, CharacteristicNotifyMethod,
    CharacteristicRead, CharacteristicWrite, CharacteristicWriteMethod, Service,
};
use std::sync::Arc;
use tracing::debug;

use crate::protocol::ProvisioningCommand;
use crate::transport::CommandSink;

use super::channel::ChannelCore;
use super::uuids::{PROVISIONING_CHAR_UUID, PROVISIONING_SERVICE_UUID};

/// Build the GATT application: one service, one characteristic
pub(crate) fn provisioning_application<C: CommandSink>(
    controller: Arc<C>,
    core: Arc<ChannelCore>,
) -> Application {
    Application {
        services: vec![Service {
            uuid: PROVISIONING_SERVICE_UUID,
            primary: true,
            characteristics: vec![provisioning_characteristic(controller, core)],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn provisioning_characteristic<C: CommandSink>(
    controller: Arc<C>,
    core: Arc<ChannelCore>,
) -> Characteristic {
    Characteristic {
        uuid: PROVISIONING_CHAR_UUID,
        write: Some(CharacteristicWrite {
            write: true,
            write_without_response: false,
            method: CharacteristicWriteMethod::Fun({
                let core = core.clone();
                Box::new(move |new_value, req| {
                    let controller = controller.clone();
                    let core = core.clone();
                    Box::pin(async move {
                        core.observe_mtu(req.mtu as usize);
                        core.observe_peer(req.device_address);
                        match ProvisioningCommand::decode(&new_value) {
                            Some(command) => controller.handle_command(command).await,
                            None => {
                                debug!(
                                    "dropped unrecognized write of {} bytes from {}",
                                    new_value.len(),
                                    req.device_address
                                );
                            }
                        }
                        // Writes are always acknowledged; outcomes are
                        // reported through notifications only.
                        Ok(())
                    })
                })
            }),
            ..Default::default()
        }),
        read: Some(CharacteristicRead {
            read: true,
            fun: {
                let core = core.clone();
                Box::new(move |req| {
                    let core = core.clone();
                    Box::pin(async move {
                        core.observe_mtu(req.mtu as usize);
                        core.observe_peer(req.device_address);
                        // The characteristic has no readable state.
                        Ok(Vec::new())
                    })
                })
            },
            ..Default::default()
        }),
        notify: Some(CharacteristicNotify {
            notify: true,
            method: CharacteristicNotifyMethod::Fun(Box::new(move |notifier| {
                let core = core.clone();
                Box::pin(async move {
                    core.peer_connected(notifier).await;
                })
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}
