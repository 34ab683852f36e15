//! Bluetooth Low Energy transport layer

pub mod adapter;
pub mod channel;
pub mod gatt;
pub mod uuids;

pub use {
    adapter::run_event_loop,
    channel::{ChannelCore, ChannelState, NotifySender, ProvisioningChannel},
    uuids::*,
};
