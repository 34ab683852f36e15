//! BLE Wi-Fi Provisioning Service
//!
//! Provisions Wi-Fi credentials onto a headless device over a single
//! BLE GATT characteristic. Peers write JSON commands and receive JSON
//! notifications on the same characteristic; on boot the device either
//! joins a stored network or opens the provisioning channel.

pub mod backend;
pub mod config;
pub mod core;
pub mod host;
pub mod protocol;
pub mod store;
pub mod transport;

pub use crate::core::{
    error::{ServiceError, TransportError, WifiError},
    types::{AccessPointRecord, AuthMode, Credential, DeviceState},
};
