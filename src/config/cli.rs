//! Command-line argument parsing

use clap::Parser;

use crate::transport::ble::uuids::DEFAULT_DEVICE_NAME;

#[derive(Parser, Debug, Clone)]
#[clap(name = "ble-provisioning", version, author)]
#[clap(about = "BLE Wi-Fi provisioning service for headless devices")]
pub struct CliArgs {
    /// Wireless network interface name
    #[clap(short, long, default_value = "wlan0")]
    pub interface: String,

    /// Path of the credential store file
    #[clap(short, long, default_value = "/var/lib/ble-provisioning/credentials.json")]
    pub credential_file: String,

    /// Name the device advertises over BLE
    #[clap(short, long, default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    /// Enter provisioning mode on this boot even with stored
    /// credentials
    #[clap(long)]
    pub force_provisioning: bool,

    /// Upper bound in bytes for a single notification chunk
    #[clap(long, default_value = "512")]
    pub max_notify_chunk: usize,
}
