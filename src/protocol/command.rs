//! Inbound command decoding
//!
//! The provisioning characteristic is a best-effort channel: every
//! write is parsed as JSON and matched against the known command
//! shapes. Anything else is dropped without a response.

use serde::Deserialize;
use tracing::debug;

/// A decoded command from the companion app
///
/// Credential submission arrives as a bare `{ssid, password}` object
/// without an envelope; control commands carry a `type` tag.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProvisioningCommand {
    /// Bare credential object: `{"ssid": "...", "password": "..."}`
    SubmitCredentials { ssid: String, password: String },

    /// Tagged control command, e.g. `{"type": "request_wifi_scan"}`
    Control(ControlCommand),
}

/// Tagged control commands
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlCommand {
    /// Ask the device to scan for access points and push the results
    /// back as a notification
    RequestWifiScan,
}

impl ProvisioningCommand {
    /// Decode a raw characteristic write
    ///
    /// Returns `None` for anything that is not a known command shape;
    /// the caller drops it silently (no NACK on this channel).
    pub fn decode(raw: &[u8]) -> Option<Self> {
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(_) => {
                debug!("write payload is not UTF-8, dropping");
                return None;
            }
        };

        match serde_json::from_str(text) {
            Ok(command) => Some(command),
            Err(e) => {
                debug!("write payload is not a known command ({e}), dropping");
                None
            }
        }
    }
}
