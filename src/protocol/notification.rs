//! Outbound notification envelope
//!
//! Every notification pushed to the peer is a tagged envelope
//! `{"type": ..., "payload": ...}`.

use serde::{Deserialize, Serialize};

use crate::core::types::AccessPointRecord;

/// Device-to-app notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Full scan result set, one notification per scan (empty array
    /// when no access points were found)
    WifiScanResult(Vec<AccessPointRecord>),

    /// The scan could not be started; payload is a human-readable
    /// reason
    WifiScanFailed(String),

    /// Credentials were received but could not be persisted; the
    /// device will not restart
    ProvisioningFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AuthMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_result_wire_form() {
        let notification = Notification::WifiScanResult(vec![AccessPointRecord {
            ssid: "Home".into(),
            rssi: -55,
            auth_mode: AuthMode::WpaWpa2Psk,
        }]);

        let json = serde_json::to_string(&notification).unwrap();
        assert_eq!(
            json,
            r#"{"type":"wifi_scan_result","payload":[{"ssid":"Home","rssi":-55,"encryption":"WPA_WPA2_PSK"}]}"#
        );
    }

    #[test]
    fn test_scan_result_empty_payload() {
        let notification = Notification::WifiScanResult(vec![]);
        let json = serde_json::to_string(&notification).unwrap();
        assert_eq!(json, r#"{"type":"wifi_scan_result","payload":[]}"#);
    }

    #[test]
    fn test_scan_failed_wire_form() {
        let notification = Notification::WifiScanFailed("Failed to start Wi-Fi scan.".into());
        let json = serde_json::to_string(&notification).unwrap();
        assert_eq!(
            json,
            r#"{"type":"wifi_scan_failed","payload":"Failed to start Wi-Fi scan."}"#
        );
    }

    #[test]
    fn test_provisioning_failed_wire_form() {
        let notification = Notification::ProvisioningFailed("store is read-only".into());
        let json = serde_json::to_string(&notification).unwrap();
        assert_eq!(
            json,
            r#"{"type":"provisioning_failed","payload":"store is read-only"}"#
        );
    }
}
