//! Domain types for BLE Wi-Fi provisioning

use serde::{Deserialize, Serialize};

/// A named Wi-Fi credential as submitted by the companion app
///
/// Uniqueness by SSID is a store-level concern; the core never
/// deduplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Network SSID
    pub ssid: String,
    /// Network passphrase
    pub password: String,
}

/// Access point authentication mode, serialized in the wire form the
/// companion app expects (`OPEN`, `WPA2_PSK`, ...)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMode {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Unknown,
}

/// One discovered access point, produced transiently per scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessPointRecord {
    /// Network SSID
    pub ssid: String,
    /// Signal strength in dBm
    pub rssi: i8,
    /// Authentication mode
    #[serde(rename = "encryption")]
    pub auth_mode: AuthMode,
}

/// Process-wide device state, set by bring-up and the provisioning
/// controller, read by display collaborators
///
/// Transitions are one-directional except `Connecting` back to `Idle`
/// on retry; `BleProvisioning` is terminal until a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Connecting,
    BleProvisioning,
    Connected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_access_point_record_wire_form() {
        let record = AccessPointRecord {
            ssid: "Home".into(),
            rssi: -62,
            auth_mode: AuthMode::Wpa2Psk,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"ssid":"Home","rssi":-62,"encryption":"WPA2_PSK"}"#);
    }

    #[test]
    fn test_auth_mode_wire_names() {
        let cases = [
            (AuthMode::Open, "\"OPEN\""),
            (AuthMode::Wep, "\"WEP\""),
            (AuthMode::WpaPsk, "\"WPA_PSK\""),
            (AuthMode::Wpa2Psk, "\"WPA2_PSK\""),
            (AuthMode::WpaWpa2Psk, "\"WPA_WPA2_PSK\""),
            (AuthMode::Unknown, "\"UNKNOWN\""),
        ];

        for (mode, expected) in cases {
            assert_eq!(serde_json::to_string(&mode).unwrap(), expected);
        }
    }

    #[test]
    fn test_credential_round_trip() {
        let credential = Credential {
            ssid: "Home".into(),
            password: "secret123".into(),
        };

        let json = serde_json::to_string(&credential).unwrap();
        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back, credential);
    }
}
