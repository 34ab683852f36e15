//! Fixed GATT identifiers for the provisioning channel
//!
//! These match what the companion app discovers: one primary service
//! with a single write/notify/read characteristic.

use uuid::Uuid;

/// Provisioning service UUID
pub const PROVISIONING_SERVICE_UUID: Uuid = Uuid::from_bytes([
    0x00, 0x00, 0xAA, 0xAA, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0x80, 0x5F, 0x9B, 0x34, 0xFB,
]);

/// Command/notify characteristic UUID
pub const PROVISIONING_CHAR_UUID: Uuid = Uuid::from_bytes([
    0x00, 0x00, 0xBB, 0xB1, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0x80, 0x5F, 0x9B, 0x34, 0xFB,
]);

/// Default advertised device name
pub const DEFAULT_DEVICE_NAME: &str = "XZP";

/// ATT header overhead per notification
pub const ATT_HEADER_LEN: usize = 3;

/// ATT MTU assumed before the peer negotiates a larger one
pub const DEFAULT_ATT_MTU: usize = 23;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        assert_eq!(
            PROVISIONING_SERVICE_UUID.to_string(),
            "0000aaaa-0000-1000-8000-00805f9b34fb"
        );
        assert_eq!(
            PROVISIONING_CHAR_UUID.to_string(),
            "0000bbb1-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_uuids_distinct() {
        assert_ne!(PROVISIONING_SERVICE_UUID, PROVISIONING_CHAR_UUID);
    }
}
