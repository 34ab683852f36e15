//! Wi-Fi station trait definition

use trait_variant::make;

use crate::core::error::WifiResult;
use crate::core::types::{AccessPointRecord, Credential};

/// Abstraction over the Wi-Fi station interface (typically
/// wpa_supplicant)
///
/// This trait enables testing with mock implementations while keeping
/// the driver out of the provisioning core.
#[make(Send)]
pub trait WifiStation: Sync + 'static {
    /// Bring the radio up in station mode
    ///
    /// Scanning requires an initialized radio even before any
    /// connection attempt.
    async fn init(&self) -> WifiResult<()>;

    /// Start connecting to `credential`
    ///
    /// Fire-and-forget: the call returns once the attempt is under
    /// way; the outcome is observed asynchronously through station
    /// state callbacks outside this core.
    async fn start_connection(&self, credential: &Credential) -> WifiResult<()>;

    /// Run a full scan and collect the discovered access points
    ///
    /// `Err` means the scan could not be started; `Ok` with an empty
    /// vector means no access points were found. The call blocks for
    /// hundreds of milliseconds to seconds and must run off the BLE
    /// event context.
    async fn scan(&self) -> WifiResult<Vec<AccessPointRecord>>;
}
