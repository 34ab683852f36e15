//! Host application control trait

use trait_variant::make;

use crate::core::error::ServiceResult;
use crate::core::types::DeviceState;

/// The host application surface the provisioning core drives
///
/// Display rendering and the actual reboot mechanism live behind this
/// seam; the core only decides when to call them.
#[make(Send)]
pub trait HostControl: Sync + 'static {
    /// Publish the process-wide device state
    async fn set_device_state(&self, state: DeviceState);

    /// Trigger a device restart
    ///
    /// On real hardware this does not return; an `Err` means the
    /// restart could not even be issued.
    async fn restart_device(&self) -> ServiceResult<()>;

    /// Show a user-facing notification for `duration_ms` milliseconds
    async fn show_notification(&self, text: &str, duration_ms: u64);

    /// Remaining free memory, when the platform can report it
    async fn free_memory_bytes(&self) -> Option<u64>;
}
