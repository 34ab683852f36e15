//! Linux host control implementation

use std::sync::RwLock;

use tokio::process::Command;
use tracing::{error, info};

use crate::core::error::{ServiceError, ServiceResult};
use crate::core::types::DeviceState;
use crate::host::HostControl;

/// Host control for a headless Linux device
///
/// Notifications are logged (there is no display attached); restart
/// goes through systemd.
pub struct LinuxHost {
    state: RwLock<DeviceState>,
}

impl LinuxHost {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DeviceState::Idle),
        }
    }

    /// Current device state, for status surfaces
    pub fn device_state(&self) -> DeviceState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn parse_mem_available(meminfo: &str) -> Option<u64> {
        meminfo
            .lines()
            .find(|line| line.starts_with("MemAvailable:"))
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|kb| kb.parse::<u64>().ok())
            .map(|kb| kb * 1024)
    }
}

impl Default for LinuxHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostControl for LinuxHost {
    async fn set_device_state(&self, state: DeviceState) {
        info!(?state, "device state changed");
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    async fn restart_device(&self) -> ServiceResult<()> {
        info!("restarting device");
        let status = Command::new("systemctl")
            .arg("reboot")
            .status()
            .await
            .map_err(|e| ServiceError::Host(format!("failed to run systemctl reboot: {e}")))?;

        if status.success() {
            // The reboot is in flight; park until the process is torn down.
            std::future::pending::<()>().await;
            Ok(())
        } else {
            error!("systemctl reboot exited with {status}");
            Err(ServiceError::Host(format!("systemctl reboot exited with {status}")))
        }
    }

    async fn show_notification(&self, text: &str, duration_ms: u64) {
        info!(duration_ms, "notification: {text}");
    }

    async fn free_memory_bytes(&self) -> Option<u64> {
        let meminfo = tokio::fs::read_to_string("/proc/meminfo").await.ok()?;
        Self::parse_mem_available(&meminfo)
    }
}
