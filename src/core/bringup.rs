//! Boot-time network bring-up decision
//!
//! On every boot the device either joins a stored network or opens the
//! BLE provisioning channel. The forced-provisioning flag overrides
//! stored credentials for exactly one boot.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::backend::WifiStation;
use crate::core::error::{ServiceError, ServiceResult};
use crate::core::types::DeviceState;
use crate::host::HostControl;
use crate::store::CredentialStore;
use crate::transport::Provisioner;

/// Which mode bring-up selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringupOutcome {
    /// BLE provisioning channel opened, waiting for credentials
    Provisioning,
    /// Joining a stored network
    Connecting,
}

pub struct NetworkBringup<S, W, H, P>
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    P: Provisioner,
{
    store: Arc<S>,
    wifi: Arc<W>,
    host: Arc<H>,
    provisioner: Arc<P>,
}

impl<S, W, H, P> NetworkBringup<S, W, H, P>
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    P: Provisioner,
{
    pub fn new(store: Arc<S>, wifi: Arc<W>, host: Arc<H>, provisioner: Arc<P>) -> Self {
        Self {
            store,
            wifi,
            host,
            provisioner,
        }
    }

    /// Decide between provisioning mode and joining a stored network
    ///
    /// The forced flag is consumed here: it is cleared before anything
    /// else happens so the next boot falls back to the normal
    /// decision.
    pub async fn start_network(&self) -> ServiceResult<BringupOutcome> {
        let forced = self.store.force_ap().await;
        if forced {
            if let Err(e) = self.store.set_force_ap(false).await {
                warn!("could not clear forced provisioning flag: {e}");
            }
        }

        let credentials = self.store.list().await?;

        if forced || credentials.is_empty() {
            if forced {
                info!("provisioning mode forced for this boot");
            } else {
                info!("no stored credentials, entering provisioning mode");
            }
            self.host
                .set_device_state(DeviceState::BleProvisioning)
                .await;
            self.wifi.init().await?;
            self.provisioner
                .start()
                .await
                .map_err(|e| ServiceError::Transport(e.to_string()))?;
            return Ok(BringupOutcome::Provisioning);
        }

        let credential = &credentials[0];
        info!("joining stored network '{}'", credential.ssid);
        self.host.set_device_state(DeviceState::Connecting).await;
        self.wifi.init().await?;
        self.wifi.start_connection(credential).await?;
        Ok(BringupOutcome::Connecting)
    }

    /// Flag the next boot for provisioning and restart
    pub async fn reset_provisioning(&self) -> ServiceResult<()> {
        self.store.set_force_ap(true).await?;
        self.host
            .show_notification("Provisioning mode on next restart", 2000)
            .await;
        // Give the host a moment to render the notice.
        tokio::time::sleep(Duration::from_secs(1)).await;
        self.host.restart_device().await
    }
}
