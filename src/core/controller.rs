//! Provisioning controller: inbound command handling
//!
//! Commands arrive from the transport already decoded. The controller
//! validates them, persists credentials and drives the host restart
//! that hands the new network over to normal boot.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::backend::WifiStation;
use crate::core::scanner::ScanEngine;
use crate::core::types::Credential;
use crate::host::HostControl;
use crate::protocol::{ControlCommand, Notification, ProvisioningCommand};
use crate::store::CredentialStore;
use crate::transport::{CommandSink, NotificationSink};

pub struct ProvisioningController<S, W, H, N>
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    N: NotificationSink,
{
    store: Arc<S>,
    host: Arc<H>,
    scanner: Arc<ScanEngine<W, N>>,
    sink: N,
}

impl<S, W, H, N> ProvisioningController<S, W, H, N>
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    N: NotificationSink,
{
    pub fn new(store: Arc<S>, host: Arc<H>, scanner: Arc<ScanEngine<W, N>>, sink: N) -> Self {
        Self {
            store,
            host,
            scanner,
            sink,
        }
    }

    /// Persist a submitted credential and restart into station mode
    ///
    /// Credentials with an empty SSID or password are discarded with a
    /// log line only; the peer gets no feedback for them. The restart
    /// happens only after the store write succeeded.
    async fn submit_credentials(&self, ssid: String, password: String) {
        if ssid.is_empty() || password.is_empty() {
            warn!("discarding credential submission with empty ssid or password");
            return;
        }

        info!("received credentials for network '{ssid}'");

        if let Err(e) = self.store.add(Credential { ssid, password }).await {
            error!("could not persist credentials: {e}");
            let failure = Notification::ProvisioningFailed(e.to_string());
            if let Err(e) = self.sink.send(failure).await {
                warn!("could not report persist failure to peer: {e}");
            }
            return;
        }

        if let Some(free) = self.host.free_memory_bytes().await {
            info!("credentials stored, free memory {free} bytes, restarting");
        } else {
            info!("credentials stored, restarting");
        }

        if let Err(e) = self.host.restart_device().await {
            error!("device restart failed: {e}");
        }
    }

    async fn request_scan(&self) {
        if let Err(e) = self.scanner.request_scan() {
            info!("scan request rejected: {e}");
        }
    }
}

impl<S, W, H, N> CommandSink for ProvisioningController<S, W, H, N>
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    N: NotificationSink,
{
    async fn handle_command(&self, command: ProvisioningCommand) {
        match command {
            ProvisioningCommand::SubmitCredentials { ssid, password } => {
                self.submit_credentials(ssid, password).await;
            }
            ProvisioningCommand::Control(ControlCommand::RequestWifiScan) => {
                self.request_scan().await;
            }
        }
    }
}
