//! wifi-ctrl station implementation

use tokio::sync::OnceCell;
use tracing::{debug, error};
use wifi_ctrl::sta::{RequestClient, WifiSetup};

use crate::{
    backend::WifiStation,
    core::{
        error::{WifiError, WifiResult},
        types::{AccessPointRecord, AuthMode, Credential},
    },
};

/// Station control through wpa_supplicant's control socket
pub struct WifiCtrlStation {
    interface: String,
    client: OnceCell<RequestClient>,
}

impl WifiCtrlStation {
    pub fn new(interface: String) -> Self {
        Self {
            interface,
            client: OnceCell::new(),
        }
    }

    /// Lazily connect to the control socket and spawn the station
    /// runtime; repeated calls reuse the first client.
    async fn client(&self) -> WifiResult<&RequestClient> {
        self.client
            .get_or_try_init(|| async {
                let path = format!("/var/run/wpa_supplicant/{}", self.interface);
                let mut setup =
                    WifiSetup::new().map_err(|e| WifiError::WpaSupplicantError(e.to_string()))?;
                setup.set_socket_path(path);

                let client = setup.get_request_client();
                let station = setup.complete();

                tokio::spawn(async move {
                    if let Err(e) = station.run().await {
                        error!("wifi station runtime error: {e}");
                    }
                });

                Ok(client)
            })
            .await
    }
}

impl WifiStation for WifiCtrlStation {
    async fn init(&self) -> WifiResult<()> {
        debug!("initializing station on interface {}", self.interface);
        self.client().await.map(|_| ())
    }

    async fn start_connection(&self, credential: &Credential) -> WifiResult<()> {
        debug!("starting connection to {}", credential.ssid);
        let client = self.client().await?;

        let network_id = client
            .add_network()
            .await
            .map_err(|e| WifiError::ConnectionFailed(format!("failed to add network: {e}")))?;

        client
            .set_network_ssid(network_id, credential.ssid.clone())
            .await
            .map_err(|e| WifiError::ConnectionFailed(format!("failed to set SSID: {e}")))?;

        // wpa_supplicant takes passphrases quoted; only raw hex PSKs go bare.
        client
            .set_network_psk(network_id, format!("\"{}\"", credential.password))
            .await
            .map_err(|e| WifiError::ConnectionFailed(format!("failed to set passphrase: {e}")))?;

        client
            .select_network(network_id)
            .await
            .map_err(|e| WifiError::ConnectionFailed(format!("failed to select network: {e}")))?;

        debug!("connection attempt started");
        Ok(())
    }

    async fn scan(&self) -> WifiResult<Vec<AccessPointRecord>> {
        debug!("scanning on interface {}", self.interface);
        let client = self.client().await?;

        let results = client
            .get_scan()
            .await
            .map_err(|e| WifiError::ScanFailed(e.to_string()))?;

        let records = results
            .iter()
            .map(|res| AccessPointRecord {
                ssid: res.name.clone(),
                rssi: i8::try_from(res.signal).unwrap_or(i8::MIN),
                // wpa_supplicant scan output does not carry the auth
                // mode through this client.
                auth_mode: AuthMode::Unknown,
            })
            .collect::<Vec<_>>();

        debug!("scan complete, found {} access points", records.len());
        Ok(records)
    }
}
