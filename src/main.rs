//! BLE Wi-Fi Provisioning Service - Main Entry Point

use std::sync::Arc;

use ble_provisioning_service::{
    backend::{WifiCtrlStation, WifiStation},
    config::{CliArgs, Settings},
    core::{BringupOutcome, NetworkBringup, ProvisioningController, ScanEngine},
    host::{HostControl, LinuxHost},
    store::{CredentialStore, FileCredentialStore},
    transport::{
        Provisioner,
        ble::{self, ChannelCore, ProvisioningChannel},
    },
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ble_provisioning_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    info!(?args, "Starting BLE provisioning service");
    let settings = Settings::from(args);

    let store = Arc::new(FileCredentialStore::new(settings.credential_file.clone()));
    if settings.force_provisioning {
        store.set_force_ap(true).await?;
        info!("forcing provisioning mode for this boot");
    }

    let wifi = Arc::new(WifiCtrlStation::new(settings.interface.clone()));
    info!("Wi-Fi station backend on interface {}", settings.interface);

    let host = Arc::new(LinuxHost::new());

    let session = bluer::Session::new().await?;
    let adapter = session.default_adapter().await?;
    info!("Using BLE adapter: {}", adapter.name());

    let core = ChannelCore::new(settings.max_notify_chunk);
    let sender = core.sender();
    let scanner = Arc::new(ScanEngine::new(wifi.clone(), sender.clone()));
    let controller = Arc::new(ProvisioningController::new(
        store.clone(),
        host.clone(),
        scanner,
        sender,
    ));
    let channel = Arc::new(ProvisioningChannel::new(
        adapter,
        settings.device_name.clone(),
        core,
        controller,
    ));

    let bringup = NetworkBringup::new(store, wifi, host, channel.clone());

    match bringup.start_network().await? {
        BringupOutcome::Provisioning => {
            let event_channel = channel.clone();
            let events = tokio::spawn(async move {
                if let Err(e) = ble::run_event_loop(event_channel).await {
                    error!("BLE event loop error: {e}");
                }
            });

            run_until_shutdown(&bringup).await;

            channel.stop().await;
            events.abort();
        }
        BringupOutcome::Connecting => {
            run_until_shutdown(&bringup).await;
        }
    }

    info!("Shutting down...");
    Ok(())
}

/// Wait for SIGINT/SIGTERM; SIGUSR1 rearms provisioning mode and
/// restarts the device
#[cfg(unix)]
async fn run_until_shutdown<S, W, H, P>(bringup: &NetworkBringup<S, W, H, P>)
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    P: Provisioner,
{
    use tokio::signal::unix::{Signal, SignalKind, signal};

    fn register(kind: SignalKind) -> Option<Signal> {
        match signal(kind) {
            Ok(sig) => Some(sig),
            Err(e) => {
                error!("Failed to register signal handler: {e}");
                None
            }
        }
    }

    async fn recv(slot: &mut Option<Signal>) {
        match slot {
            Some(sig) => {
                sig.recv().await;
            }
            None => std::future::pending().await,
        }
    }

    let mut sigterm = register(SignalKind::terminate());
    let mut sigusr1 = register(SignalKind::user_defined1());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                break;
            }
            _ = recv(&mut sigterm) => {
                info!("Received SIGTERM, shutting down gracefully");
                break;
            }
            _ = recv(&mut sigusr1) => {
                info!("Received SIGUSR1, rearming provisioning mode");
                if let Err(e) = bringup.reset_provisioning().await {
                    error!("Provisioning reset failed: {e}");
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn run_until_shutdown<S, W, H, P>(_bringup: &NetworkBringup<S, W, H, P>)
where
    S: CredentialStore,
    W: WifiStation,
    H: HostControl,
    P: Provisioner,
{
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received SIGINT (Ctrl+C), shutting down gracefully");
    }
}
