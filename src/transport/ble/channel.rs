//! The provisioning channel: one GATT service, one characteristic
//!
//! The channel owns the advertising lifecycle and the single
//! connection handle. Advertising is the resting state: after a peer
//! disconnects the device immediately becomes connectable again, until
//! `stop()` tears the stack down.

use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bluer::{Adapter, Address};
use bluer::adv::{Advertisement, AdvertisementHandle};
use bluer::gatt::local::{ApplicationHandle, CharacteristicNotifier};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::error::{TransportError, TransportResult};
use crate::protocol::{Notification, fragment};
use crate::transport::ble::gatt::provisioning_application;
use crate::transport::ble::uuids::{ATT_HEADER_LEN, DEFAULT_ATT_MTU, PROVISIONING_SERVICE_UUID};
use crate::transport::{CommandSink, NotificationSink, Provisioner};

/// Channel lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    NotStarted,
    Advertising,
    Connected,
}

/// Pure lifecycle state machine, driven by the BLE stack events
#[derive(Debug)]
struct ChannelStateMachine {
    state: ChannelState,
}

impl ChannelStateMachine {
    fn new() -> Self {
        Self {
            state: ChannelState::NotStarted,
        }
    }

    fn on_start(&mut self) -> TransportResult<()> {
        match self.state {
            ChannelState::NotStarted => {
                self.state = ChannelState::Advertising;
                Ok(())
            }
            _ => Err(TransportError::AlreadyStarted),
        }
    }

    fn on_stop(&mut self) {
        self.state = ChannelState::NotStarted;
    }

    fn on_peer_connected(&mut self) {
        if self.state != ChannelState::NotStarted {
            self.state = ChannelState::Connected;
        }
    }

    /// Returns true when a live connection was dropped and advertising
    /// resumes
    fn on_peer_disconnected(&mut self) -> bool {
        if self.state == ChannelState::Connected {
            self.state = ChannelState::Advertising;
            true
        } else {
            false
        }
    }

    fn state(&self) -> ChannelState {
        self.state
    }
}

/// Shared channel state: the connection handle, the subscribed peer's
/// address, the observed ATT MTU and the lifecycle state machine
///
/// The handle slot is mutex-protected: unlike a NimBLE host, nothing
/// serializes our callback contexts for us.
pub struct ChannelCore {
    link: Mutex<Option<CharacteristicNotifier>>,
    peer: StdMutex<Option<Address>>,
    state: StdMutex<ChannelStateMachine>,
    mtu: AtomicUsize,
    max_chunk: usize,
}

impl ChannelCore {
    pub fn new(max_chunk: usize) -> Arc<Self> {
        Arc::new(Self {
            link: Mutex::new(None),
            peer: StdMutex::new(None),
            state: StdMutex::new(ChannelStateMachine::new()),
            mtu: AtomicUsize::new(DEFAULT_ATT_MTU),
            max_chunk,
        })
    }

    /// A cloneable sender for the notification path
    pub fn sender(self: &Arc<Self>) -> NotifySender {
        NotifySender {
            core: self.clone(),
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).state()
    }

    /// Bytes of payload that fit one notification
    fn notify_budget(&self) -> usize {
        let mtu = self.mtu.load(Ordering::Relaxed);
        mtu.saturating_sub(ATT_HEADER_LEN).min(self.max_chunk).max(1)
    }

    /// Record the ATT MTU observed on a characteristic access
    pub(crate) fn observe_mtu(&self, mtu: usize) {
        self.mtu.store(mtu.max(DEFAULT_ATT_MTU), Ordering::Relaxed);
    }

    /// Record the address behind a characteristic access; disconnect
    /// events for any other address leave the link alone
    pub(crate) fn observe_peer(&self, addr: Address) {
        *self.peer.lock().unwrap_or_else(|e| e.into_inner()) = Some(addr);
    }

    fn clear_peer(&self) {
        *self.peer.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Whether a link-down report for `addr` concerns the live link
    ///
    /// A stopped notifier is dead whatever the address says; otherwise
    /// only the recorded peer's address counts. With no recorded peer
    /// and a live notifier the event is unattributable and ignored.
    fn link_matches(&self, addr: Address, notifier_stopped: bool) -> bool {
        if notifier_stopped {
            return true;
        }
        *self.peer.lock().unwrap_or_else(|e| e.into_inner()) == Some(addr)
    }

    /// A peer subscribed to notifications: this is the connect event.
    /// Any stale handle is replaced; at most one link is live.
    pub(crate) async fn peer_connected(&self, notifier: CharacteristicNotifier) {
        info!("peer connected");
        *self.link.lock().await = Some(notifier);
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_peer_connected();
    }

    /// Handle a link-down report for `addr`
    ///
    /// Only a report matching the subscribed peer (or a notifier that
    /// already stopped) clears the handle and resumes advertising;
    /// bluetoothd also removes cached device objects of unrelated
    /// peers and those must not tear down the live link.
    pub(crate) async fn peer_disconnected(&self, addr: Address) {
        let mut link = self.link.lock().await;
        let Some(notifier) = link.as_ref() else {
            return;
        };
        if !self.link_matches(addr, notifier.is_stopped()) {
            debug!("ignoring disconnect of unrelated device {addr}");
            return;
        }

        *link = None;
        drop(link);
        self.clear_peer();
        let resumed = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_peer_disconnected();
        if resumed {
            info!("peer {addr} disconnected, advertising resumed");
        }
    }

    async fn clear_link(&self) {
        *self.link.lock().await = None;
        self.clear_peer();
    }

    fn note_link_lost(&self) {
        self.clear_peer();
        if self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_peer_disconnected()
        {
            info!("connection lost, advertising resumed");
        }
    }

    /// Serialize and push one notification to the current connection
    ///
    /// Payloads beyond the notify budget are split into fragment
    /// envelopes; with a budget too small to carry an envelope the
    /// send is refused so the transport never truncates a frame. With
    /// no live connection the message is dropped and an error
    /// returned; there is no buffering and no retry.
    pub async fn send_message(&self, message: &Notification) -> TransportResult<()> {
        let json = serde_json::to_string(message)?;
        let frames = fragment::split(&json, self.notify_budget())?;

        let mut link = self.link.lock().await;
        let Some(mut notifier) = link.take() else {
            warn!("no active connection, dropping {} byte notification", json.len());
            return Err(TransportError::NotConnected);
        };

        if notifier.is_stopped() {
            self.note_link_lost();
            warn!("connection handle stale, dropping {} byte notification", json.len());
            return Err(TransportError::NotConnected);
        }

        let frame_count = frames.len();
        for frame in frames {
            if let Err(e) = notifier.notify(frame.into_bytes()).await {
                self.note_link_lost();
                return Err(TransportError::Ble(e.to_string()));
            }
        }

        debug!("notification sent ({json_len} bytes, {frame_count} frame(s))", json_len = json.len());
        *link = Some(notifier);
        Ok(())
    }
}

/// Cloneable handle for pushing notifications through the channel
#[derive(Clone)]
pub struct NotifySender {
    core: Arc<ChannelCore>,
}

impl NotificationSink for NotifySender {
    async fn send(&self, message: Notification) -> TransportResult<()> {
        self.core.send_message(&message).await
    }
}

struct ChannelHandles {
    _advertisement: AdvertisementHandle,
    _application: ApplicationHandle,
}

/// BLE provisioning channel
///
/// Owns the adapter, the registered GATT application and the
/// advertisement; translates stack events into controller calls.
pub struct ProvisioningChannel<C: CommandSink> {
    adapter: Adapter,
    device_name: String,
    controller: Arc<C>,
    core: Arc<ChannelCore>,
    handles: Mutex<Option<ChannelHandles>>,
}

impl<C: CommandSink> ProvisioningChannel<C> {
    pub fn new(
        adapter: Adapter,
        device_name: String,
        core: Arc<ChannelCore>,
        controller: Arc<C>,
    ) -> Self {
        Self {
            adapter,
            device_name,
            controller,
            core,
            handles: Mutex::new(None),
        }
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn core(&self) -> &Arc<ChannelCore> {
        &self.core
    }

    /// Initialize the host stack, register the GATT service and begin
    /// advertising
    ///
    /// A second call while started is a logged no-op. On registration
    /// failure the channel stays `NotStarted` with no handles held;
    /// there is no automatic retry.
    pub async fn start(&self) -> TransportResult<()> {
        if self
            .core
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_start()
            .is_err()
        {
            warn!("provisioning channel already started");
            return Ok(());
        }

        match self.register().await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("failed to start provisioning channel: {e}");
                self.handles.lock().await.take();
                self.core
                    .state
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .on_stop();
                Err(e)
            }
        }
    }

    async fn register(&self) -> TransportResult<()> {
        self.adapter.set_powered(true).await?;
        self.adapter.set_alias(self.device_name.clone()).await?;
        self.adapter.set_discoverable(true).await?;

        let advertisement = Advertisement {
            service_uuids: vec![PROVISIONING_SERVICE_UUID].into_iter().collect(),
            discoverable: Some(true),
            local_name: Some(self.device_name.clone()),
            ..Default::default()
        };
        let advertisement = self.adapter.advertise(advertisement).await?;

        let application =
            provisioning_application(self.controller.clone(), self.core.clone());
        let application = self.adapter.serve_gatt_application(application).await?;

        *self.handles.lock().await = Some(ChannelHandles {
            _advertisement: advertisement,
            _application: application,
        });

        info!("provisioning channel advertising as '{}'", self.device_name);
        Ok(())
    }

    /// Tear down advertising and the GATT registration; safe to call
    /// when never started
    pub async fn stop(&self) {
        let handles = self.handles.lock().await.take();
        if handles.is_none() {
            debug!("provisioning channel not started, nothing to stop");
            return;
        }
        // Dropping the handles unregisters the advertisement and the
        // application with bluetoothd.
        drop(handles);

        self.core.clear_link().await;
        if let Err(e) = self.adapter.set_discoverable(false).await {
            warn!("could not clear discoverable flag: {e}");
        }
        self.core
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_stop();
        info!("provisioning channel stopped");
    }

    /// A device at `addr` went away; clears the handle and resumes
    /// advertising only when it was the subscribed peer
    pub async fn handle_disconnect(&self, addr: Address) {
        self.core.peer_disconnected(addr).await;
    }
}

impl<C: CommandSink> Provisioner for ProvisioningChannel<C> {
    async fn start(&self) -> TransportResult<()> {
        ProvisioningChannel::start(self).await
    }
}
