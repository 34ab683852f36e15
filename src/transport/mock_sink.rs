//! Recording notification sink for tests

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::error::{TransportError, TransportResult};
use crate::protocol::Notification;
use crate::transport::NotificationSink;

/// Sink that records every notification instead of sending it
#[derive(Clone, Default)]
pub struct MockNotificationSink {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail_sends: Arc<AtomicBool>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail as if no peer were connected
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl NotificationSink for MockNotificationSink {
    async fn send(&self, message: Notification) -> TransportResult<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        Ok(())
    }
}
