//! Mock host control for testing

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::core::error::ServiceResult;
use crate::core::types::DeviceState;
use crate::host::HostControl;

/// Records every host interaction instead of performing it
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    states: Arc<Mutex<Vec<DeviceState>>>,
    notifications: Arc<Mutex<Vec<(String, u64)>>>,
    restarts: Arc<AtomicUsize>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn states(&self) -> Vec<DeviceState> {
        self.states.lock().await.clone()
    }

    pub async fn notifications(&self) -> Vec<(String, u64)> {
        self.notifications.lock().await.clone()
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl HostControl for MockHost {
    async fn set_device_state(&self, state: DeviceState) {
        self.states.lock().await.push(state);
    }

    async fn restart_device(&self) -> ServiceResult<()> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn show_notification(&self, text: &str, duration_ms: u64) {
        self.notifications
            .lock()
            .await
            .push((text.to_owned(), duration_ms));
    }

    async fn free_memory_bytes(&self) -> Option<u64> {
        Some(42 * 1024 * 1024)
    }
}
