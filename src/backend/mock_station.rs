//! Mock Wi-Fi station for testing

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::WifiStation;
use crate::core::error::{WifiError, WifiResult};
use crate::core::types::{AccessPointRecord, Credential};

#[derive(Debug, Default)]
struct MockState {
    scan_results: Vec<AccessPointRecord>,
    should_fail_scan: bool,
    scan_delay_ms: u64,
    init_count: usize,
    connections: Vec<Credential>,
}

/// Mock station with configurable scan behavior
#[derive(Debug, Clone, Default)]
pub struct MockWifiStation {
    inner: Arc<Mutex<MockState>>,
}

impl MockWifiStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_scan_results(&self, records: Vec<AccessPointRecord>) {
        self.inner.lock().await.scan_results = records;
    }

    pub async fn set_scan_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_scan = should_fail;
    }

    /// Make scans take a while, to exercise the in-flight guard
    pub async fn set_scan_delay_ms(&self, delay: u64) {
        self.inner.lock().await.scan_delay_ms = delay;
    }

    pub async fn init_count(&self) -> usize {
        self.inner.lock().await.init_count
    }

    pub async fn connections(&self) -> Vec<Credential> {
        self.inner.lock().await.connections.clone()
    }
}

impl WifiStation for MockWifiStation {
    async fn init(&self) -> WifiResult<()> {
        self.inner.lock().await.init_count += 1;
        Ok(())
    }

    async fn start_connection(&self, credential: &Credential) -> WifiResult<()> {
        self.inner.lock().await.connections.push(credential.clone());
        Ok(())
    }

    async fn scan(&self) -> WifiResult<Vec<AccessPointRecord>> {
        let (delay, outcome) = {
            let state = self.inner.lock().await;
            let outcome = if state.should_fail_scan {
                Err(WifiError::ScanFailed("mock scan failure".into()))
            } else {
                Ok(state.scan_results.clone())
            };
            (state.scan_delay_ms, outcome)
        };

        if delay > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
        }
        outcome
    }
}
