//! Background Wi-Fi scan engine
//!
//! Scans run on a spawned task so the GATT write that requested them
//! returns immediately. Results always surface as a notification,
//! never as a write response.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::backend::WifiStation;
use crate::core::error::{ServiceError, ServiceResult};
use crate::protocol::Notification;
use crate::transport::NotificationSink;

/// Coordinates scan execution and result delivery
///
/// At most one scan is in flight; further requests are rejected until
/// the running one resolves.
pub struct ScanEngine<W: WifiStation, N: NotificationSink> {
    wifi: Arc<W>,
    sink: N,
    in_flight: Arc<AtomicBool>,
}

impl<W: WifiStation, N: NotificationSink> ScanEngine<W, N> {
    pub fn new(wifi: Arc<W>, sink: N) -> Self {
        Self {
            wifi,
            sink,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a scan in the background
    ///
    /// Returns an error when a scan is already running. The outcome,
    /// success or failure, is reported through the notification sink
    /// exactly once per accepted request.
    pub fn request_scan(&self) -> ServiceResult<()> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ServiceError::ScanInProgress);
        }

        let wifi = self.wifi.clone();
        let sink = self.sink.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            let message = match wifi.scan().await {
                Ok(records) => {
                    debug!("scan finished with {} access point(s)", records.len());
                    Notification::WifiScanResult(records)
                }
                Err(e) => {
                    warn!("scan failed: {e}");
                    Notification::WifiScanFailed(e.to_string())
                }
            };

            if let Err(e) = sink.send(message).await {
                warn!("could not deliver scan outcome: {e}");
            }

            in_flight.store(false, Ordering::Release);
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockWifiStation;
    use crate::core::types::{AccessPointRecord, AuthMode};
    use crate::transport::MockNotificationSink;

    fn record(ssid: &str, rssi: i8) -> AccessPointRecord {
        AccessPointRecord {
            ssid: ssid.into(),
            rssi,
            auth_mode: AuthMode::Wpa2Psk,
        }
    }

    #[tokio::test]
    async fn test_scan_success_notifies_results() {
        let wifi = Arc::new(MockWifiStation::new());
        wifi.set_scan_results(vec![record("Home", -62), record("Cafe", -80)])
            .await;
        let sink = MockNotificationSink::new();
        let engine = ScanEngine::new(wifi, sink.clone());

        engine.request_scan().unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            Notification::WifiScanResult(vec![record("Home", -62), record("Cafe", -80)])
        );
    }

    #[tokio::test]
    async fn test_empty_scan_is_a_result_not_a_failure() {
        let wifi = Arc::new(MockWifiStation::new());
        let sink = MockNotificationSink::new();
        let engine = ScanEngine::new(wifi, sink.clone());

        engine.request_scan().unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert_eq!(sink.sent(), vec![Notification::WifiScanResult(vec![])]);
    }

    #[tokio::test]
    async fn test_scan_failure_notifies_exactly_once() {
        let wifi = Arc::new(MockWifiStation::new());
        wifi.set_scan_failure(true).await;
        let sink = MockNotificationSink::new();
        let engine = ScanEngine::new(wifi, sink.clone());

        engine.request_scan().unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0], Notification::WifiScanFailed(_)));
    }

    #[tokio::test]
    async fn test_concurrent_scan_rejected() {
        let wifi = Arc::new(MockWifiStation::new());
        wifi.set_scan_delay_ms(50).await;
        let sink = MockNotificationSink::new();
        let engine = ScanEngine::new(wifi, sink.clone());

        engine.request_scan().unwrap();
        assert!(matches!(
            engine.request_scan(),
            Err(ServiceError::ScanInProgress)
        ));

        // The rejected request produces no notification of its own.
        tokio::time::sleep(tokio::time::Duration::from_millis(80)).await;
        assert_eq!(sink.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_guard_released_after_completion() {
        let wifi = Arc::new(MockWifiStation::new());
        let sink = MockNotificationSink::new();
        let engine = ScanEngine::new(wifi, sink.clone());

        engine.request_scan().unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        engine.request_scan().unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        assert_eq!(sink.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_sink_failure_still_releases_guard() {
        let wifi = Arc::new(MockWifiStation::new());
        let sink = MockNotificationSink::new();
        sink.set_fail_sends(true);
        let engine = ScanEngine::new(wifi, sink.clone());

        engine.request_scan().unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert!(sink.sent().is_empty());
        assert!(engine.request_scan().is_ok());
    }
}
