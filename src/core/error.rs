//! Error types for the BLE provisioning service

use thiserror::Error;

/// Result type for Wi-Fi station operations
pub type WifiResult<T> = Result<T, WifiError>;

/// Result type for core service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type for the BLE transport
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by the Wi-Fi station backend
#[derive(Error, Debug, Clone)]
pub enum WifiError {
    #[error("Wi-Fi scan failed: {0}")]
    ScanFailed(String),

    #[error("connection start failed: {0}")]
    ConnectionFailed(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("wpa_supplicant error: {0}")]
    WpaSupplicantError(String),
}

/// Errors raised by the core provisioning logic
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("a scan is already in flight")]
    ScanInProgress,

    #[error("credential store error: {0}")]
    Store(String),

    #[error("host control error: {0}")]
    Host(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend error: {0}")]
    Backend(#[from] WifiError),
}

/// Errors raised by the BLE provisioning channel
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no active connection")]
    NotConnected,

    #[error("channel already started")]
    AlreadyStarted,

    #[error("notify budget of {budget} bytes cannot carry a fragment envelope (minimum {min})")]
    BudgetTooSmall { budget: usize, min: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("BLE error: {0}")]
    Ble(String),
}

impl From<bluer::Error> for TransportError {
    fn from(err: bluer::Error) -> Self {
        TransportError::Ble(err.to_string())
    }
}
