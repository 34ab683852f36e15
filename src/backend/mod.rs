//! Wi-Fi station abstraction layer

pub mod mock_station;
pub mod wifi_ctrl_station;
pub mod wifi_station;

pub use wifi_ctrl_station::WifiCtrlStation;
pub use wifi_station::WifiStation;

#[cfg(test)]
pub use mock_station::MockWifiStation;
