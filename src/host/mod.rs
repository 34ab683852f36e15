//! Host application abstraction layer

pub mod host_control;
pub mod linux_host;
pub mod mock_host;

pub use host_control::HostControl;
pub use linux_host::LinuxHost;

#[cfg(test)]
pub use mock_host::MockHost;
