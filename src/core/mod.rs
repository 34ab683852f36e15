//! Core provisioning logic

pub mod bringup;
pub mod controller;
pub mod error;
pub mod scanner;
pub mod types;

pub use {
    bringup::{BringupOutcome, NetworkBringup},
    controller::ProvisioningController,
    scanner::ScanEngine,
};
