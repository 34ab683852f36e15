//! Wire protocol carried over the provisioning characteristic

pub mod command;
pub mod fragment;
pub mod notification;

pub use {
    command::{ControlCommand, ProvisioningCommand},
    fragment::{FragmentFrame, MIN_FRAGMENT_BUDGET, Reassembler},
    notification::Notification,
};
