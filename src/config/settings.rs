//! Runtime settings

use std::path::PathBuf;

use crate::config::CliArgs;

/// Runtime configuration settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub interface: String,
    pub credential_file: PathBuf,
    pub device_name: String,
    pub force_provisioning: bool,
    pub max_notify_chunk: usize,
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        Settings {
            interface: args.interface,
            credential_file: PathBuf::from(args.credential_file),
            device_name: args.device_name,
            force_provisioning: args.force_provisioning,
            max_notify_chunk: args.max_notify_chunk.max(1),
        }
    }
}
