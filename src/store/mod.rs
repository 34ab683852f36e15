//! Credential persistence layer

pub mod credential_store;
pub mod file_store;
pub mod mock_store;

pub use credential_store::CredentialStore;
pub use file_store::FileCredentialStore;

#[cfg(test)]
pub use mock_store::MockCredentialStore;
