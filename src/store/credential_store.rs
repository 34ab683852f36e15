//! Credential store trait definition

use trait_variant::make;

use crate::core::error::ServiceResult;
use crate::core::types::Credential;

/// Persistent storage for Wi-Fi credentials and the force-AP flag
///
/// The store is the single writer of persisted credentials; the core
/// never reads back what it wrote within a session and relies on a
/// restart to re-evaluate bring-up.
#[make(Send)]
pub trait CredentialStore: Sync + 'static {
    /// Ordered list of stored credentials; the first entry is the
    /// primary connection candidate
    async fn list(&self) -> ServiceResult<Vec<Credential>>;

    /// Append a credential to the store
    async fn add(&self, credential: Credential) -> ServiceResult<()>;

    /// Read the persisted force-AP flag; false when unreadable
    async fn force_ap(&self) -> bool;

    /// Persist the force-AP flag
    async fn set_force_ap(&self, value: bool) -> ServiceResult<()>;
}
