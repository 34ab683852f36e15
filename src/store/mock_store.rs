//! Mock credential store for testing

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::error::{ServiceError, ServiceResult};
use crate::core::types::Credential;
use crate::store::CredentialStore;

#[derive(Debug, Default)]
struct MockState {
    credentials: Vec<Credential>,
    force_ap: bool,
    fail_writes: bool,
}

/// In-memory credential store with configurable write failures
#[derive(Debug, Clone, Default)]
pub struct MockCredentialStore {
    inner: Arc<Mutex<MockState>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_credentials(self, credentials: Vec<Credential>) -> Self {
        self.inner.lock().await.credentials = credentials;
        self
    }

    pub async fn with_force_ap(self, value: bool) -> Self {
        self.inner.lock().await.force_ap = value;
        self
    }

    /// Make subsequent add/set operations fail
    pub async fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().await.fail_writes = fail;
    }

    pub async fn credentials(&self) -> Vec<Credential> {
        self.inner.lock().await.credentials.clone()
    }
}

impl CredentialStore for MockCredentialStore {
    async fn list(&self) -> ServiceResult<Vec<Credential>> {
        Ok(self.inner.lock().await.credentials.clone())
    }

    async fn add(&self, credential: Credential) -> ServiceResult<()> {
        let mut state = self.inner.lock().await;
        if state.fail_writes {
            return Err(ServiceError::Store("mock write failure".into()));
        }
        state.credentials.push(credential);
        Ok(())
    }

    async fn force_ap(&self) -> bool {
        self.inner.lock().await.force_ap
    }

    async fn set_force_ap(&self, value: bool) -> ServiceResult<()> {
        let mut state = self.inner.lock().await;
        if state.fail_writes {
            return Err(ServiceError::Store("mock write failure".into()));
        }
        state.force_ap = value;
        Ok(())
    }
}
