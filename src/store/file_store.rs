//! JSON-file credential store

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::error::{ServiceError, ServiceResult};
use crate::core::types::Credential;
use crate::store::CredentialStore;

/// On-disk representation of the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    force_ap: bool,
    #[serde(default)]
    credentials: Vec<Credential>,
}

/// File-backed credential store
///
/// Reads and rewrites a single JSON file under an internal lock; a
/// missing or corrupt file reads as an empty store.
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> StoreFile {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(file) => file,
                Err(e) => {
                    warn!("credential file {} is corrupt ({e}), treating as empty", self.path.display());
                    StoreFile::default()
                }
            },
            Err(e) => {
                debug!("credential file {} not readable ({e}), treating as empty", self.path.display());
                StoreFile::default()
            }
        }
    }

    async fn save(&self, file: &StoreFile) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Store(e.to_string()))?;
        }
        let bytes = serde_json::to_vec_pretty(file).map_err(|e| ServiceError::Store(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| ServiceError::Store(e.to_string()))
    }
}

impl CredentialStore for FileCredentialStore {
    async fn list(&self) -> ServiceResult<Vec<Credential>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await.credentials)
    }

    async fn add(&self, credential: Credential) -> ServiceResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await;
        file.credentials.push(credential);
        self.save(&file).await
    }

    async fn force_ap(&self) -> bool {
        let _guard = self.lock.lock().await;
        self.load().await.force_ap
    }

    async fn set_force_ap(&self, value: bool) -> ServiceResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await;
        file.force_ap = value;
        self.save(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("credentials.json"))
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.force_ap().await);
    }

    #[tokio::test]
    async fn test_add_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileCredentialStore::new(&path);
        store
            .add(Credential {
                ssid: "Home".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap();

        let reopened = FileCredentialStore::new(&path);
        let list = reopened.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].ssid, "Home");
    }

    #[tokio::test]
    async fn test_ordering_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for ssid in ["First", "Second", "Third"] {
            store
                .add(Credential {
                    ssid: ssid.into(),
                    password: "pw".into(),
                })
                .await
                .unwrap();
        }

        let list = store.list().await.unwrap();
        let ssids: Vec<_> = list.iter().map(|c| c.ssid.as_str()).collect();
        assert_eq!(ssids, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_force_ap_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.set_force_ap(true).await.unwrap();
        assert!(store.force_ap().await);

        store.set_force_ap(false).await.unwrap();
        assert!(!store.force_ap().await);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.force_ap().await);
    }

    #[tokio::test]
    async fn test_unwritable_path_reports_error() {
        let store = FileCredentialStore::new("/proc/does-not-exist/credentials.json");
        let result = store
            .add(Credential {
                ssid: "Home".into(),
                password: "pw".into(),
            })
            .await;
        assert!(result.is_err());
    }
}
