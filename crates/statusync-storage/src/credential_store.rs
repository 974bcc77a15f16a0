//! OS 키체인 토큰 저장소.
//!
//! macOS Keychain, Windows Credential Manager, Linux Secret Service에
//! GitHub 토큰을 보관한다. 키체인 호출은 블로킹이므로 `spawn_blocking`에서 수행한다.

use keyring::Entry;
use statusync_core::error::CoreError;
use std::sync::Arc;
use tracing::{debug, info};

/// 키체인 서비스 이름
pub const KEYRING_SERVICE: &str = "statusync";
/// 키체인 계정 이름
pub const KEYRING_ACCOUNT: &str = "github-token";

/// 키체인 토큰 저장소
#[derive(Clone)]
pub struct KeyringCredentialStore {
    entry: Arc<Entry>,
}

impl KeyringCredentialStore {
    /// 기본 서비스/계정으로 생성
    pub fn new() -> Result<Self, CoreError> {
        Self::with_account(KEYRING_SERVICE, KEYRING_ACCOUNT)
    }

    /// 지정한 서비스/계정으로 생성
    pub fn with_account(service: &str, account: &str) -> Result<Self, CoreError> {
        let entry = Entry::new(service, account)
            .map_err(|e| CoreError::Storage(format!("키체인 항목 생성 실패: {e}")))?;
        Ok(Self {
            entry: Arc::new(entry),
        })
    }

    /// 저장된 토큰 조회 (없으면 `None`)
    pub async fn load(&self) -> Result<Option<String>, CoreError> {
        let entry = self.entry.clone();
        let result = tokio::task::spawn_blocking(move || entry.get_password())
            .await
            .map_err(|e| CoreError::Internal(format!("키체인 작업 join 실패: {e}")))?;

        match result {
            Ok(token) => {
                debug!("키체인 토큰 조회 성공");
                Ok(Some(token))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CoreError::Storage(format!("키체인 조회 실패: {e}"))),
        }
    }

    /// 토큰 저장 (덮어쓰기)
    pub async fn save(&self, token: &str) -> Result<(), CoreError> {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(CoreError::Validation {
                field: "token".to_string(),
                message: "빈 토큰은 저장할 수 없습니다".to_string(),
            });
        }

        let entry = self.entry.clone();
        tokio::task::spawn_blocking(move || entry.set_password(&token))
            .await
            .map_err(|e| CoreError::Internal(format!("키체인 작업 join 실패: {e}")))?
            .map_err(|e| CoreError::Storage(format!("키체인 저장 실패: {e}")))?;

        info!("GitHub 토큰을 키체인에 저장");
        Ok(())
    }

    /// 토큰 삭제: 삭제했으면 `true`
    pub async fn delete(&self) -> Result<bool, CoreError> {
        let entry = self.entry.clone();
        let result = tokio::task::spawn_blocking(move || entry.delete_credential())
            .await
            .map_err(|e| CoreError::Internal(format!("키체인 작업 join 실패: {e}")))?;

        match result {
            Ok(()) => {
                info!("키체인 토큰 삭제");
                Ok(true)
            }
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(CoreError::Storage(format!("키체인 삭제 실패: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_store() -> KeyringCredentialStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringCredentialStore::with_account("statusync-test", "github-token").unwrap()
    }

    #[tokio::test]
    async fn save_load_delete() {
        let store = mock_store();
        assert!(store.load().await.unwrap().is_none());

        store.save("  ghp_secret\n").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("ghp_secret"));

        assert!(store.delete().await.unwrap());
        assert!(store.load().await.unwrap().is_none());
        assert!(!store.delete().await.unwrap());
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let store = mock_store();
        let err = store.save("   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }
}
