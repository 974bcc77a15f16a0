//! GitHub 토큰 제공 체인.
//!
//! 환경 변수 → OS 키체인 → 터미널 입력 순으로 토큰을 찾는다.
//! 터미널에서 입력받은 토큰은 키체인에 저장한다.

use async_trait::async_trait;
use statusync_core::error::CoreError;
use statusync_core::ports::credential::CredentialProvider;
use statusync_storage::credential_store::KeyringCredentialStore;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, info, warn};

/// 토큰 환경 변수
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// 자격증명 체인
pub struct CredentialChain {
    env_var: String,
    store: KeyringCredentialStore,
    interactive: bool,
}

impl CredentialChain {
    /// 기본 환경 변수, 대화형 입력 허용
    pub fn new(store: KeyringCredentialStore) -> Self {
        Self {
            env_var: TOKEN_ENV_VAR.to_string(),
            store,
            interactive: true,
        }
    }

    /// 조회할 환경 변수 이름 지정
    pub fn with_env_var(mut self, name: &str) -> Self {
        self.env_var = name.to_string();
        self
    }

    /// 터미널 입력 허용 여부
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    fn from_env(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[async_trait]
impl CredentialProvider for CredentialChain {
    async fn provide(&self) -> Result<String, CoreError> {
        if let Some(token) = self.from_env() {
            debug!("{}에서 토큰 사용", self.env_var);
            return Ok(token);
        }

        match self.store.load().await {
            Ok(Some(token)) => return Ok(token),
            Ok(None) => debug!("키체인에 저장된 토큰 없음"),
            Err(e) => warn!("키체인 조회 실패: {e}"),
        }

        if !self.interactive || !io::stdin().is_terminal() {
            return Err(CoreError::Auth(format!(
                "GitHub 토큰 없음: {} 설정 또는 `statusync login` 실행",
                self.env_var
            )));
        }

        let token = read_token().await?;
        if let Err(e) = self.store.save(&token).await {
            warn!("토큰 키체인 저장 실패 (이번 실행에만 사용): {e}");
        }
        Ok(token)
    }
}

/// 터미널에서 토큰 입력 (빈 입력은 취소)
pub async fn read_token() -> Result<String, CoreError> {
    let line = tokio::task::spawn_blocking(|| -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "GitHub 토큰 (user scope): ")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await
    .map_err(|e| CoreError::Internal(format!("토큰 입력 작업 join 실패: {e}")))??;

    let token = line.trim().to_string();
    if token.is_empty() {
        return Err(CoreError::Cancelled);
    }

    info!("GitHub 토큰 입력 완료");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_store(account: &str) -> KeyringCredentialStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringCredentialStore::with_account("statusync-test", account).unwrap()
    }

    #[tokio::test]
    async fn env_var_wins() {
        let var = "STATUSYNC_TEST_TOKEN_ENV_WINS";
        std::env::set_var(var, " ghp_env \n");

        let store = mock_store("env-wins");
        store.save("ghp_keyring").await.unwrap();

        let chain = CredentialChain::new(store).with_env_var(var).interactive(false);
        assert_eq!(chain.provide().await.unwrap(), "ghp_env");

        std::env::remove_var(var);
    }

    #[tokio::test]
    async fn keyring_used_without_env() {
        let store = mock_store("keyring-used");
        store.save("ghp_keyring").await.unwrap();

        let chain = CredentialChain::new(store)
            .with_env_var("STATUSYNC_TEST_TOKEN_UNSET")
            .interactive(false);
        assert_eq!(chain.provide().await.unwrap(), "ghp_keyring");
    }

    #[tokio::test]
    async fn nothing_available_is_auth_error() {
        let chain = CredentialChain::new(mock_store("nothing"))
            .with_env_var("STATUSYNC_TEST_TOKEN_UNSET")
            .interactive(false);
        let err = chain.provide().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(msg) if msg.contains("STATUSYNC_TEST_TOKEN_UNSET")));
    }
}
