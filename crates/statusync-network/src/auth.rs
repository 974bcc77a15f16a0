//! GitHub 토큰 관리.
//!
//! 보유한 토큰이 없을 때만 자격증명 제공자에게 요청하고,
//! 서버가 토큰을 거부하면 폐기해 다음 요청에서 다시 받는다.

use statusync_core::error::CoreError;
use statusync_core::ports::credential::CredentialProvider;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 토큰 매니저
#[derive(Clone)]
pub struct TokenManager {
    provider: Arc<dyn CredentialProvider>,
    token: Arc<RwLock<Option<String>>>,
}

impl TokenManager {
    /// 새 토큰 매니저 생성 (토큰 없음)
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// 유효한 토큰 반환
    ///
    /// 토큰이 없으면 제공자를 한 번 호출한다. 동시 호출은 쓰기 락에서 직렬화된다.
    pub async fn get_token(&self) -> Result<String, CoreError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut state = self.token.write().await;
        if let Some(token) = state.as_ref() {
            return Ok(token.clone());
        }

        let token = self.provider.provide().await?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(CoreError::Auth("빈 토큰".to_string()));
        }

        info!("GitHub 토큰 획득");
        *state = Some(token.clone());
        Ok(token)
    }

    /// 보유 토큰 폐기 (401 응답 시)
    pub async fn invalidate(&self) {
        let mut state = self.token.write().await;
        if state.take().is_some() {
            debug!("GitHub 토큰 폐기");
        }
    }

    /// 토큰 보유 여부
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}
