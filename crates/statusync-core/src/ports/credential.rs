//! 자격증명 제공 포트.
//!
//! 구현: `statusync-app` crate (환경 변수 → OS 키체인 → 터미널 입력)

use async_trait::async_trait;

use crate::error::CoreError;

/// GitHub 토큰 제공자
///
/// `TokenManager`가 보유한 토큰이 없을 때만 호출된다.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// 토큰 획득
    async fn provide(&self) -> Result<String, CoreError>;
}
