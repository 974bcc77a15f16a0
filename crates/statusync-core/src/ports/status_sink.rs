//! 상태 싱크 포트.
//!
//! 구현: `statusync-network` crate (GitHub GraphQL `changeUserStatus`)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::status::StatusMessage;

/// 원격 프로필 상태 변경
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// 상태 메시지 반영
    ///
    /// 실패는 호출자가 로그로 남기고 무시한다. 재시도하지 않는다.
    async fn set_status(&self, status: &StatusMessage) -> Result<(), CoreError>;
}
