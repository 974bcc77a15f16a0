//! 영속 캐시 저장소 포트.
//!
//! 구현: `statusync-storage` crate (rusqlite, 인메모리)

use async_trait::async_trait;

use crate::error::CoreError;

/// 문자열 키-값 저장소
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 값 조회 (없으면 `None`)
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (덮어쓰기)
    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}
