//! 이모지 디렉토리/선택 포트.
//!
//! 구현: `statusync-network` crate (GitHub `/emojis`), `statusync-app` (터미널 프롬프트)

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::CoreError;
use crate::models::emoji::EmojiEntry;

/// 원격 이모지 디렉토리 (읽기 전용)
#[async_trait]
pub trait EmojiDirectory: Send + Sync {
    /// 전체 이모지 조회 (이름 → 이미지 URL)
    async fn fetch_all(&self) -> Result<HashMap<String, String>, CoreError>;
}

/// 사용자 이모지 선택
#[async_trait]
pub trait EmojiPicker: Send + Sync {
    /// 정렬된 후보 중 하나를 선택받는다.
    ///
    /// 사용자가 취소하면 `None`.
    async fn pick(&self, candidates: &[EmojiEntry]) -> Option<String>;
}
