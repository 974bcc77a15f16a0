//! 원격 상태 모델.
//!
//! 상태 싱크로 보내는 메시지와 동기화기 상태를 표현.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 상태 싱크로 전송되는 상태 메시지
///
/// 푸시마다 새로 만들고 보관하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    /// 단축 코드 (예: ":computer:")
    pub emoji: String,
    /// 상태 문구
    pub message: String,
    /// 만료 시각 (None이면 만료 없음)
    pub expires_at: Option<DateTime<Utc>>,
    /// 제한된 응답 가능 여부 (항상 false)
    #[serde(default)]
    pub limited_availability: bool,
}

/// 동기화기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// 아직 시작 전
    Uninitialized,
    /// 작업 중 상태를 주기적으로 푸시
    Active,
    /// 유휴 상태 푸시 후 타이머 정지
    Idle,
    /// 사용자가 비활성화함
    Deactivated,
}

/// 동기화기 상태 스냅샷 (웹 API 조회용)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// 현재 상태
    pub state: SyncState,
    /// 워크스페이스 이름
    pub workspace: String,
    /// 마지막으로 관측된 언어
    pub language: Option<String>,
    /// 작업 세션 시작 시각
    pub session_started_at: Option<DateTime<Utc>>,
    /// 마지막 활동 시각
    pub last_activity_at: DateTime<Utc>,
    /// 유휴 여부
    pub is_idle: bool,
    /// 타이머 동작 여부
    pub timer_armed: bool,
}
