//! statusync 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 라이브러리 에러를 `CoreError`로 매핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 네트워크, 저장소 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 인증 실패 (토큰 없음, 토큰 거부 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// Rate Limit 초과 (403/429)
    #[error("요청 한도 초과: {0}")]
    RateLimit(String),

    /// 서비스 일시 불가 (502/503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 로컬 저장소 읽기/쓰기 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 사용자가 입력을 취소함
    #[error("사용자 취소")]
    Cancelled,

    /// 동기화기가 이미 종료됨
    #[error("동기화기 종료됨")]
    Closed,

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
