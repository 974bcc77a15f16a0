//! 공통 HTTP 유틸리티: 클라이언트 생성, 응답 상태 매핑.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use statusync_core::error::CoreError;
use std::time::Duration;
use tracing::warn;

/// GitHub API가 요구하는 User-Agent
pub const USER_AGENT: &str = concat!("statusync/", env!("CARGO_PKG_VERSION"));

/// GitHub REST 미디어 타입
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// 타임아웃과 공통 헤더가 설정된 클라이언트 생성
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, CoreError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))
}

/// 응답 상태 코드 확인 및 에러 매핑
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = resp.status();

    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_else(|e| {
        warn!("응답 본문 읽기 실패: {e}");
        String::new()
    });

    Err(map_status(status.as_u16(), text))
}

/// 실패 상태 코드 → `CoreError`
pub fn map_status(status_code: u16, text: String) -> CoreError {
    match status_code {
        401 => CoreError::Auth(format!("토큰 거부됨: {text}")),
        403 | 429 => CoreError::RateLimit(text),
        502..=504 => CoreError::ServiceUnavailable(text),
        _ => CoreError::Internal(format!("GitHub API 에러 ({status_code}): {text}")),
    }
}
