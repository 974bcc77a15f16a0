//! 애플리케이션 설정 구조체.
//!
//! 상태 동기화 주기, 유휴 임계값, 이모지, GitHub 엔드포인트, 로컬 웹 서버,
//! 캐시 저장소 경로 등 런타임 설정을 정의한다.
//! 에디터 확장의 설정 키(`interval`, `idleTimeout`, `emojiDefault`, `default`)도
//! alias로 그대로 읽는다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최소 푸시 간격 / 유휴 임계값 (분)
pub const MIN_MINUTES: u64 = 1;
/// 최대 푸시 간격 / 유휴 임계값 (분, 1주)
pub const MAX_MINUTES: u64 = 7 * 24 * 60;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 상태 동기화 설정
    #[serde(default)]
    pub status: StatusConfig,
    /// GitHub 연결 설정
    #[serde(default)]
    pub github: GitHubConfig,
    /// 활동 수신용 로컬 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 상태를 올리지 않을 워크스페이스 목록
    #[serde(default)]
    pub blacklist: Vec<String>,
}

// ============================================================
// 상태 동기화 설정
// ============================================================

/// 상태 동기화 설정: 푸시 주기, 유휴 전환, 이모지, 기본 메시지
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// 상태 푸시 간격 (분)
    #[serde(default = "default_interval_minutes", alias = "interval")]
    pub interval_minutes: u64,
    /// 유휴 전환 임계값 (분)
    #[serde(default = "default_idle_timeout_minutes", alias = "idleTimeout")]
    pub idle_timeout_minutes: u64,
    /// 작업 중 상태 이모지 (없으면 선택 프롬프트)
    #[serde(default)]
    pub emoji: Option<String>,
    /// 유휴/기본 상태 이모지
    #[serde(default, alias = "emojiDefault")]
    pub emoji_default: Option<String>,
    /// 비활성화 시 올릴 기본 상태 메시지
    #[serde(default, alias = "default")]
    pub default_message: Option<String>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            idle_timeout_minutes: default_idle_timeout_minutes(),
            emoji: None,
            emoji_default: None,
            default_message: None,
        }
    }
}

impl StatusConfig {
    /// 푸시 간격 (1분 ~ 1주)
    pub fn push_interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.clamp(MIN_MINUTES, MAX_MINUTES) * 60)
    }

    /// 유휴 임계값 (1분 ~ 1주)
    pub fn idle_threshold_minutes(&self) -> u64 {
        self.idle_timeout_minutes.clamp(MIN_MINUTES, MAX_MINUTES)
    }
}

// ============================================================
// GitHub 연결 설정
// ============================================================

/// GitHub API 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API 기본 URL (이모지 디렉토리)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// GraphQL 엔드포인트 (상태 변경 mutation)
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            graphql_url: default_graphql_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl GitHubConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 로컬 웹 서버 설정: 에디터 플러그인이 활동 이벤트를 보내는 엔드포인트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 기본 포트 (사용 중이면 다음 포트 시도)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접속 허용 (false면 127.0.0.1만)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// 저장소 설정
// ============================================================

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 캐시 SQLite 파일 경로 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            status: StatusConfig::default(),
            github: GitHubConfig::default(),
            web: WebConfig::default(),
            storage: StorageConfig::default(),
            blacklist: Vec::new(),
        }
    }

    /// 워크스페이스가 블랙리스트에 있는지 확인 (대소문자 무시)
    pub fn is_blacklisted(&self, workspace: &str) -> bool {
        self.blacklist
            .iter()
            .any(|entry| entry.trim().eq_ignore_ascii_case(workspace.trim()))
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}
fn default_interval_minutes() -> u64 {
    1
}
fn default_idle_timeout_minutes() -> u64 {
    15
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_web_port() -> u16 {
    9191
}
