//! # statusync-app
//!
//! statusync 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 라이프사이클 관리.

mod credentials;
mod lifecycle;
mod picker;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use statusync_core::config::AppConfig;
use statusync_core::config_manager::ConfigManager;
use statusync_core::ports::cache_store::CacheStore;
use statusync_core::ports::clock::Clock;
use statusync_monitor::clock::SystemClock;
use statusync_network::auth::TokenManager;
use statusync_network::emoji_client::GitHubEmojiClient;
use statusync_network::status_client::GitHubStatusClient;
use statusync_status::catalog::{preview, rank_for_selection, EmojiCatalog};
use statusync_status::machine::StatusSettings;
use statusync_status::synchronizer::{EmojiSource, StatusSynchronizer};
use statusync_storage::credential_store::KeyringCredentialStore;
use statusync_storage::memory::MemoryCacheStore;
use statusync_storage::sqlite::SqliteCacheStore;
use statusync_web::{AppState, WebServer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::credentials::CredentialChain;
use crate::lifecycle::LifecycleManager;
use crate::picker::TerminalPicker;

/// 종료 시 기본 상태 푸시를 기다리는 최대 시간
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// 캐시 DB 파일 이름
const CACHE_DB_FILE: &str = "cache.db";

/// 에디터 활동을 GitHub 프로필 상태로 동기화
#[derive(Parser, Debug)]
#[command(name = "statusync")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 상태 동기화 실행 (기본)
    Run {
        /// 워크스페이스 이름 (기본: 현재 디렉토리 이름)
        #[arg(long, short = 'w')]
        workspace: Option<String>,

        /// 활동 수신 포트
        #[arg(long, short = 'p')]
        port: Option<u16>,
    },
    /// 선택용 이모지 목록 출력
    Emojis {
        /// 출력 개수
        #[arg(long, default_value_t = 30)]
        limit: usize,
    },
    /// GitHub 토큰을 키체인에 저장
    Login,
    /// 키체인에서 GitHub 토큰 삭제
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = [
        "statusync",
        "statusync_app",
        "statusync_core",
        "statusync_monitor",
        "statusync_status",
        "statusync_network",
        "statusync_storage",
        "statusync_web",
    ]
    .iter()
    .map(|target| format!("{target}={}", args.log_level))
    .collect::<Vec<_>>()
    .join(",");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", config_manager.config_path().display());
    let config = config_manager.get();

    match args.command.unwrap_or(Command::Run {
        workspace: None,
        port: None,
    }) {
        Command::Run { workspace, port } => run(config, workspace, port).await,
        Command::Emojis { limit } => list_emojis(&config, limit).await,
        Command::Login => login().await,
        Command::Logout => logout().await,
    }
}

/// 상태 동기화 실행
async fn run(mut config: AppConfig, workspace: Option<String>, port: Option<u16>) -> Result<()> {
    let workspace = workspace.unwrap_or_else(current_workspace_name);
    if config.is_blacklisted(&workspace) {
        info!("블랙리스트 워크스페이스, 상태 동기화 안 함: {workspace}");
        return Ok(());
    }
    if let Some(port) = port {
        config.web.port = port;
    }

    info!("statusync 시작: {workspace}");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let catalog = Arc::new(build_catalog(&config, clock.clone())?);

    // ── GitHub 상태 싱크 ──
    let credential_store = KeyringCredentialStore::new()?;
    let token_manager = Arc::new(TokenManager::new(Arc::new(CredentialChain::new(
        credential_store,
    ))));
    let sink = Arc::new(GitHubStatusClient::new(
        &config.github.graphql_url,
        token_manager,
        config.github.request_timeout(),
    )?);

    // ── 동기화기 ──
    let emoji_source = match config.status.emoji.clone() {
        Some(name) if !name.trim().is_empty() => EmojiSource::Fixed(name),
        _ => EmojiSource::Prompt {
            catalog: catalog.clone(),
            picker: Arc::new(TerminalPicker::new()),
        },
    };
    let settings = StatusSettings::from_config(workspace, &config.status);
    let (synchronizer, sync_task) =
        StatusSynchronizer::spawn(settings, emoji_source, sink, clock);
    synchronizer.start()?;

    let lifecycle = LifecycleManager::new();

    // ── 활동 수신 서버 ──
    if config.web.enabled {
        let state = AppState {
            synchronizer: synchronizer.clone(),
            catalog,
        };
        let web_server = WebServer::new(state, config.web.clone());
        let web_shutdown_rx = lifecycle.subscribe();
        info!("활동 수신: {}/api/activity", web_server.url());
        tokio::spawn(async move {
            if let Err(e) = web_server.run(web_shutdown_rx).await {
                error!("웹 서버 오류: {e}");
            }
        });
    } else {
        warn!("웹 서버 비활성화: 에디터 활동을 받을 수 없음");
    }

    info!("statusync 실행 중 (Ctrl+C로 종료)");
    lifecycle.wait_for_signal().await;

    // 비활성화로 기본 상태를 올리고 대기 중인 푸시를 비운다
    match tokio::time::timeout(SHUTDOWN_GRACE, synchronizer.deactivate()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("비활성화 실패: {e}"),
        Err(_) => warn!("비활성화 응답 시간 초과 ({SHUTDOWN_GRACE:?})"),
    }
    if let Err(e) = synchronizer.shutdown() {
        warn!("동기화기 종료 요청 실패: {e}");
    }
    match tokio::time::timeout(SHUTDOWN_GRACE, sync_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("동기화기 태스크 join 실패: {e}"),
        Err(_) => warn!("동기화기 종료 시간 초과 ({SHUTDOWN_GRACE:?})"),
    }

    info!("statusync 종료");
    Ok(())
}

/// 선택용 이모지 목록 출력
async fn list_emojis(config: &AppConfig, limit: usize) -> Result<()> {
    let catalog = build_catalog(config, Arc::new(SystemClock))?;
    let entries = catalog.load().await;

    for entry in rank_for_selection(&entries).iter().take(limit) {
        println!("{}  {}", preview(entry), entry.shortcode());
    }
    if entries.len() > limit {
        println!("... 외 {}개", entries.len() - limit);
    }
    Ok(())
}

/// 토큰 입력 후 키체인 저장
async fn login() -> Result<()> {
    let token = credentials::read_token().await?;
    KeyringCredentialStore::new()?.save(&token).await?;
    println!("GitHub 토큰을 키체인에 저장했습니다.");
    Ok(())
}

/// 키체인 토큰 삭제
async fn logout() -> Result<()> {
    if KeyringCredentialStore::new()?.delete().await? {
        println!("GitHub 토큰을 삭제했습니다.");
    } else {
        println!("저장된 GitHub 토큰이 없습니다.");
    }
    Ok(())
}

/// 이모지 카탈로그 구성 (캐시 DB를 열 수 없으면 인메모리 캐시)
fn build_catalog(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<EmojiCatalog> {
    let directory = Arc::new(GitHubEmojiClient::new(
        &config.github.api_url,
        config.github.request_timeout(),
    )?);
    let store = open_cache_store(config.storage.db_path.as_deref());
    Ok(EmojiCatalog::new(directory, store, clock))
}

fn open_cache_store(db_path: Option<&Path>) -> Arc<dyn CacheStore> {
    let path = match db_path {
        Some(path) => Some(path.to_path_buf()),
        None => ConfigManager::data_dir()
            .map(|dir| dir.join(CACHE_DB_FILE))
            .map_err(|e| warn!("데이터 디렉토리 확인 실패: {e}"))
            .ok(),
    };

    match path.map(|path| SqliteCacheStore::open(&path)) {
        Some(Ok(store)) => Arc::new(store),
        Some(Err(e)) => {
            warn!("캐시 DB 열기 실패, 인메모리 캐시 사용: {e}");
            Arc::new(MemoryCacheStore::new())
        }
        None => Arc::new(MemoryCacheStore::new()),
    }
}

/// 현재 디렉토리 이름을 워크스페이스 이름으로 사용
fn current_workspace_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "workspace".to_string())
}
