//! # statusync-web
//!
//! 로컬 활동 수신 서버.
//! 에디터 플러그인이 활동 이벤트와 사용자 명령을 보내는 Axum 기반 REST API.
//!
//! ## 엔드포인트
//! - `POST /api/activity`: 활동 이벤트 (`{"kind": "save", "language": "rust"}`)
//! - `POST /api/activate` / `POST /api/deactivate`: 사용자 명령
//! - `GET /api/status`: 동기화기 상태
//! - `GET /api/emojis`: 선택용 이모지 목록

pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use statusync_core::config::WebConfig;
use statusync_status::catalog::EmojiCatalog;
use statusync_status::synchronizer::SynchronizerHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 워크스페이스 동기화기
    pub synchronizer: SynchronizerHandle,
    /// 이모지 카탈로그
    pub catalog: Arc<EmojiCatalog>,
}

/// 라우터 구성 (`/api` 하위)
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 활동 수신 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(state: AppState, config: WebConfig) -> Self {
        Self { config, state }
    }

    /// 서버 실행
    ///
    /// 기본 포트가 사용 중이면 다음 포트를 시도한다 (최대 10개).
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let app = router(self.state);

        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let Some(port) = base_port.checked_add(attempt) else {
                break;
            };

            let addr: SocketAddr = match format!("{host}:{port}").parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {host}:{port}: {e}");
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {base_port} 사용 불가, 대체 포트 {port} 사용");
                    }
                    info!("활동 수신 서버 시작: http://{addr}");

                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("활동 수신 서버 종료");
                    return Ok(());
                }
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::AddrInUse {
                        warn!("포트 {port} 이미 사용 중, 다음 포트 시도...");
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use parking_lot::Mutex;
    use serde::de::DeserializeOwned;
    use statusync_core::config::StatusConfig;
    use statusync_core::error::CoreError;
    use statusync_core::models::status::StatusMessage;
    use statusync_core::ports::emoji::EmojiDirectory;
    use statusync_core::ports::status_sink::StatusSink;
    use statusync_monitor::clock::SystemClock;
    use statusync_status::machine::StatusSettings;
    use statusync_status::synchronizer::{EmojiSource, StatusSynchronizer};
    use statusync_storage::memory::MemoryCacheStore;
    use std::collections::HashMap;
    use tokio::task::JoinHandle;
    use tower::ServiceExt;

    #[derive(Default)]
    pub struct RecordingSink {
        pub pushed: Mutex<Vec<StatusMessage>>,
    }

    #[async_trait]
    impl StatusSink for RecordingSink {
        async fn set_status(&self, status: &StatusMessage) -> Result<(), CoreError> {
            self.pushed.lock().push(status.clone());
            Ok(())
        }
    }

    pub struct OfflineDirectory;

    #[async_trait]
    impl EmojiDirectory for OfflineDirectory {
        async fn fetch_all(&self) -> Result<HashMap<String, String>, CoreError> {
            Err(CoreError::Network("offline".to_string()))
        }
    }

    pub struct TestApp {
        pub router: Router,
        pub handle: SynchronizerHandle,
        task: Mutex<Option<JoinHandle<()>>>,
    }

    impl TestApp {
        /// 시작된 동기화기와 오프라인 카탈로그로 라우터 구성
        pub async fn start() -> Self {
            let clock = Arc::new(SystemClock);
            let (handle, task) = StatusSynchronizer::spawn(
                StatusSettings::from_config("demo", &StatusConfig::default()),
                EmojiSource::Fixed("computer".to_string()),
                Arc::new(RecordingSink::default()),
                clock.clone(),
            );
            handle.start().unwrap();

            let catalog = Arc::new(EmojiCatalog::new(
                Arc::new(OfflineDirectory),
                Arc::new(MemoryCacheStore::new()),
                clock,
            ));

            let router = router(AppState {
                synchronizer: handle.clone(),
                catalog,
            });

            Self {
                router,
                handle,
                task: Mutex::new(Some(task)),
            }
        }

        pub async fn shutdown(&self) {
            self.handle.shutdown().unwrap();
            let task = self.task.lock().take();
            if let Some(task) = task {
                task.await.unwrap();
            }
        }
    }

    pub async fn request(router: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    pub async fn read_json<T: DeserializeOwned>(resp: Response) -> T {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
