//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 에디터 활동
        .route("/activity", post(handlers::activity::record_activity))
        // 사용자 명령
        .route("/activate", post(handlers::activity::activate))
        .route("/deactivate", post(handlers::activity::deactivate))
        // 조회
        .route("/status", get(handlers::activity::get_status))
        .route("/emojis", get(handlers::emojis::list_emojis))
}
