//! 활동/명령 API 핸들러.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use statusync_core::models::activity::ActivityEvent;
use statusync_core::models::status::StatusSnapshot;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// 에디터 활동 기록
///
/// POST /api/activity  `{"kind": "save", "language": "rust"}`
pub async fn record_activity(
    State(state): State<AppState>,
    Json(event): Json<ActivityEvent>,
) -> Result<StatusCode, ApiError> {
    debug!("활동 수신: {:?}", event.kind);
    state.synchronizer.record_activity(event)?;
    Ok(StatusCode::ACCEPTED)
}

/// 동기화 활성화
///
/// POST /api/activate
pub async fn activate(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.synchronizer.activate()?;
    Ok(StatusCode::ACCEPTED)
}

/// 동기화 비활성화: 타이머가 멈춘 뒤 응답
///
/// POST /api/deactivate
pub async fn deactivate(State(state): State<AppState>) -> Result<Json<StatusSnapshot>, ApiError> {
    state.synchronizer.deactivate().await?;
    Ok(Json(state.synchronizer.snapshot().await?))
}

/// 현재 상태 조회
///
/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusSnapshot>, ApiError> {
    Ok(Json(state.synchronizer.snapshot().await?))
}
