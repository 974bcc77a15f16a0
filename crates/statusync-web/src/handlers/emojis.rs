//! 이모지 API 핸들러.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use statusync_status::catalog::{preview, rank_for_selection};

use crate::AppState;

/// 이모지 응답 DTO
#[derive(Debug, Serialize)]
pub struct EmojiResponse {
    /// 이름
    pub name: String,
    /// 단축 코드 (`:name:`)
    pub shortcode: String,
    /// 미리보기 글리프
    pub preview: String,
    /// 이미지 URL
    pub url: String,
}

/// 선택용 순서로 정렬된 이모지 목록
///
/// GET /api/emojis
pub async fn list_emojis(State(state): State<AppState>) -> Json<Vec<EmojiResponse>> {
    let entries = state.catalog.load().await;

    let response = rank_for_selection(&entries)
        .into_iter()
        .map(|entry| EmojiResponse {
            shortcode: entry.shortcode(),
            preview: preview(&entry),
            name: entry.name,
            url: entry.url,
        })
        .collect();

    Json(response)
}
