//! GitHub 이모지 디렉토리 클라이언트.
//!
//! `EmojiDirectory` 포트 구현 (`GET {api_url}/emojis`, 인증 불필요).

use async_trait::async_trait;
use statusync_core::error::CoreError;
use statusync_core::ports::emoji::EmojiDirectory;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::http::{build_client, check_response};

/// GitHub 이모지 디렉토리
pub struct GitHubEmojiClient {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubEmojiClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmojiDirectory for GitHubEmojiClient {
    async fn fetch_all(&self) -> Result<HashMap<String, String>, CoreError> {
        let url = format!("{}/emojis", self.api_url);
        debug!("이모지 디렉토리 조회: {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("이모지 디렉토리 요청 실패: {e}")))?;

        let resp = check_response(resp).await?;
        let text = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("이모지 디렉토리 응답 읽기 실패: {e}")))?;

        Ok(serde_json::from_str(&text)?)
    }
}
