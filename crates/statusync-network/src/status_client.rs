//! GitHub 프로필 상태 변경 클라이언트.
//!
//! `StatusSink` 포트 구현. GraphQL `changeUserStatus` mutation 한 번으로 반영한다.

use async_trait::async_trait;
use serde::Deserialize;
use statusync_core::error::CoreError;
use statusync_core::models::status::StatusMessage;
use statusync_core::ports::status_sink::StatusSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::TokenManager;
use crate::http::{build_client, check_response};

/// 상태 변경 mutation
const CHANGE_USER_STATUS: &str = "mutation($input: ChangeUserStatusInput!) { \
changeUserStatus(input: $input) { status { emoji message expiresAt } } }";

/// GraphQL 응답 중 에러 부분
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// GitHub 상태 싱크
pub struct GitHubStatusClient {
    client: reqwest::Client,
    graphql_url: String,
    token_manager: Arc<TokenManager>,
}

impl GitHubStatusClient {
    /// 새 클라이언트 생성
    pub fn new(
        graphql_url: &str,
        token_manager: Arc<TokenManager>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(timeout)?,
            graphql_url: graphql_url.trim_end_matches('/').to_string(),
            token_manager,
        })
    }
}

/// mutation 요청 본문
fn request_body(status: &StatusMessage) -> serde_json::Value {
    serde_json::json!({
        "query": CHANGE_USER_STATUS,
        "variables": { "input": status },
    })
}

#[async_trait]
impl StatusSink for GitHubStatusClient {
    async fn set_status(&self, status: &StatusMessage) -> Result<(), CoreError> {
        debug!("상태 변경 요청: {} {}", status.emoji, status.message);

        let token = self.token_manager.get_token().await?;
        let resp = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(token)
            .json(&request_body(status))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("상태 변경 요청 실패: {e}")))?;

        let resp = match check_response(resp).await {
            Ok(resp) => resp,
            Err(e @ CoreError::Auth(_)) => {
                self.token_manager.invalidate().await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let body: GraphQlResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("상태 변경 응답 파싱 실패: {e}")))?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(CoreError::Internal(format!(
                "상태 변경 거부: {}",
                messages.join("; ")
            )));
        }

        Ok(())
    }
}
