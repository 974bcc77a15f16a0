//! # statusync-network
//!
//! GitHub 네트워크 어댑터.
//!
//! - [`status_client::GitHubStatusClient`]: `StatusSink` 구현 (GraphQL `changeUserStatus`)
//! - [`emoji_client::GitHubEmojiClient`]: `EmojiDirectory` 구현 (REST `GET /emojis`)
//! - [`auth::TokenManager`]: 토큰 보관, 자격증명 요청, 거부 시 폐기
//!
//! 재시도는 하지 않는다. 다음 타이머 주기가 곧 재시도다.

pub mod auth;
pub mod emoji_client;
pub mod http;
pub mod status_client;
