//! 도메인 모델.
//!
//! 모든 모델은 `serde::Serialize`/`Deserialize`를 구현하여
//! 캐시 저장, 웹 API 응답에 사용된다.

pub mod activity;
pub mod emoji;
pub mod status;
