//! # statusync-storage
//!
//! 로컬 저장소 어댑터.
//!
//! - [`sqlite::SqliteCacheStore`]: `CacheStore` 포트 구현 (키-값 테이블)
//! - [`memory::MemoryCacheStore`]: 프로세스 수명 동안만 유지되는 `CacheStore`
//! - [`credential_store::KeyringCredentialStore`]: GitHub 토큰을 OS 키체인에 보관

pub mod credential_store;
pub mod memory;
pub mod migration;
pub mod sqlite;
