//! 인메모리 캐시 저장소.
//!
//! 캐시 DB를 열 수 없을 때의 대체 저장소. 프로세스 종료 시 사라진다.

use async_trait::async_trait;
use parking_lot::RwLock;
use statusync_core::error::CoreError;
use statusync_core::ports::cache_store::CacheStore;
use std::collections::HashMap;

/// 인메모리 키-값 캐시
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
