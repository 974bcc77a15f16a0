//! 시계 포트.
//!
//! 구현: `statusync-monitor` crate (`SystemClock`, `MonotonicClock`)

use chrono::{DateTime, Utc};

/// 현재 시각 제공자
pub trait Clock: Send + Sync {
    /// 현재 시각
    fn now(&self) -> DateTime<Utc>;
}
