//! 시계 구현.
//!
//! `SystemClock`은 벽시계를 그대로 사용하고,
//! `MonotonicClock`은 시작 시각에 tokio 단조 시계의 경과 시간을 더한다.
//! 후자는 tokio 시간을 멈춘 테스트에서도 타이머와 같은 시간축을 쓴다.

use chrono::{DateTime, Utc};
use statusync_core::ports::clock::Clock;
use tokio::time::Instant;

/// 벽시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 단조 시계 기반 현재 시각
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor_utc: DateTime<Utc>,
    anchor: Instant,
}

impl MonotonicClock {
    /// 현재 벽시계 시각을 기준점으로 생성
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// 지정한 시각을 기준점으로 생성
    pub fn anchored_at(anchor_utc: DateTime<Utc>) -> Self {
        Self {
            anchor_utc,
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.anchor);
        match chrono::Duration::from_std(elapsed) {
            Ok(elapsed) => self.anchor_utc + elapsed,
            Err(_) => Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn monotonic_clock_follows_tokio_time() {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = MonotonicClock::anchored_at(anchor);
        assert_eq!(clock.now(), anchor);

        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now(), anchor + chrono::Duration::seconds(90));
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
