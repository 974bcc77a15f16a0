//! 활동 추적 모듈.
//!
//! 마지막 활동 시각 기록 및 유휴 판정.
//! 활성 → 유휴 전환은 동기화기가 `mark_idle`로 직접 기록하고,
//! 유휴 → 활성 전환만 `record_activity`가 신호로 돌려준다.

use chrono::{DateTime, Duration, Utc};
use statusync_core::config::{MAX_MINUTES, MIN_MINUTES};
use tracing::debug;

/// 기본 유휴 임계값 (분)
pub const DEFAULT_IDLE_THRESHOLD_MINUTES: u64 = 15;

/// 활동 추적기
///
/// 단일 소유자(동기화기 액터)만 변경한다.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    /// 마지막 활동 시각
    last_activity_at: DateTime<Utc>,
    /// 유휴 상태 여부
    is_idle: bool,
    /// 유휴 임계값 (분, 1 ~ 1주)
    idle_threshold_minutes: u64,
}

impl ActivityTracker {
    /// 새 활동 추적기 생성 (생성 시각을 마지막 활동으로 간주)
    pub fn new(now: DateTime<Utc>, idle_threshold_minutes: u64) -> Self {
        Self {
            last_activity_at: now,
            is_idle: false,
            idle_threshold_minutes: idle_threshold_minutes.clamp(MIN_MINUTES, MAX_MINUTES),
        }
    }

    /// 활동 기록
    ///
    /// 유휴 상태였다면 활성으로 되돌리고 `true`(재개 신호)를 반환한다.
    pub fn record_activity(&mut self, now: DateTime<Utc>) -> bool {
        self.last_activity_at = now;
        if self.is_idle {
            self.is_idle = false;
            debug!("활동 재개: {now}");
            return true;
        }
        false
    }

    /// 유휴 임계값 초과 여부 (상태 변경 없음)
    ///
    /// 경과 시간이 임계값과 같으면 유휴로 본다.
    pub fn check_idle(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity_at >= self.threshold()
    }

    /// 유휴 상태로 표시 (동기화기 전용)
    ///
    /// 실제로 전환된 경우 `true`.
    pub fn mark_idle(&mut self) -> bool {
        if self.is_idle {
            return false;
        }
        self.is_idle = true;
        debug!(
            "유휴 전환: 마지막 활동 {} ({}분 임계값)",
            self.last_activity_at, self.idle_threshold_minutes
        );
        true
    }

    /// 외부 명령에 의한 초기화 (예: 사용자의 "활성화")
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.last_activity_at = now;
        self.is_idle = false;
    }

    /// 마지막 활동 시각
    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    /// 유휴 상태 여부
    pub fn is_idle(&self) -> bool {
        self.is_idle
    }

    /// 유휴 임계값 (분)
    pub fn idle_threshold_minutes(&self) -> u64 {
        self.idle_threshold_minutes
    }

    fn threshold(&self) -> Duration {
        Duration::minutes(self.idle_threshold_minutes as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn starts_active_at_construction_time() {
        let tracker = ActivityTracker::new(t0(), DEFAULT_IDLE_THRESHOLD_MINUTES);
        assert_eq!(tracker.last_activity_at(), t0());
        assert!(!tracker.is_idle());
        assert_eq!(tracker.idle_threshold_minutes(), 15);
    }

    #[test]
    fn zero_threshold_is_clamped() {
        let tracker = ActivityTracker::new(t0(), 0);
        assert_eq!(tracker.idle_threshold_minutes(), 1);
    }

    #[test]
    fn oversized_threshold_is_clamped() {
        let tracker = ActivityTracker::new(t0(), 1 << 60);
        assert_eq!(tracker.idle_threshold_minutes(), MAX_MINUTES);
        assert!(!tracker.check_idle(t0() + Duration::days(6)));
        assert!(tracker.check_idle(t0() + Duration::days(7)));
    }

    #[test]
    fn check_idle_boundary_is_inclusive() {
        for threshold in [1u64, 5, 15, 60] {
            let tracker = ActivityTracker::new(t0(), threshold);
            for gap in [0u64, 1, threshold - 1, threshold, threshold + 1, threshold * 3] {
                let now = t0() + Duration::minutes(gap as i64);
                assert_eq!(
                    tracker.check_idle(now),
                    gap >= threshold,
                    "threshold={threshold} gap={gap}"
                );
            }
        }
    }

    #[test]
    fn check_idle_just_below_threshold() {
        let tracker = ActivityTracker::new(t0(), 15);
        let almost = t0() + Duration::minutes(15) - Duration::seconds(1);
        assert!(!tracker.check_idle(almost));
    }

    #[test]
    fn check_idle_does_not_mutate() {
        let tracker = ActivityTracker::new(t0(), 1);
        assert!(tracker.check_idle(t0() + Duration::minutes(5)));
        assert!(!tracker.is_idle());
    }

    #[test]
    fn resume_signal_is_edge_triggered() {
        let mut tracker = ActivityTracker::new(t0(), 1);

        assert!(!tracker.record_activity(t0() + Duration::seconds(10)));

        assert!(tracker.mark_idle());
        assert!(!tracker.mark_idle());

        let resume = t0() + Duration::minutes(30);
        assert!(tracker.record_activity(resume));
        assert!(!tracker.is_idle());
        assert_eq!(tracker.last_activity_at(), resume);

        assert!(!tracker.record_activity(resume + Duration::seconds(1)));
    }

    #[test]
    fn reset_clears_idle() {
        let mut tracker = ActivityTracker::new(t0(), 1);
        tracker.mark_idle();

        let later = t0() + Duration::hours(2);
        tracker.reset(later);
        assert!(!tracker.is_idle());
        assert_eq!(tracker.last_activity_at(), later);
        assert!(!tracker.check_idle(later));
    }
}
