//! # statusync-monitor
//!
//! 에디터 활동 추적 어댑터.
//! 마지막 활동 시각을 기록하고 설정된 임계값으로 유휴/활성을 판정한다.
//! 동기화기와 캐시가 공유하는 시계 구현도 제공한다.

pub mod activity;
pub mod clock;
