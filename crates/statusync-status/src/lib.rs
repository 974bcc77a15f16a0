//! # statusync-status
//!
//! 상태 동기화 파이프라인.
//! 에디터 활동을 받아 작업 중/유휴/기본 상태를 결정하고,
//! 주기 타이머로 상태 싱크에 푸시한다.
//!
//! ## 모듈
//! - `catalog`: 이모지 목록 로드(24시간 캐시, 내장 폴백), 미리보기, 정렬
//! - `format`: 경과 시간/상태 문구 조합
//! - `machine`: 순수 상태 머신 (시각을 인자로 받아 효과 목록 반환)
//! - `synchronizer`: 상태 머신과 타이머를 소유하는 워크스페이스별 액터
//! - `pusher`: 상태 싱크 호출 전용 워커

pub mod catalog;
pub mod format;
pub mod machine;
pub mod pusher;
pub mod synchronizer;
