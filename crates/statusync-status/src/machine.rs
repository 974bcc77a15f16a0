//! 상태 머신.
//!
//! 시각을 인자로 받아 상태를 바꾸고, 수행할 효과(푸시/타이머) 목록을 돌려준다.
//! 타이머와 싱크 호출은 `synchronizer` 액터가 효과를 보고 수행한다.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use statusync_core::config::StatusConfig;
use statusync_core::models::emoji::shortcode;
use statusync_core::models::status::{StatusMessage, StatusSnapshot, SyncState};
use statusync_monitor::activity::ActivityTracker;
use std::time::Duration;
use tracing::debug;

use crate::format::working_message;

/// 유휴 상태 문구
pub const IDLE_MESSAGE: &str = "Idle - Away from keyboard";
/// 작업 중 기본 이모지 (선택 취소 시)
pub const DEFAULT_ACTIVE_EMOJI: &str = "computer";
/// 유휴 기본 이모지
pub const DEFAULT_IDLE_EMOJI: &str = "zzz";
/// 작업 중 상태 만료 여유 (초): 다음 푸시 전에 만료되지 않도록
const ACTIVE_EXPIRY_BUFFER_SECS: i64 = 30;
/// 유휴 상태 만료 (시간)
const IDLE_EXPIRY_HOURS: i64 = 1;

/// 비활성화 시 올릴 기본 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultStatus {
    pub emoji: String,
    pub message: String,
}

/// 동기화 설정 (워크스페이스 단위)
#[derive(Debug, Clone)]
pub struct StatusSettings {
    /// 워크스페이스 이름
    pub workspace: String,
    /// 푸시 간격 (최소 1분)
    pub push_interval: Duration,
    /// 유휴 임계값 (분)
    pub idle_threshold_minutes: u64,
    /// 유휴 상태 이모지 (`:name:`)
    pub idle_emoji: String,
    /// 비활성화 시 기본 상태
    pub default_status: Option<DefaultStatus>,
}

impl StatusSettings {
    /// 설정 파일 값으로 생성
    pub fn from_config(workspace: impl Into<String>, config: &StatusConfig) -> Self {
        let idle_emoji = shortcode(
            config
                .emoji_default
                .as_deref()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(DEFAULT_IDLE_EMOJI),
        );
        let default_status = config
            .default_message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(|message| DefaultStatus {
                emoji: idle_emoji.clone(),
                message: message.to_string(),
            });

        Self {
            workspace: workspace.into(),
            push_interval: config.push_interval(),
            idle_threshold_minutes: config.idle_threshold_minutes(),
            idle_emoji,
            default_status,
        }
    }
}

/// 상태 머신이 요청하는 효과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// 상태 싱크로 전송
    Push(StatusMessage),
    /// 주기 타이머 (재)설정: 기존 타이머는 대체된다
    ArmTimer(Duration),
    /// 타이머 해제
    CancelTimer,
}

/// 연속된 작업 구간
#[derive(Debug, Clone, Default)]
pub struct WorkSession {
    started_at: Option<DateTime<Utc>>,
}

impl WorkSession {
    /// 시작 시각이 비어 있을 때만 기록
    pub fn begin(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// 경과 분 (내림)
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.started_at
            .map(|started| (now - started).num_minutes().max(0))
    }
}

/// 워크스페이스 하나의 상태 머신
#[derive(Debug)]
pub struct StatusMachine {
    settings: StatusSettings,
    state: SyncState,
    tracker: ActivityTracker,
    session: WorkSession,
    language: Option<String>,
    active_emoji: String,
    timer_armed: bool,
}

impl StatusMachine {
    /// 생성 시각을 마지막 활동으로 보고 `Uninitialized`에서 시작
    pub fn new(settings: StatusSettings, now: DateTime<Utc>) -> Self {
        let tracker = ActivityTracker::new(now, settings.idle_threshold_minutes);
        Self {
            settings,
            state: SyncState::Uninitialized,
            tracker,
            session: WorkSession::default(),
            language: None,
            active_emoji: shortcode(DEFAULT_ACTIVE_EMOJI),
            timer_armed: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn settings(&self) -> &StatusSettings {
        &self.settings
    }

    /// 작업 중 상태 이모지 지정
    pub fn set_active_emoji(&mut self, name: &str) {
        self.active_emoji = shortcode(name);
    }

    pub fn active_emoji(&self) -> &str {
        &self.active_emoji
    }

    /// 동기화 시작
    ///
    /// 이미 `Active`이거나 사용자가 비활성화한 뒤에는 아무것도 하지 않는다.
    pub fn start(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        match self.state {
            SyncState::Active | SyncState::Deactivated => Vec::new(),
            SyncState::Uninitialized | SyncState::Idle => self.enter(now),
        }
    }

    /// 사용자의 명시적 활성화: 어느 상태에서든 추적기와 세션을 초기화하고 시작
    pub fn activate(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        self.tracker.reset(now);
        self.session.clear();
        self.enter(now)
    }

    /// 타이머 주기 도래
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.state != SyncState::Active {
            return Vec::new();
        }

        if self.tracker.check_idle(now) {
            return self.go_idle(now);
        }

        vec![Effect::Push(self.active_status(now))]
    }

    /// 에디터 활동 기록
    ///
    /// 유휴 상태에서 활동이 재개되면 세션을 비우고 다시 시작한다.
    pub fn record_activity(&mut self, now: DateTime<Utc>, language: Option<&str>) -> Vec<Effect> {
        if let Some(language) = language {
            self.language = Some(language.to_string());
        }

        let resumed = self.tracker.record_activity(now);
        if resumed && self.state == SyncState::Idle {
            debug!("{}: 유휴 해제", self.settings.workspace);
            self.session.clear();
            return self.enter(now);
        }

        Vec::new()
    }

    /// 사용자 비활성화
    ///
    /// 타이머 해제가 항상 기본 상태 푸시보다 먼저 온다.
    pub fn deactivate(&mut self) -> Vec<Effect> {
        if !matches!(self.state, SyncState::Active | SyncState::Idle) {
            return Vec::new();
        }

        self.state = SyncState::Deactivated;
        self.timer_armed = false;
        debug!("{}: 비활성화", self.settings.workspace);

        let mut effects = vec![Effect::CancelTimer];
        if let Some(default) = &self.settings.default_status {
            effects.push(Effect::Push(StatusMessage {
                emoji: default.emoji.clone(),
                message: default.message.clone(),
                expires_at: None,
                limited_availability: false,
            }));
        }
        effects
    }

    /// 현재 상태 조회
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state,
            workspace: self.settings.workspace.clone(),
            language: self.language.clone(),
            session_started_at: self.session.started_at(),
            last_activity_at: self.tracker.last_activity_at(),
            is_idle: self.tracker.is_idle(),
            timer_armed: self.timer_armed,
        }
    }

    fn enter(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.tracker.check_idle(now) {
            return self.go_idle(now);
        }

        self.state = SyncState::Active;
        self.session.begin(now);
        self.timer_armed = true;
        debug!("{}: 작업 중 상태 시작", self.settings.workspace);

        vec![
            Effect::Push(self.active_status(now)),
            Effect::ArmTimer(self.settings.push_interval),
        ]
    }

    fn go_idle(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        self.tracker.mark_idle();
        self.state = SyncState::Idle;
        debug!("{}: 유휴 상태 전환", self.settings.workspace);

        let mut effects = Vec::with_capacity(2);
        if self.timer_armed {
            self.timer_armed = false;
            effects.push(Effect::CancelTimer);
        }
        effects.push(Effect::Push(StatusMessage {
            emoji: self.settings.idle_emoji.clone(),
            message: IDLE_MESSAGE.to_string(),
            expires_at: Some(now + ChronoDuration::hours(IDLE_EXPIRY_HOURS)),
            limited_availability: false,
        }));
        effects
    }

    fn active_status(&self, now: DateTime<Utc>) -> StatusMessage {
        let interval = ChronoDuration::from_std(self.settings.push_interval)
            .unwrap_or_else(|_| ChronoDuration::minutes(1));

        StatusMessage {
            emoji: self.active_emoji.clone(),
            message: working_message(
                &self.settings.workspace,
                self.language.as_deref(),
                self.session.elapsed_minutes(now),
            ),
            expires_at: Some(now + ChronoDuration::seconds(ACTIVE_EXPIRY_BUFFER_SECS) + interval),
            limited_availability: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn minutes(n: i64) -> DateTime<Utc> {
        t0() + ChronoDuration::minutes(n)
    }

    fn settings() -> StatusSettings {
        StatusSettings::from_config("demo", &StatusConfig::default())
    }

    fn pushes(effects: &[Effect]) -> Vec<&StatusMessage> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Push(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn settings_from_config() {
        let config = StatusConfig {
            interval_minutes: 0,
            idle_timeout_minutes: 20,
            emoji: None,
            emoji_default: Some("palm_tree".to_string()),
            default_message: Some("Out for lunch".to_string()),
        };
        let settings = StatusSettings::from_config("demo", &config);

        assert_eq!(settings.push_interval, Duration::from_secs(60));
        assert_eq!(settings.idle_threshold_minutes, 20);
        assert_eq!(settings.idle_emoji, ":palm_tree:");
        assert_eq!(
            settings.default_status,
            Some(DefaultStatus {
                emoji: ":palm_tree:".to_string(),
                message: "Out for lunch".to_string(),
            })
        );

        let defaults = StatusSettings::from_config("demo", &StatusConfig::default());
        assert_eq!(defaults.idle_emoji, ":zzz:");
        assert!(defaults.default_status.is_none());
    }

    #[test]
    fn oversized_config_is_clamped() {
        let config = StatusConfig {
            interval_minutes: u64::MAX,
            idle_timeout_minutes: 1 << 60,
            ..StatusConfig::default()
        };
        let mut machine = StatusMachine::new(StatusSettings::from_config("demo", &config), t0());

        let effects = machine.start(t0());
        assert_eq!(machine.state(), SyncState::Active);
        assert_eq!(effects[1], Effect::ArmTimer(Duration::from_secs(7 * 24 * 60 * 60)));

        assert_eq!(pushes(&machine.tick(minutes(60))).len(), 1);
        assert_eq!(machine.state(), SyncState::Active);
        machine.tick(minutes(7 * 24 * 60));
        assert_eq!(machine.state(), SyncState::Idle);
    }

    #[test]
    fn start_pushes_and_arms_timer() {
        let mut machine = StatusMachine::new(settings(), t0());
        let effects = machine.start(t0());

        assert_eq!(machine.state(), SyncState::Active);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[1], Effect::ArmTimer(Duration::from_secs(60)));

        let status = pushes(&effects)[0].clone();
        assert_eq!(status.emoji, ":computer:");
        assert_eq!(status.message, "Working on demo");
        assert_eq!(
            status.expires_at,
            Some(t0() + ChronoDuration::seconds(90))
        );
        assert!(!status.limited_availability);
    }

    #[test]
    fn start_is_idempotent_while_active() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());
        assert!(machine.start(minutes(1)).is_empty());
    }

    #[test]
    fn start_when_already_idle_goes_idle_without_timer() {
        let mut machine = StatusMachine::new(settings(), t0());
        let effects = machine.start(minutes(15));

        assert_eq!(machine.state(), SyncState::Idle);
        assert_eq!(effects.len(), 1);
        let status = pushes(&effects)[0];
        assert_eq!(status.emoji, ":zzz:");
        assert_eq!(status.message, IDLE_MESSAGE);
        assert_eq!(status.expires_at, Some(minutes(75)));
        assert!(!machine.snapshot().timer_armed);
    }

    #[test]
    fn ticks_add_elapsed_time_without_moving_session_start() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());

        let mut previous = -1;
        for minute in 1..=14 {
            let effects = machine.tick(minutes(minute));
            assert_eq!(effects.len(), 1, "minute {minute}");
            assert_eq!(machine.snapshot().session_started_at, Some(t0()));

            let elapsed = machine.session.elapsed_minutes(minutes(minute)).unwrap();
            assert!(elapsed >= previous);
            previous = elapsed;
        }

        let effects = machine.tick(minutes(2));
        assert_eq!(pushes(&effects)[0].message, "Working on demo (2 minutes)");
    }

    #[test]
    fn tick_at_threshold_goes_idle_and_cancels_timer() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());

        let effects = machine.tick(minutes(15));
        assert_eq!(effects[0], Effect::CancelTimer);
        assert_eq!(pushes(&effects)[0].message, IDLE_MESSAGE);
        assert_eq!(machine.state(), SyncState::Idle);
        assert!(machine.snapshot().is_idle);

        // 유휴 상태에서는 타이머 주기가 와도 아무것도 하지 않음
        assert!(machine.tick(minutes(16)).is_empty());
    }

    #[test]
    fn resume_clears_session_and_restarts() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());
        machine.tick(minutes(15));

        let effects = machine.record_activity(minutes(40), Some("rust"));
        assert_eq!(machine.state(), SyncState::Active);
        assert_eq!(machine.snapshot().session_started_at, Some(minutes(40)));
        assert!(!machine.snapshot().is_idle);
        assert_eq!(pushes(&effects)[0].message, "Working on demo in rust");
        assert_eq!(effects[1], Effect::ArmTimer(Duration::from_secs(60)));
    }

    #[test]
    fn activity_while_active_only_updates_tracker() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());

        assert!(machine.record_activity(minutes(10), Some("go")).is_empty());
        assert_eq!(machine.snapshot().last_activity_at, minutes(10));
        assert_eq!(machine.snapshot().language.as_deref(), Some("go"));

        // 마지막 활동 기준으로 임계값 계산
        assert_eq!(machine.tick(minutes(24)).len(), 1);
        assert_eq!(machine.state(), SyncState::Active);
        machine.tick(minutes(25));
        assert_eq!(machine.state(), SyncState::Idle);
    }

    #[test]
    fn deactivate_cancels_then_pushes_default() {
        let config = StatusConfig {
            default_message: Some("Out for lunch".to_string()),
            ..StatusConfig::default()
        };
        let mut machine = StatusMachine::new(StatusSettings::from_config("demo", &config), t0());
        machine.start(t0());

        let effects = machine.deactivate();
        assert_eq!(effects[0], Effect::CancelTimer);
        let status = pushes(&effects)[0];
        assert_eq!(status.emoji, ":zzz:");
        assert_eq!(status.message, "Out for lunch");
        assert!(status.expires_at.is_none());
        assert_eq!(machine.state(), SyncState::Deactivated);

        assert!(machine.tick(minutes(1)).is_empty());
        assert!(machine.start(minutes(1)).is_empty());
        assert!(machine.deactivate().is_empty());
    }

    #[test]
    fn deactivate_without_default_only_cancels() {
        let mut machine = StatusMachine::new(settings(), t0());
        assert!(machine.deactivate().is_empty());

        machine.start(t0());
        assert_eq!(machine.deactivate(), vec![Effect::CancelTimer]);
    }

    #[test]
    fn resume_after_deactivate_stays_quiet() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());
        machine.tick(minutes(15));
        machine.deactivate();

        assert!(machine.record_activity(minutes(20), None).is_empty());
        assert_eq!(machine.state(), SyncState::Deactivated);
    }

    #[test]
    fn activate_restarts_from_any_state() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.start(t0());
        machine.tick(minutes(15));
        machine.deactivate();

        let effects = machine.activate(minutes(30));
        assert_eq!(machine.state(), SyncState::Active);
        assert_eq!(machine.snapshot().session_started_at, Some(minutes(30)));
        assert_eq!(pushes(&effects)[0].message, "Working on demo");

        // 활성 상태에서 다시 활성화하면 세션이 새로 시작된다
        let effects = machine.activate(minutes(33));
        assert_eq!(machine.snapshot().session_started_at, Some(minutes(33)));
        assert!(effects.contains(&Effect::ArmTimer(Duration::from_secs(60))));
    }

    #[test]
    fn custom_active_emoji_is_normalized() {
        let mut machine = StatusMachine::new(settings(), t0());
        machine.set_active_emoji(":rocket:");
        let effects = machine.start(t0());
        assert_eq!(pushes(&effects)[0].emoji, ":rocket:");
    }
}
