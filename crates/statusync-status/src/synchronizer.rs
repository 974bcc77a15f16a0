//! 상태 동기화기 액터.
//!
//! 워크스페이스 하나당 하나의 태스크가 상태 머신과 단일 주기 타이머를 소유한다.
//! 호출자는 복제 가능한 [`SynchronizerHandle`]로 명령을 보낸다.

use statusync_core::config::MAX_MINUTES;
use statusync_core::error::CoreError;
use statusync_core::models::activity::ActivityEvent;
use statusync_core::models::status::StatusSnapshot;
use statusync_core::ports::clock::Clock;
use statusync_core::ports::emoji::EmojiPicker;
use statusync_core::ports::status_sink::StatusSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::catalog::{rank_for_selection, EmojiCatalog};
use crate::machine::{Effect, StatusMachine, StatusSettings, DEFAULT_ACTIVE_EMOJI};
use crate::pusher::StatusPusher;

/// 액터 명령
#[derive(Debug)]
enum SyncCommand {
    Activity(ActivityEvent),
    Start,
    Activate,
    Deactivate { ack: oneshot::Sender<()> },
    Snapshot { reply: oneshot::Sender<StatusSnapshot> },
    EmojiResolved(String),
    Shutdown,
}

/// 이모지 결정 전에 들어온 시작 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Start,
    Activate,
}

/// 작업 중 이모지 결정 방식
pub enum EmojiSource {
    /// 설정에 지정된 이모지
    Fixed(String),
    /// 카탈로그를 로드해 사용자에게 선택받음 (동기화기 수명 동안 한 번)
    Prompt {
        catalog: Arc<EmojiCatalog>,
        picker: Arc<dyn EmojiPicker>,
    },
}

/// 동기화기 핸들
#[derive(Clone)]
pub struct SynchronizerHandle {
    tx: mpsc::UnboundedSender<SyncCommand>,
}

impl SynchronizerHandle {
    /// 활동 이벤트 전달 (대기하지 않음)
    pub fn record_activity(&self, event: ActivityEvent) -> Result<(), CoreError> {
        self.send(SyncCommand::Activity(event))
    }

    /// 동기화 시작
    pub fn start(&self) -> Result<(), CoreError> {
        self.send(SyncCommand::Start)
    }

    /// 사용자 활성화 (초기화 후 시작)
    pub fn activate(&self) -> Result<(), CoreError> {
        self.send(SyncCommand::Activate)
    }

    /// 비활성화: 타이머가 해제된 뒤 반환
    pub async fn deactivate(&self) -> Result<(), CoreError> {
        let (ack, rx) = oneshot::channel();
        self.send(SyncCommand::Deactivate { ack })?;
        rx.await.map_err(|_| CoreError::Closed)
    }

    /// 현재 상태 조회
    pub async fn snapshot(&self) -> Result<StatusSnapshot, CoreError> {
        let (reply, rx) = oneshot::channel();
        self.send(SyncCommand::Snapshot { reply })?;
        rx.await.map_err(|_| CoreError::Closed)
    }

    /// 액터 종료 요청: 대기 중인 푸시는 모두 전송된다
    pub fn shutdown(&self) -> Result<(), CoreError> {
        self.send(SyncCommand::Shutdown)
    }

    fn send(&self, command: SyncCommand) -> Result<(), CoreError> {
        self.tx.send(command).map_err(|_| CoreError::Closed)
    }
}

/// 상태 동기화기
///
/// 이모지 선택은 별도 태스크에서 진행되고, 그동안 액터는 활동 기록과
/// 비활성화를 계속 처리한다. 시작 명령만 선택이 끝날 때까지 미뤄진다.
pub struct StatusSynchronizer {
    machine: StatusMachine,
    clock: Arc<dyn Clock>,
    emoji_resolver: Option<JoinHandle<()>>,
    deferred: Option<Deferred>,
    pusher: StatusPusher,
    timer: Option<Interval>,
    rx: mpsc::UnboundedReceiver<SyncCommand>,
}

impl StatusSynchronizer {
    /// 액터 태스크 시작
    pub fn spawn(
        settings: StatusSettings,
        emoji_source: EmojiSource,
        sink: Arc<dyn StatusSink>,
        clock: Arc<dyn Clock>,
    ) -> (SynchronizerHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut machine = StatusMachine::new(settings, clock.now());

        let emoji_resolver = match emoji_source {
            EmojiSource::Fixed(name) => {
                machine.set_active_emoji(&name);
                info!("작업 중 이모지: {}", machine.active_emoji());
                None
            }
            EmojiSource::Prompt { catalog, picker } => Some(tokio::spawn(resolve_emoji(
                catalog,
                picker,
                tx.downgrade(),
            ))),
        };

        let actor = Self {
            machine,
            clock,
            emoji_resolver,
            deferred: None,
            pusher: StatusPusher::spawn(sink),
            timer: None,
            rx,
        };
        let task = tokio::spawn(actor.run());

        (SynchronizerHandle { tx }, task)
    }

    async fn run(mut self) {
        info!("상태 동기화기 시작: {}", self.machine.settings().workspace);

        loop {
            tokio::select! {
                command = self.rx.recv() => {
                    match command {
                        Some(SyncCommand::Shutdown) | None => break,
                        Some(command) => self.handle(command),
                    }
                }
                _ = next_tick(&mut self.timer) => {
                    let effects = self.machine.tick(self.clock.now());
                    self.apply(effects);
                }
            }
        }

        if let Some(resolver) = self.emoji_resolver.take() {
            resolver.abort();
        }
        self.timer = None;
        self.pusher.close().await;
        info!("상태 동기화기 종료: {}", self.machine.settings().workspace);
    }

    fn handle(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::Activity(event) => {
                let effects = self
                    .machine
                    .record_activity(self.clock.now(), event.observed_language());
                self.apply(effects);
            }
            SyncCommand::Start if self.emoji_resolver.is_some() => {
                self.deferred.get_or_insert(Deferred::Start);
            }
            SyncCommand::Activate if self.emoji_resolver.is_some() => {
                self.deferred = Some(Deferred::Activate);
            }
            SyncCommand::Start => self.run_start(Deferred::Start),
            SyncCommand::Activate => self.run_start(Deferred::Activate),
            SyncCommand::Deactivate { ack } => {
                if self.deferred.take().is_some() {
                    debug!("이모지 선택 중 비활성화: 대기 중인 시작 취소");
                }
                let effects = self.machine.deactivate();
                self.apply(effects);
                let _ = ack.send(());
            }
            SyncCommand::Snapshot { reply } => {
                let _ = reply.send(self.machine.snapshot());
            }
            SyncCommand::EmojiResolved(name) => {
                self.emoji_resolver = None;
                self.machine.set_active_emoji(&name);
                info!("작업 중 이모지: {}", self.machine.active_emoji());
                if let Some(deferred) = self.deferred.take() {
                    self.run_start(deferred);
                }
            }
            SyncCommand::Shutdown => {}
        }
    }

    fn run_start(&mut self, kind: Deferred) {
        let now = self.clock.now();
        let effects = match kind {
            Deferred::Start => self.machine.start(now),
            Deferred::Activate => self.machine.activate(now),
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Push(status) => self.pusher.push(status),
                Effect::ArmTimer(period) => self.timer = Some(periodic(period)),
                Effect::CancelTimer => self.timer = None,
            }
        }
    }
}

/// 카탈로그 로드 후 사용자 선택 (취소 시 기본 이모지)
async fn resolve_emoji(
    catalog: Arc<EmojiCatalog>,
    picker: Arc<dyn EmojiPicker>,
    tx: mpsc::WeakUnboundedSender<SyncCommand>,
) {
    let ranked = rank_for_selection(&catalog.load().await);
    let name = match picker.pick(&ranked).await {
        Some(name) => name,
        None => {
            debug!("이모지 선택 취소, 기본값 사용");
            DEFAULT_ACTIVE_EMOJI.to_string()
        }
    };

    if let Some(tx) = tx.upgrade() {
        let _ = tx.send(SyncCommand::EmojiResolved(name));
    }
}

/// 첫 주기가 한 주기 뒤에 오는 타이머
fn periodic(period: Duration) -> Interval {
    let period = period.min(Duration::from_secs(MAX_MINUTES * 60));
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// 타이머가 없으면 영원히 대기
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
