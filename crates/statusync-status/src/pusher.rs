//! 상태 푸시 워커.
//!
//! 싱크 호출을 별도 태스크에서 순서대로 수행한다.
//! 느린 호출은 해당 푸시만 지연시키고 동기화기 액터는 막지 않는다.

use statusync_core::models::status::StatusMessage;
use statusync_core::ports::status_sink::StatusSink;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 상태 푸시 워커 핸들
pub struct StatusPusher {
    tx: mpsc::UnboundedSender<StatusMessage>,
    worker: JoinHandle<()>,
}

impl StatusPusher {
    /// 워커 태스크 시작
    pub fn spawn(sink: Arc<dyn StatusSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<StatusMessage>();

        let worker = tokio::spawn(async move {
            while let Some(status) = rx.recv().await {
                match sink.set_status(&status).await {
                    Ok(()) => debug!("상태 푸시 완료: {} {}", status.emoji, status.message),
                    Err(e) => warn!("상태 푸시 실패 (무시): {e}"),
                }
            }
            debug!("상태 푸시 워커 종료");
        });

        Self { tx, worker }
    }

    /// 푸시 요청 (대기하지 않음)
    pub fn push(&self, status: StatusMessage) {
        if self.tx.send(status).is_err() {
            warn!("상태 푸시 워커가 이미 종료됨");
        }
    }

    /// 남은 푸시를 모두 처리한 뒤 워커 종료
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            warn!("상태 푸시 워커 join 실패: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use statusync_core::error::CoreError;

    #[derive(Default)]
    struct FlakySink {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatusSink for FlakySink {
        async fn set_status(&self, status: &StatusMessage) -> Result<(), CoreError> {
            self.seen.lock().push(status.message.clone());
            if status.message.contains("fail") {
                return Err(CoreError::Network("502".to_string()));
            }
            Ok(())
        }
    }

    fn status(message: &str) -> StatusMessage {
        StatusMessage {
            emoji: ":computer:".to_string(),
            message: message.to_string(),
            expires_at: None,
            limited_availability: false,
        }
    }

    #[tokio::test]
    async fn delivers_in_order_and_survives_failures() {
        let sink = Arc::new(FlakySink::default());
        let pusher = StatusPusher::spawn(sink.clone());

        pusher.push(status("one"));
        pusher.push(status("fail"));
        pusher.push(status("three"));
        pusher.close().await;

        assert_eq!(*sink.seen.lock(), vec!["one", "fail", "three"]);
    }
}
