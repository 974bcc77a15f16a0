//! 에디터 활동 모델.
//!
//! 에디터 플러그인이 보내는 활동 이벤트를 표현.

use serde::{Deserialize, Serialize};

/// 활동으로 간주하는 에디터 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// 문서 저장 (언어 ID 동반 가능)
    Save,
    /// 문서 편집
    Edit,
    /// 선택 영역 변경
    Selection,
    /// 활성 에디터 변경
    ActiveEditor,
    /// 보이는 영역 변경 (스크롤)
    VisibleRange,
}

/// 활동 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// 이벤트 종류
    pub kind: ActivityKind,
    /// 관측된 언어 ID (저장 이벤트에서만 사용)
    #[serde(default)]
    pub language: Option<String>,
}

impl ActivityEvent {
    /// 언어 정보 없는 이벤트 생성
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            language: None,
        }
    }

    /// 저장 이벤트 생성
    pub fn save(language: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Save,
            language: Some(language.into()),
        }
    }

    /// 동기화기에 전달할 언어 (저장 이벤트의 비어있지 않은 값만)
    pub fn observed_language(&self) -> Option<&str> {
        match self.kind {
            ActivityKind::Save => self
                .language
                .as_deref()
                .map(str::trim)
                .filter(|lang| !lang.is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plugin_payload() {
        let event: ActivityEvent =
            serde_json::from_str(r#"{"kind":"save","language":"rust"}"#).unwrap();
        assert_eq!(event, ActivityEvent::save("rust"));

        let event: ActivityEvent = serde_json::from_str(r#"{"kind":"visible_range"}"#).unwrap();
        assert_eq!(event.kind, ActivityKind::VisibleRange);
        assert!(event.language.is_none());
    }

    #[test]
    fn only_save_reports_language() {
        assert_eq!(ActivityEvent::save("go").observed_language(), Some("go"));
        assert_eq!(ActivityEvent::save("  ").observed_language(), None);

        let edit = ActivityEvent {
            kind: ActivityKind::Edit,
            language: Some("go".to_string()),
        };
        assert_eq!(edit.observed_language(), None);
    }
}
