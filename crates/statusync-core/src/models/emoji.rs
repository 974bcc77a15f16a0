//! 상태 이모지 모델.
//!
//! GitHub 이모지 디렉토리 항목과 캐시 레코드를 표현.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 캐시 유효 기간 (시간)
pub const EMOJI_CACHE_TTL_HOURS: i64 = 24;

/// 이모지 디렉토리 항목
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmojiEntry {
    /// 이모지 이름 (콜론 없이, 예: "rocket")
    pub name: String,
    /// 이미지 URL (표준 이모지는 `/unicode/<codepoints>.png` 포함)
    pub url: String,
}

impl EmojiEntry {
    /// 새 항목 생성
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// 콜론으로 감싼 단축 코드 (예: ":rocket:")
    pub fn shortcode(&self) -> String {
        shortcode(&self.name)
    }
}

/// 이름 또는 단축 코드를 `:name:` 형태로 정규화
pub fn shortcode(name: &str) -> String {
    format!(":{}:", name.trim().trim_matches(':'))
}

/// 캐시된 이모지 목록과 조회 시각
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiCacheRecord {
    /// 이름순 정렬된 항목
    pub entries: Vec<EmojiEntry>,
    /// 디렉토리에서 가져온 시각
    pub fetched_at: DateTime<Utc>,
}

impl EmojiCacheRecord {
    /// 캐시가 아직 유효한지 확인 (`now - fetched_at < 24h`)
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < Duration::hours(EMOJI_CACHE_TTL_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcode_normalizes_colons() {
        assert_eq!(shortcode("rocket"), ":rocket:");
        assert_eq!(shortcode(":rocket:"), ":rocket:");
        assert_eq!(shortcode(" zzz "), ":zzz:");
        assert_eq!(EmojiEntry::new("fire", "").shortcode(), ":fire:");
    }

    #[test]
    fn cache_record_expires_after_24h() {
        let fetched_at = Utc::now();
        let record = EmojiCacheRecord {
            entries: vec![],
            fetched_at,
        };

        assert!(record.is_valid(fetched_at + Duration::hours(23)));
        assert!(!record.is_valid(fetched_at + Duration::hours(24)));
        assert!(!record.is_valid(fetched_at + Duration::hours(25)));
    }
}
