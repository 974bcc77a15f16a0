//! 이모지 카탈로그.
//!
//! GitHub 이모지 디렉토리를 24시간 캐시하고, 실패 시 내장 목록으로 대체한다.
//! 카탈로그 로드는 호출자에게 에러를 돌려주지 않는다.

use chrono::{DateTime, Utc};
use statusync_core::models::emoji::{EmojiCacheRecord, EmojiEntry};
use statusync_core::ports::cache_store::CacheStore;
use statusync_core::ports::clock::Clock;
use statusync_core::ports::emoji::EmojiDirectory;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 캐시 키: 항목 목록 (JSON)
pub const CACHE_DATA_KEY: &str = "emoji.data";
/// 캐시 키: 조회 시각 (RFC3339)
pub const CACHE_TIMESTAMP_KEY: &str = "emoji.timestamp";

/// GitHub 표준 이모지 이미지 경로
const UNICODE_BASE_URL: &str = "https://github.githubassets.com/images/icons/emoji/unicode";

/// 제로 폭 결합자 (ZWJ) 코드포인트
const ZERO_WIDTH_JOINER: &str = "200d";

/// 디렉토리 조회 실패 시 사용할 내장 목록 (이름, 코드포인트)
const FALLBACK_EMOJIS: [(&str, &str); 9] = [
    ("computer", "1f4bb"),
    ("rocket", "1f680"),
    ("zap", "26a1"),
    ("coffee", "2615"),
    ("fire", "1f525"),
    ("house", "1f3e0"),
    ("zzz", "1f4a4"),
    ("bug", "1f41b"),
    ("sparkles", "2728"),
];

/// 선택 목록 상단에 고정할 이름 (순서 유지)
const POPULAR_EMOJIS: [&str; 10] = [
    "computer", "rocket", "zap", "fire", "coffee", "bug", "sparkles", "tada", "house", "zzz",
];

/// URL에서 글리프를 얻지 못할 때 쓰는 정적 표
const GLYPH_TABLE: [(&str, &str); 19] = [
    ("computer", "💻"),
    ("rocket", "🚀"),
    ("zap", "⚡"),
    ("coffee", "☕"),
    ("fire", "🔥"),
    ("house", "🏠"),
    ("zzz", "💤"),
    ("bug", "🐛"),
    ("sparkles", "✨"),
    ("tada", "🎉"),
    ("books", "📚"),
    ("memo", "📝"),
    ("hammer", "🔨"),
    ("wrench", "🔧"),
    ("art", "🎨"),
    ("eyes", "👀"),
    ("thinking", "🤔"),
    ("construction", "🚧"),
    ("star", "⭐"),
];

/// 이모지 카탈로그
pub struct EmojiCatalog {
    directory: Arc<dyn EmojiDirectory>,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl EmojiCatalog {
    /// 새 카탈로그 생성
    pub fn new(
        directory: Arc<dyn EmojiDirectory>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            store,
            clock,
        }
    }

    /// 현재 시각 기준으로 로드
    pub async fn load(&self) -> Vec<EmojiEntry> {
        self.load_at(self.clock.now()).await
    }

    /// 지정한 시각 기준으로 로드
    ///
    /// 유효한 캐시 → 캐시, 아니면 디렉토리 조회 후 캐시 갱신,
    /// 조회 실패 → 내장 목록.
    pub async fn load_at(&self, now: DateTime<Utc>) -> Vec<EmojiEntry> {
        if let Some(record) = self.read_cache().await {
            if record.is_valid(now) {
                debug!("이모지 캐시 사용: {}개", record.entries.len());
                return record.entries;
            }
            debug!("이모지 캐시 만료: {}", record.fetched_at);
        }

        let mapping = match self.directory.fetch_all().await {
            Ok(mapping) => mapping,
            Err(e) => {
                warn!("이모지 디렉토리 조회 실패, 내장 목록 사용: {e}");
                return fallback_entries();
            }
        };

        let entries = entries_from_directory(mapping);
        if entries.is_empty() {
            warn!("이모지 디렉토리 응답이 비어 있음, 내장 목록 사용");
            return fallback_entries();
        }

        info!("이모지 디렉토리 로드: {}개", entries.len());
        let record = EmojiCacheRecord {
            entries,
            fetched_at: now,
        };
        self.write_cache(&record).await;
        record.entries
    }

    /// 캐시 읽기: 저장소/파싱 실패는 캐시 미스로 처리
    async fn read_cache(&self) -> Option<EmojiCacheRecord> {
        let data = match self.store.get(CACHE_DATA_KEY).await {
            Ok(value) => value?,
            Err(e) => {
                warn!("이모지 캐시 읽기 실패: {e}");
                return None;
            }
        };
        let timestamp = match self.store.get(CACHE_TIMESTAMP_KEY).await {
            Ok(value) => value?,
            Err(e) => {
                warn!("이모지 캐시 시각 읽기 실패: {e}");
                return None;
            }
        };

        let fetched_at = match DateTime::parse_from_rfc3339(&timestamp) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                warn!("이모지 캐시 시각 파싱 실패: {e}");
                return None;
            }
        };
        let entries: Vec<EmojiEntry> = match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("이모지 캐시 파싱 실패: {e}");
                return None;
            }
        };

        Some(EmojiCacheRecord {
            entries,
            fetched_at,
        })
    }

    /// 캐시 쓰기: 실패는 로그만 남긴다
    async fn write_cache(&self, record: &EmojiCacheRecord) {
        let data = match serde_json::to_string(&record.entries) {
            Ok(data) => data,
            Err(e) => {
                warn!("이모지 캐시 직렬화 실패: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(CACHE_DATA_KEY, &data).await {
            warn!("이모지 캐시 저장 실패: {e}");
            return;
        }
        if let Err(e) = self
            .store
            .set(CACHE_TIMESTAMP_KEY, &record.fetched_at.to_rfc3339())
            .await
        {
            warn!("이모지 캐시 시각 저장 실패: {e}");
        }
    }
}

/// 디렉토리 응답(이름 → URL)을 이름순 항목 목록으로 변환
fn entries_from_directory(mapping: HashMap<String, String>) -> Vec<EmojiEntry> {
    let mut entries: Vec<EmojiEntry> = mapping
        .into_iter()
        .filter(|(name, url)| !name.is_empty() && !url.is_empty())
        .map(|(name, url)| EmojiEntry { name, url })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// 내장 이모지 목록
pub fn fallback_entries() -> Vec<EmojiEntry> {
    FALLBACK_EMOJIS
        .iter()
        .map(|(name, code)| EmojiEntry::new(*name, format!("{UNICODE_BASE_URL}/{code}.png?v8")))
        .collect()
}

/// 사람이 볼 수 있는 글리프
///
/// URL의 `/unicode/<hex>-<hex>.png` 코드포인트 → 정적 표 → `:name:` 순으로 시도한다.
pub fn preview(entry: &EmojiEntry) -> String {
    if let Some(glyph) = glyph_from_url(&entry.url) {
        return glyph;
    }

    GLYPH_TABLE
        .iter()
        .find(|(name, _)| *name == entry.name)
        .map(|(_, glyph)| (*glyph).to_string())
        .unwrap_or_else(|| entry.shortcode())
}

/// URL 경로에 포함된 코드포인트 시퀀스를 문자열로 변환 (ZWJ 제외)
fn glyph_from_url(url: &str) -> Option<String> {
    let (_, tail) = url.split_once("/unicode/")?;
    let file = tail.split(['?', '#']).next()?;
    let sequence = file.strip_suffix(".png").unwrap_or(file);

    let mut glyph = String::new();
    for part in sequence.split('-') {
        if part.eq_ignore_ascii_case(ZERO_WIDTH_JOINER) {
            continue;
        }
        let code = u32::from_str_radix(part, 16).ok()?;
        glyph.push(char::from_u32(code)?);
    }

    if glyph.is_empty() {
        None
    } else {
        Some(glyph)
    }
}

/// 선택용 정렬: 인기 목록 순서대로 먼저, 나머지는 이름순
pub fn rank_for_selection(entries: &[EmojiEntry]) -> Vec<EmojiEntry> {
    let mut ranked: Vec<EmojiEntry> = POPULAR_EMOJIS
        .iter()
        .filter_map(|popular| entries.iter().find(|e| e.name == *popular).cloned())
        .collect();

    let mut rest: Vec<EmojiEntry> = entries
        .iter()
        .filter(|e| !POPULAR_EMOJIS.contains(&e.name.as_str()))
        .cloned()
        .collect();
    rest.sort_by(|a, b| a.name.cmp(&b.name));

    ranked.extend(rest);
    ranked
}
