//! 터미널 이모지 선택.
//!
//! `EmojiPicker` 포트 구현. 정렬된 후보 앞부분을 번호와 미리보기로 보여 주고
//! 번호나 이름을 입력받는다. 터미널이 아니면 선택 없이 취소로 처리한다.

use async_trait::async_trait;
use statusync_core::models::emoji::EmojiEntry;
use statusync_core::ports::emoji::EmojiPicker;
use statusync_status::catalog::preview;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, warn};

/// 한 번에 보여 줄 후보 수
const DEFAULT_PAGE_SIZE: usize = 20;
/// 잘못된 입력 허용 횟수
const MAX_ATTEMPTS: usize = 3;

/// 입력 해석 결과
#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Picked(String),
    Cancelled,
    Invalid,
}

/// 터미널 이모지 선택기
pub struct TerminalPicker {
    page_size: usize,
}

impl TerminalPicker {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for TerminalPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmojiPicker for TerminalPicker {
    async fn pick(&self, candidates: &[EmojiEntry]) -> Option<String> {
        if candidates.is_empty() || !io::stdin().is_terminal() {
            debug!("이모지 선택 생략 (후보 없음 또는 비대화형)");
            return None;
        }

        let candidates = candidates.to_vec();
        let page_size = self.page_size;
        match tokio::task::spawn_blocking(move || prompt(&candidates, page_size)).await {
            Ok(Ok(choice)) => choice,
            Ok(Err(e)) => {
                warn!("이모지 입력 실패: {e}");
                None
            }
            Err(e) => {
                warn!("이모지 선택 작업 join 실패: {e}");
                None
            }
        }
    }
}

/// 후보 목록 출력 후 입력 대기 (블로킹)
fn prompt(candidates: &[EmojiEntry], page_size: usize) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    writeln!(stdout)?;
    writeln!(stdout, "작업 중 상태 이모지를 선택하세요:")?;
    for (index, entry) in candidates.iter().take(page_size).enumerate() {
        writeln!(
            stdout,
            "  {:>2}. {}  {}",
            index + 1,
            preview(entry),
            entry.shortcode()
        )?;
    }

    let stdin = io::stdin();
    for _ in 0..MAX_ATTEMPTS {
        write!(stdout, "번호 또는 이름 (Enter = 기본값): ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_choice(&line, candidates, page_size) {
            Choice::Picked(name) => return Ok(Some(name)),
            Choice::Cancelled => return Ok(None),
            Choice::Invalid => writeln!(stdout, "알 수 없는 이모지: {}", line.trim())?,
        }
    }

    Ok(None)
}

/// 입력 해석: 표시된 번호, 또는 전체 후보 중 이름 (콜론 허용)
fn parse_choice(input: &str, candidates: &[EmojiEntry], page_size: usize) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Cancelled;
    }

    if let Ok(number) = input.parse::<usize>() {
        return match number.checked_sub(1) {
            Some(index) if index < page_size.min(candidates.len()) => {
                Choice::Picked(candidates[index].name.clone())
            }
            _ => Choice::Invalid,
        };
    }

    let name = input.trim_matches(':');
    candidates
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| Choice::Picked(entry.name.clone()))
        .unwrap_or(Choice::Invalid)
}
