//! 상태 문구 조합.

/// 경과 분을 "N minute(s)" 또는 "H hour(s) M minute(s)"로 표시
///
/// 복수형은 개수가 1보다 클 때만 붙인다 (0은 단수).
pub fn format_elapsed(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes} {}", unit(minutes, "minute"));
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    format!(
        "{hours} {} {rest} {}",
        unit(hours, "hour"),
        unit(rest, "minute")
    )
}

fn unit(count: i64, singular: &str) -> String {
    if count > 1 {
        format!("{singular}s")
    } else {
        singular.to_string()
    }
}

/// 작업 중 상태 문구
///
/// `"Working on {workspace}"` + `" in {language}"` + `" ({elapsed})"`.
/// 경과 시간은 1분 이상일 때만 붙인다.
pub fn working_message(
    workspace: &str,
    language: Option<&str>,
    elapsed_minutes: Option<i64>,
) -> String {
    let mut message = format!("Working on {workspace}");

    if let Some(language) = language {
        message.push_str(" in ");
        message.push_str(language);
    }

    if let Some(minutes) = elapsed_minutes.filter(|m| *m >= 1) {
        message.push_str(&format!(" ({})", format_elapsed(minutes)));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_pluralize_above_one() {
        assert_eq!(format_elapsed(0), "0 minute");
        assert_eq!(format_elapsed(1), "1 minute");
        assert_eq!(format_elapsed(2), "2 minutes");
        assert_eq!(format_elapsed(59), "59 minutes");
    }

    #[test]
    fn hours_and_minutes() {
        assert_eq!(format_elapsed(60), "1 hour 0 minute");
        assert_eq!(format_elapsed(61), "1 hour 1 minute");
        assert_eq!(format_elapsed(125), "2 hours 5 minutes");
        assert_eq!(format_elapsed(24 * 60 + 1), "24 hours 1 minute");
    }

    #[test]
    fn working_message_variants() {
        assert_eq!(working_message("demo", None, None), "Working on demo");
        assert_eq!(working_message("demo", None, Some(0)), "Working on demo");
        assert_eq!(
            working_message("demo", None, Some(2)),
            "Working on demo (2 minutes)"
        );
        assert_eq!(
            working_message("demo", Some("rust"), Some(90)),
            "Working on demo in rust (1 hour 30 minutes)"
        );
        assert_eq!(
            working_message("demo", Some("go"), None),
            "Working on demo in go"
        );
    }
}
