//! Utility functions for the moderation services.

use std::sync::LazyLock;

use regex::Regex;

static SECRET_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)(api[_-]?key|apikey)[=:]\s*\S{20,}", "$1=***REDACTED***"),
        (r"(?i)(token|secret|bearer)\s*[=:]?\s*[A-Za-z0-9_\-\.]{16,}", "$1 ***REDACTED***"),
        (r"gsk_[a-zA-Z0-9]{20,}", "***REDACTED_API_KEY***"),
        (r"sk-[a-zA-Z0-9\-]{20,}", "***REDACTED_API_KEY***"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Works on character boundaries, so multi-byte text (emoji, CJK, accents) is never split.
/// The kept prefix is exactly `max_chars` characters, trailing whitespace included.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Count whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Sanitize a string for safe logging (redact credentials).
pub fn sanitize_for_log(s: &str) -> String {
    let mut result = s.to_string();
    for (re, replacement) in SECRET_PATTERNS.iter() {
        result = re.replace_all(&result, *replacement).to_string();
    }
    result
}

/// Parse a duration string like "500ms", "30s", "5m" or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<std::time::Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty duration string".into());
    }

    if let Some(ms) = s.strip_suffix("ms") {
        let num: u64 = ms.parse().map_err(|_| format!("Invalid number: {ms}"))?;
        return Ok(std::time::Duration::from_millis(num));
    }

    if let Ok(secs) = s.parse::<u64>() {
        return Ok(std::time::Duration::from_secs(secs));
    }

    let unit_start = s.char_indices().last().map_or(0, |(i, _)| i);
    let (num_str, unit) = s.split_at(unit_start);
    let num: u64 = num_str.parse().map_err(|_| format!("Invalid number: {num_str}"))?;

    match unit {
        "s" => Ok(std::time::Duration::from_secs(num)),
        "m" => Ok(std::time::Duration::from_secs(num * 60)),
        "h" => Ok(std::time::Duration::from_secs(num * 3600)),
        _ => Err(format!("Unknown unit: {unit}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use test_case::test_case;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hello...");
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello ...");
        assert_eq!(truncate_with_ellipsis("😀😀😀😀", 2), "😀😀...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
    }

    #[test]
    fn test_truncate_exact_length_is_untouched() {
        let text = "a".repeat(150);
        assert_eq!(truncate_with_ellipsis(&text, 150), text);
        let longer = "b".repeat(151);
        assert_eq!(truncate_with_ellipsis(&longer, 150), format!("{}...", "b".repeat(150)));
    }

    #[test]
    fn test_truncate_keeps_trailing_space_in_prefix() {
        let text = format!("{} tail", "c".repeat(149));
        let out = truncate_with_ellipsis(&text, 150);
        assert_eq!(out.chars().count(), 153);
        assert_eq!(out, format!("{} ...", "c".repeat(149)));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("clean  rooms\n\tgood food"), 4);
    }

    #[test]
    fn test_sanitize_for_log() {
        let input = "Using api_key=gsk_12345678901234567890abcd";
        let output = sanitize_for_log(input);
        assert!(!output.contains("gsk_12345678901234567890abcd"));
        assert!(output.contains("REDACTED"));

        let plain = "upstream returned 503 Service Unavailable";
        assert_eq!(sanitize_for_log(plain), plain);
    }

    #[test_case("30s", 30_000 ; "seconds")]
    #[test_case("250ms", 250 ; "milliseconds")]
    #[test_case("2m", 120_000 ; "minutes")]
    #[test_case("1h", 3_600_000 ; "hours")]
    #[test_case("45", 45_000 ; "bare seconds")]
    fn test_parse_duration(input: &str, millis: u64) {
        assert_eq!(parse_duration(input).unwrap(), Duration::from_millis(millis));
    }

    #[test_case("abc" ; "not a number")]
    #[test_case("" ; "empty")]
    #[test_case("5d" ; "unknown unit")]
    #[test_case("5€" ; "multibyte unit")]
    fn test_parse_duration_rejects(input: &str) {
        assert!(parse_duration(input).is_err());
    }
}
