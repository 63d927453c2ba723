/**
 * Reading Time
 * Estimates reading time for long-form markdown content at a fixed
 * words-per-minute rate, and parses the estimate back out of its
 * display form for series totals.
 */
use lazy_static::lazy_static;
use regex::Regex;

/// Single rate applied everywhere an estimate is derived.
pub const WORDS_PER_MINUTE: usize = 225;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`\n]*`").unwrap();
    static ref MD_LINK: Regex = Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?m)^#{1,6}\s+").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"[*_]{1,3}").unwrap();
    static ref LEADING_MINUTES: Regex = Regex::new(r"^\s*(\d+)").unwrap();
}

/// Strip markdown syntax down to prose: code fences and inline code are
/// removed outright, links keep their text, heading and emphasis markers
/// are dropped.
fn strip_markdown(content: &str) -> String {
    let stripped = CODE_FENCE.replace_all(content, " ");
    let stripped = INLINE_CODE.replace_all(&stripped, " ");
    let stripped = MD_LINK.replace_all(&stripped, "$1");
    let stripped = HEADING.replace_all(&stripped, "");
    let stripped = EMPHASIS.replace_all(&stripped, "");
    stripped.into_owned()
}

/// Word count of the content after markdown stripping.
pub fn word_count(content: &str) -> usize {
    strip_markdown(content).split_whitespace().count()
}

/// Reading-time estimate as the display string `"<N> min read"`, rounding
/// minutes up. Any non-empty content reads as at least one minute.
pub fn reading_time(content: &str) -> String {
    let words = word_count(content);
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    format!("{} min read", minutes)
}

/// Leading integer of a `"<N> min read"` string; anything non-parsable
/// contributes zero.
pub fn parse_reading_minutes(reading_time: &str) -> i64 {
    LEADING_MINUTES
        .captures(reading_time)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_reading_time_ceiling_at_rate_boundary() {
        assert_eq!(reading_time(&words(225)), "1 min read");
        assert_eq!(reading_time(&words(226)), "2 min read");
        assert_eq!(reading_time(&words(450)), "2 min read");
    }

    #[test]
    fn test_reading_time_minimum_one_minute() {
        assert_eq!(reading_time("hello"), "1 min read");
        assert_eq!(reading_time(""), "0 min read");
    }

    #[test]
    fn test_reading_time_monotonic_in_word_count() {
        let shorter = parse_reading_minutes(&reading_time(&words(100)));
        let longer = parse_reading_minutes(&reading_time(&words(1000)));
        assert!(shorter <= longer);
    }

    #[test]
    fn test_markdown_syntax_is_not_counted() {
        let content = "# Title\n\nSome **bold** text with a [link](https://example.com).\n\n\
                       ```rust\nfn main() { println!(\"hi\"); }\n```\n\nAnd `inline code` too.";
        let stripped = strip_markdown(content);
        assert!(!stripped.contains("```"));
        assert!(!stripped.contains('#'));
        assert!(!stripped.contains("**"));
        assert!(!stripped.contains("https://example.com"));
        assert!(stripped.contains("link"));
        // Title, Some, bold, text, with, a, link., And, too.
        assert_eq!(word_count(content), 9);
    }

    #[test]
    fn test_parse_reading_minutes() {
        assert_eq!(parse_reading_minutes("5 min read"), 5);
        assert_eq!(parse_reading_minutes("12 min read"), 12);
        assert_eq!(parse_reading_minutes("quick read"), 0);
        assert_eq!(parse_reading_minutes(""), 0);
    }
}
