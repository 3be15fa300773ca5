//! String predicates and line splitting

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("line break regex"));

/// True for `None`, empty strings and whitespace-only strings
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

/// Inverse of [`is_blank`]
pub fn has_content(value: Option<&str>) -> bool {
    !is_blank(value)
}

/// Split on `\r\n`, `\r` or `\n`, trim each line and drop blank ones
///
/// With `Some(limit)`, at most `limit` lines are returned.
pub fn split_lines(text: &str, limit: Option<usize>) -> Vec<&str> {
    let lines = LINE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|line| !line.is_empty());
    match limit {
        Some(limit) => lines.take(limit).collect(),
        None => lines.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\r\n")));
        assert!(!is_blank(Some(" x ")));
    }

    #[test]
    fn test_has_content() {
        assert!(has_content(Some("a")));
        assert!(!has_content(Some("   ")));
        assert!(!has_content(None));
    }

    #[test]
    fn test_split_lines_mixed_breaks() {
        let lines = split_lines("one\r\ntwo\rthree\nfour", None);
        assert_eq!(lines, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_split_lines_trims_and_drops_blank() {
        let lines = split_lines("  alpha  \n\n   \r\n\tbeta\n", None);
        assert_eq!(lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_split_lines_limit() {
        assert_eq!(split_lines("a\nb\nc", Some(2)), vec!["a", "b"]);
        assert_eq!(split_lines("a\n\n\nb\nc", Some(2)), vec!["a", "b"]);
        assert!(split_lines("a\nb", Some(0)).is_empty());
        assert_eq!(split_lines("a", Some(10)), vec!["a"]);
    }

    #[test]
    fn test_split_lines_empty_input() {
        assert!(split_lines("", None).is_empty());
        assert!(split_lines("\r\n\r\n", None).is_empty());
    }
}
