//! Word counting for chapter text
//!
//! Counts "words" in a plain-text string: sequences of letters/numbers,
//! optionally continued by apostrophes and hyphens. YAML frontmatter and
//! fenced code blocks are excluded so they don't inflate counts. This is
//! deliberately lightweight - no full Markdown parse.

use regex::Regex;
use std::sync::OnceLock;

fn word_re() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b[\w&&[^_]][\w'-]*\b").expect("valid regex"))
}

fn fence_re() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("valid regex"))
}

/// Count words in `text`.
///
/// Empty input yields 0. A leading `---` frontmatter block is stripped up to
/// and including its closing `---` line; an unterminated block is left in
/// place and counted as ordinary text. Each fenced code block collapses to a
/// single space.
pub fn count_words(text: &str) -> u64 {
    if text.is_empty() {
        return 0;
    }

    // Fast strip of YAML frontmatter
    let mut body = text;
    if body.starts_with("---") {
        if let Some(rel) = body[3..].find("\n---") {
            body = &body[3 + rel + 4..];
        }
    }

    // Remove code fences to avoid inflating counts with code
    let defenced = fence_re().replace_all(body, " ");

    word_re().find_iter(&defenced).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(count_words("one two three"), 3);
        assert_eq!(count_words("  spaced   out  "), 2);
    }

    #[test]
    fn test_apostrophes_and_hyphens_stay_one_word() {
        assert_eq!(count_words("don't stop"), 2);
        assert_eq!(count_words("well-known fact"), 2);
    }

    #[test]
    fn test_punctuation_only_runs_do_not_count() {
        assert_eq!(count_words("... --- !!!"), 0);
        assert_eq!(count_words("_ __ ___"), 0);
    }

    #[test]
    fn test_closed_frontmatter_excluded() {
        let text = "---\ntitle: Chapter One\ntags: draft\n---\nalpha beta";
        assert_eq!(count_words(text), 2);
    }

    #[test]
    fn test_unterminated_frontmatter_counts_as_text() {
        let text = "---\ntitle: Chapter One\nalpha beta";
        // No closing delimiter: nothing is stripped
        assert_eq!(count_words(text), 5);
    }

    #[test]
    fn test_fenced_code_contributes_nothing() {
        let text = "before\n```\nlet x = 1;\nprintln!(\"{}\", x);\n```\nafter";
        assert_eq!(count_words(text), 2);
    }

    #[test]
    fn test_multiple_fences() {
        let text = "a\n```\ncode one\n```\nb\n```\ncode two\n```\nc";
        assert_eq!(count_words(text), 3);
    }

    #[test]
    fn test_deterministic() {
        let text = "---\nkey: value\n---\nsome words here\n```\nskip me\n```\nend";
        let first = count_words(text);
        for _ in 0..10 {
            assert_eq!(count_words(text), first);
        }
    }

    #[test]
    fn test_numbers_count_as_words() {
        assert_eq!(count_words("chapter 42 begins"), 3);
    }
}
