//! Compact number formatting and parsing
//!
//! Breakpoints are written in settings (and rendered in badges) in a
//! compact "1.2K" notation: up to two fraction digits, suffixes K/M/B/T.
//! Parsing accepts the same notation case-insensitively, with thousands
//! separators ("1,200"). parse -> format -> parse is idempotent.

use regex::Regex;
use std::sync::OnceLock;

const SUFFIXES: [(u64, &str); 4] = [
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

fn compact_re() -> &'static Regex {
    static COMPACT: OnceLock<Regex> = OnceLock::new();
    COMPACT.get_or_init(|| Regex::new(r"^([\d,.]+)([kmbt])?$").expect("valid regex"))
}

/// Format a number compactly: `999` -> "999", `1200` -> "1.2K",
/// `2500000` -> "2.5M". At most two fraction digits, trailing zeros
/// trimmed.
pub fn format_compact(n: u64) -> String {
    for (div, suffix) in SUFFIXES {
        if n >= div {
            let scaled = n as f64 / div as f64;
            let mut s = format!("{:.2}", scaled);
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
            return format!("{s}{suffix}");
        }
    }
    n.to_string()
}

/// Parse a compact number: "1.2K" -> 1200, "1,500" -> 1500, "42" -> 42.
/// Returns `None` for anything that isn't a number with an optional
/// k/m/b/t suffix.
pub fn parse_compact(s: &str) -> Option<u64> {
    let normalized = s.trim().to_lowercase();
    let caps = compact_re().captures(&normalized)?;
    let digits = caps[1].replace(',', "");
    let value: f64 = digits.parse().ok()?;
    let multiplier = caps.get(2).map_or(1u64, |m| match m.as_str() {
        "k" => 1_000,
        "m" => 1_000_000,
        "b" => 1_000_000_000,
        _ => 1_000_000_000_000,
    });
    let scaled = value * multiplier as f64;
    if !scaled.is_finite() || scaled < 0.0 {
        return None;
    }
    Some(scaled.round() as u64)
}

/// Parse a comma-separated breakpoint list: "100, 1.2K" -> [100, 1200].
/// Any unparseable element rejects the whole list.
pub fn parse_breakpoint_list(s: &str) -> Option<Vec<u64>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split(',').map(parse_compact).collect()
}

/// Format a breakpoint list back to its settings representation.
pub fn format_breakpoint_list(breakpoints: &[u64]) -> String {
    breakpoints
        .iter()
        .map(|bp| format_compact(*bp))
        .collect::<Vec<_>>()
        .join(", ")
}
