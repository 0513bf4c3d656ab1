//! Metric registry
//!
//! A fixed, ordered table of named metrics. Each metric is metadata plus a
//! pure reduction from the aggregate map to a single number - total, never
//! panicking, returning 0 when the data it needs is missing, and
//! deterministic for a fixed map (the map iterates in path order).
//!
//! The registry is defined once at startup and never mutated at runtime;
//! meters render in registry order.

use crate::models::AggregateMap;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
/// Milliseconds in one week.
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// A named, pure reduction of the aggregate map to a scalar value.
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    /// Unique key, stable across versions (used in settings and tracker state)
    pub name: &'static str,
    /// Human-readable label for meters and notifications
    pub label: &'static str,
    /// Display unit
    pub unit: &'static str,
    /// Breakpoints used when the settings file has none for this metric
    pub default_breakpoints: &'static [u64],
    /// Reduction over (aggregate map, root path)
    pub reduce: fn(&AggregateMap, &str) -> u64,
}

static REGISTRY: [Metric; 4] = [
    Metric {
        name: "latest_chapter_wc",
        label: "Chapter Length",
        unit: "words",
        default_breakpoints: &[2_000, 4_000, 8_000],
        reduce: latest_chapter_wc,
    },
    Metric {
        name: "wc_weekly_pace",
        label: "Weekly Pace",
        unit: "words/wk",
        default_breakpoints: &[1_000, 5_000, 10_000],
        reduce: wc_weekly_pace,
    },
    Metric {
        name: "num_chapters",
        label: "Chapters",
        unit: "chapters",
        default_breakpoints: &[10, 20, 50],
        reduce: num_chapters,
    },
    Metric {
        name: "total_wc",
        label: "Book Length",
        unit: "words",
        default_breakpoints: &[10_000, 50_000, 100_000],
        reduce: total_wc,
    },
];

/// The process-wide metric registry, in display order.
pub fn registry() -> &'static [Metric] {
    &REGISTRY
}

/// Look up a metric by its unique key.
pub fn by_name(name: &str) -> Option<&'static Metric> {
    REGISTRY.iter().find(|m| m.name == name)
}

/// Word count of the most recently modified chapter.
///
/// Only chapter entries participate: a container's `modified_ms` is by
/// construction the max of its children, so it would always shadow the
/// chapter that actually changed. Ties go to the first entry in path order.
fn latest_chapter_wc(map: &AggregateMap, _root: &str) -> u64 {
    let mut latest = 0u64;
    let mut max_modified = i64::MIN;
    for stats in map.values().filter(|s| s.is_chapter) {
        if stats.modified_ms > max_modified {
            max_modified = stats.modified_ms;
            latest = stats.word_count;
        }
    }
    latest
}

/// Projected words per week, from the root's total span.
///
/// `interval = modified - created` of the root entry; a non-positive
/// interval clamps to one day so a brand-new folder doesn't divide by zero
/// or report an absurd rate.
fn wc_weekly_pace(map: &AggregateMap, root: &str) -> u64 {
    let Some(stats) = map.get(root) else {
        return 0;
    };
    let mut interval = stats.modified_ms - stats.created_ms;
    if interval <= 0 {
        interval = DAY_MS;
    }
    let pace = stats.word_count as f64 * WEEK_MS as f64 / interval as f64;
    if pace.is_finite() {
        pace.round() as u64
    } else {
        0
    }
}

/// Number of chapter entries in the map.
fn num_chapters(map: &AggregateMap, _root: &str) -> u64 {
    map.values().filter(|s| s.is_chapter).count() as u64
}

/// Word count of the root entry, or 0 if absent.
fn total_wc(map: &AggregateMap, root: &str) -> u64 {
    map.get(root).map(|s| s.word_count).unwrap_or(0)
}
