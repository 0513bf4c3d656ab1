//! Core data models for Draftmeter
//!
//! These models are used throughout the codebase for representing
//! per-node aggregates and metric readings.

use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate statistics keyed by node path, produced by one complete walk.
///
/// A `BTreeMap` keeps iteration in lexicographic path order, which makes
/// every reduction over the map deterministic for a fixed tree.
pub type AggregateMap = BTreeMap<String, ChapterStats>;

/// Per-node aggregate statistics.
///
/// For a leaf this describes a single chapter; for a container it is the
/// combination of all children: word counts sum, `created_ms` is the earliest
/// non-zero child timestamp, `modified_ms` the latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChapterStats {
    /// Total words in this node (or its subtree)
    pub word_count: u64,
    /// Creation time, epoch milliseconds (0 = unknown)
    pub created_ms: i64,
    /// Last modification time, epoch milliseconds
    pub modified_ms: i64,
    /// True only for leaves whose content was successfully read
    pub is_chapter: bool,
}

impl ChapterStats {
    /// Stats for a successfully read chapter.
    pub fn chapter(word_count: u64, created_ms: i64, modified_ms: i64) -> Self {
        Self {
            word_count,
            created_ms,
            modified_ms,
            is_chapter: true,
        }
    }

    /// Fold a child's stats into a container aggregate.
    ///
    /// Word counts sum; `created_ms` keeps the minimum non-zero value so that
    /// children with unknown creation times don't reset the earliest date;
    /// `modified_ms` keeps the maximum.
    pub fn absorb(&mut self, child: &ChapterStats) {
        self.word_count += child.word_count;
        if child.created_ms != 0 && (self.created_ms == 0 || self.created_ms > child.created_ms) {
            self.created_ms = child.created_ms;
        }
        if self.modified_ms < child.modified_ms {
            self.modified_ms = child.modified_ms;
        }
    }
}

/// One metric's value against its current ceiling, ready for meter display.
#[derive(Debug, Clone, Serialize)]
pub struct MeterReading {
    /// Unique metric key, e.g. `total_wc`
    pub name: &'static str,
    /// Human-readable label, e.g. "Book Length"
    pub label: &'static str,
    /// Display unit, e.g. "words"
    pub unit: &'static str,
    /// Current computed value
    pub value: u64,
    /// Next breakpoint at or above the value (meter maximum)
    pub ceiling: u64,
}
