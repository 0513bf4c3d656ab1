//! Recursive statistics walker
//!
//! Turns a document tree into per-node [`ChapterStats`], bottom-up:
//! - a leaf's stats come from reading and tokenizing its content
//! - a container's stats combine its children (sum / earliest / latest)
//!
//! The walk is cancellable: the token is checked at the entry of every
//! node's processing, and a signalled token aborts the whole pass with
//! [`WalkError::Cancelled`]. Callers discard the aggregate map of a
//! cancelled pass wholesale; entries written before the signal are never
//! observed downstream.

use thiserror::Error;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::models::{AggregateMap, ChapterStats};
use crate::tokenize::count_words;
use crate::tree::{DocNode, DocSource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalkError {
    /// The pass was superseded; abort without surfacing to the user.
    #[error("recompute pass cancelled")]
    Cancelled,
}

/// Recursively compute stats for `node` and its subtree, recording every
/// container and every readable leaf in `map` keyed by path.
///
/// An unreadable leaf contributes zero stats and is left out of the map
/// entirely - it is invisible to aggregation and rendering.
pub fn compute_stats(
    source: &dyn DocSource,
    node: &DocNode,
    map: &mut AggregateMap,
    cancel: &CancelToken,
) -> Result<ChapterStats, WalkError> {
    if cancel.is_cancelled() {
        return Err(WalkError::Cancelled);
    }

    match node {
        DocNode::Container(container) => {
            let mut stats = ChapterStats::default();
            for child in source.children(container) {
                let child_stats = compute_stats(source, &child, map, cancel)?;
                stats.absorb(&child_stats);
            }
            map.insert(container.path.clone(), stats);
            Ok(stats)
        }
        DocNode::Leaf(leaf) => match source.read(leaf) {
            Ok(content) => {
                let stats =
                    ChapterStats::chapter(count_words(&content), leaf.created_ms, leaf.modified_ms);
                map.insert(leaf.path.clone(), stats);
                Ok(stats)
            }
            Err(e) => {
                debug!("Skipping unreadable document {}: {}", leaf.path, e);
                Ok(ChapterStats::default())
            }
        },
    }
}
