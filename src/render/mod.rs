//! Rendering and notification collaborators
//!
//! The engine hands each accepted recompute outcome to a
//! [`ProgressRenderer`] (per-node badges + one meter per metric) and fires
//! breakpoint crossings at a [`Notifier`]. Both are trait seams so tests
//! can record what the engine published instead of printing it.

mod json;
mod terminal;

pub use json::JsonRenderer;
pub use terminal::{TerminalNotifier, TerminalRenderer};

use anyhow::Result;

use crate::models::{AggregateMap, MeterReading};

/// Receives the aggregate map (badge display) and metric readings (meter
/// display) of a completed recompute pass.
pub trait ProgressRenderer: Send {
    fn render(&mut self, map: &AggregateMap, meters: &[MeterReading]) -> Result<()>;
}

/// Receives a human-readable crossing message and a display-duration hint.
pub trait Notifier: Send {
    fn notify(&mut self, message: &str, duration_ms: u64);
}
