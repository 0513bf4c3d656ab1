//! JSON renderer for scripting
//!
//! Emits one JSON object per pass with the meter readings and the per-node
//! aggregates, for piping into other tools.

use anyhow::Result;
use serde::Serialize;

use crate::models::{AggregateMap, MeterReading};
use crate::render::ProgressRenderer;

#[derive(Serialize)]
struct JsonReport<'a> {
    meters: &'a [MeterReading],
    nodes: &'a AggregateMap,
}

/// Prints each accepted pass as a single JSON object on stdout.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressRenderer for JsonRenderer {
    fn render(&mut self, map: &AggregateMap, meters: &[MeterReading]) -> Result<()> {
        let report = JsonReport { meters, nodes: map };
        println!("{}", serde_json::to_string(&report)?);
        Ok(())
    }
}
