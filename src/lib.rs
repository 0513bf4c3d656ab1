//! Draftmeter - writing-progress meters for folder trees
//!
//! A fast, local-first progress tracker that aggregates word counts over a
//! folder of chapters and re-renders badges and meters whenever the
//! underlying documents change.

pub mod breakpoints;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod metrics;
pub mod models;
pub mod render;
pub mod tokenize;
pub mod tree;
pub mod walker;
