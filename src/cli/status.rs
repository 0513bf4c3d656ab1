//! Status command - recompute once and render
//!
//! This is the manual "recompute now" surface: one full walker pass,
//! metric reduction, and a single render, then exit.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::engine::Engine;
use crate::render::{JsonRenderer, ProgressRenderer, TerminalNotifier, TerminalRenderer};
use crate::tree::FsSource;

pub fn run(path: &Path, format: &str) -> Result<()> {
    let project_dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let settings = Settings::load(&project_dir);
    let folder_path = settings.folder_path.clone();
    let source = Arc::new(FsSource::new(&project_dir, settings.extensions()));

    let renderer: Box<dyn ProgressRenderer> = match format {
        "json" => Box::new(JsonRenderer::new()),
        _ => Box::new(TerminalRenderer::new()),
    };

    let mut engine = Engine::new(source, settings, renderer, Box::new(TerminalNotifier::new()));
    if !engine.recompute_blocking()? {
        println!(
            "  {} Folder {} not found. Set {} in {}",
            style("[--]").dim(),
            style(&folder_path).cyan(),
            style("folder_path").cyan(),
            style("draftmeter.toml").cyan()
        );
    }
    Ok(())
}
