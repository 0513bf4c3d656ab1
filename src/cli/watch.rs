//! `draftmeter watch` - live progress on document changes
//!
//! Watches the project directory and recomputes on every change. Event
//! kinds are not distinguished: create, modify, delete and rename all
//! trigger the same full recompute, and the engine cancels whatever pass a
//! previous event started. Edits to the settings file reload settings
//! first, then recompute; breakpoint baselines survive the reload.

use anyhow::{Context, Result};
use console::style;
use crossbeam_channel::{select, unbounded};
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::engine::Engine;
use crate::render::{TerminalNotifier, TerminalRenderer};
use crate::tree::FsSource;

pub fn run(path: &Path, debounce_ms: u64) -> Result<()> {
    let project_dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let settings = Settings::load(&project_dir);
    let settings_path = Settings::project_path(&project_dir);

    println!(
        "\nWatching {} for changes...\n",
        style(project_dir.join(&settings.folder_path).display()).cyan()
    );
    println!("  {} Save a document to update the meters", style("→").dim());
    println!("  {} Press Ctrl+C to stop\n", style("→").dim());

    // Set up file watcher with debouncing. The whole project directory is
    // watched so the settings file and a folder created later are covered
    // by the same subscription.
    let (event_tx, event_rx) = unbounded();

    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        None,
        move |result: DebounceEventResult| {
            if let Ok(events) = result {
                let paths: Vec<PathBuf> = events
                    .iter()
                    .flat_map(|event| event.paths.iter().cloned())
                    .collect();
                let _ = event_tx.send(paths);
            }
        },
    )?;

    debouncer.watch(&project_dir, RecursiveMode::Recursive)?;

    let source = Arc::new(FsSource::new(&project_dir, settings.extensions()));
    let mut engine = Engine::new(
        source,
        settings,
        Box::new(TerminalRenderer::new()),
        Box::new(TerminalNotifier::new()),
    );
    let outcome_rx = engine.outcome_receiver();

    // Initial pass so the meters show up before the first edit
    if !engine.trigger() {
        println!(
            "  {} Folder {} not found yet; waiting for it to appear",
            style("[--]").dim(),
            style(&engine.settings().folder_path).cyan()
        );
    }

    loop {
        select! {
            recv(event_rx) -> msg => {
                let Ok(paths) = msg else { break };

                if paths.iter().any(|p| *p == settings_path) {
                    let reloaded = Settings::load(&project_dir);
                    if reloaded != *engine.settings() {
                        engine.replace_source(Arc::new(FsSource::new(
                            &project_dir,
                            reloaded.extensions(),
                        )));
                        engine.update_settings(reloaded);
                        println!(
                            "Settings reloaded, tracking {}",
                            style(&engine.settings().folder_path).cyan()
                        );
                    }
                }

                let time = chrono::Local::now().format("%H:%M:%S");
                println!(
                    "{} change detected, recomputing...",
                    style(format!("[{}]", time)).dim()
                );
                engine.trigger();
            },
            recv(outcome_rx) -> msg => {
                let Ok(outcome) = msg else { break };
                engine.on_outcome(outcome)?;
            },
        }
    }

    Ok(())
}
