//! Recompute engine
//!
//! Drives the walker → metrics → breakpoints chain and owns everything
//! that must survive between passes (settings, breakpoint state, the
//! generation counter).
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        Engine                             │
//! │  trigger():  cancel in-flight run, start a new one        │
//! │  on_outcome(): accept only the latest generation,         │
//! │                evaluate breakpoints, notify, render       │
//! └──────────────┬────────────────────────────▲───────────────┘
//!                │ spawn (fresh map + token)  │ outcome channel
//!                ▼                            │
//!         ┌─────────────┐   walker → metric reductions
//!         │ worker thread│──────────────────────┘
//!         └─────────────┘
//! ```
//!
//! Every trigger supersedes the previous run: its token is cancelled and
//! its outcome - should it still arrive - carries a stale generation and is
//! dropped. Results therefore render in start order (last-started-wins),
//! and a cancelled run can neither touch the breakpoint state nor reach
//! the renderer.

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::breakpoints::BreakpointTracker;
use crate::cancel::CancelToken;
use crate::config::Settings;
use crate::format::format_compact;
use crate::metrics::registry;
use crate::models::{AggregateMap, MeterReading};
use crate::render::{Notifier, ProgressRenderer};
use crate::tree::{DocNode, DocSource};
use crate::walker::{compute_stats, WalkError};

/// Data produced by one completed walk.
#[derive(Debug)]
pub struct RunData {
    pub map: AggregateMap,
    /// Metric values in registry order
    pub values: Vec<(&'static str, u64)>,
}

/// What a worker thread reports back, accepted or not.
#[derive(Debug)]
pub struct RunOutcome {
    pub generation: u64,
    pub result: Result<RunData, WalkError>,
}

pub struct Engine {
    source: Arc<dyn DocSource>,
    settings: Settings,
    tracker: BreakpointTracker,
    renderer: Box<dyn ProgressRenderer>,
    notifier: Box<dyn Notifier>,
    /// Generation of the most recently started run
    generation: u64,
    /// Token of the in-flight run, if any
    inflight: Option<CancelToken>,
    outcome_tx: Sender<RunOutcome>,
    outcome_rx: Receiver<RunOutcome>,
}

impl Engine {
    pub fn new(
        source: Arc<dyn DocSource>,
        settings: Settings,
        renderer: Box<dyn ProgressRenderer>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            source,
            settings,
            tracker: BreakpointTracker::new(),
            renderer,
            notifier,
            generation: 0,
            inflight: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings (e.g. after the settings file changed). The
    /// caller follows up with [`Engine::trigger`] to recompute against them.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Swap the document source, e.g. when a settings change altered the
    /// eligible extensions. Breakpoint state survives; it belongs to the
    /// process, not the source.
    pub fn replace_source(&mut self, source: Arc<dyn DocSource>) {
        self.source = source;
    }

    /// Receiver for worker outcomes, for select loops. Feed everything it
    /// yields back into [`Engine::on_outcome`].
    pub fn outcome_receiver(&self) -> Receiver<RunOutcome> {
        self.outcome_rx.clone()
    }

    /// Cancel any in-flight run and start a fresh one against the configured
    /// root. Returns false when the root does not resolve to a container
    /// (reported, not fatal - the previous rendering stays as it is).
    pub fn trigger(&mut self) -> bool {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        self.generation += 1;

        let root_path = self.settings.folder_path.clone();
        let root = match self.source.resolve(&root_path) {
            Some(node @ DocNode::Container(_)) => node,
            Some(DocNode::Leaf(_)) => {
                warn!("Configured folder {} is a document, not a folder", root_path);
                return false;
            }
            None => {
                warn!("Configured folder {} does not exist", root_path);
                return false;
            }
        };

        let token = CancelToken::new();
        self.inflight = Some(token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        let generation = self.generation;
        debug!("Starting recompute pass {} over {}", generation, root_path);

        thread::spawn(move || {
            let result = run_pass(source.as_ref(), &root, &root_path, &token);
            // The engine may be gone already; a dead channel just means
            // nobody is interested in this outcome anymore.
            let _ = tx.send(RunOutcome { generation, result });
        });
        true
    }

    /// Consume one worker outcome. Superseded and cancelled runs are
    /// no-ops; the latest completed run updates the breakpoint state and is
    /// handed to the renderer/notifier.
    pub fn on_outcome(&mut self, outcome: RunOutcome) -> Result<()> {
        if outcome.generation != self.generation {
            debug!(
                "Discarding superseded pass {} (current is {})",
                outcome.generation, self.generation
            );
            return Ok(());
        }
        self.inflight = None;

        let data = match outcome.result {
            Ok(data) => data,
            Err(WalkError::Cancelled) => {
                debug!("Pass {} cancelled mid-walk", outcome.generation);
                return Ok(());
            }
        };

        let mut meters = Vec::with_capacity(data.values.len());
        for (metric, &(name, value)) in registry().iter().zip(data.values.iter()) {
            let breakpoints = self.settings.breakpoints_for(metric);
            let eval = self.tracker.evaluate(name, value, &breakpoints);

            if let Some(prior) = eval.crossed {
                info!("{} crossed {} ({} now {})", name, prior, metric.label, value);
                if self.settings.notify {
                    let message = format!(
                        "{} passed {} {} (now {})",
                        metric.label,
                        format_compact(prior),
                        metric.unit,
                        format_compact(value)
                    );
                    self.notifier
                        .notify(&message, self.settings.notification_duration_ms);
                }
            }

            meters.push(MeterReading {
                name,
                label: metric.label,
                unit: metric.unit,
                value,
                ceiling: eval.ceiling,
            });
        }

        self.renderer.render(&data.map, &meters)
    }

    /// Recompute now and render the result before returning. Used by the
    /// one-shot command surface; the watch loop uses trigger/on_outcome
    /// directly. Returns false when no pass ran (missing root).
    pub fn recompute_blocking(&mut self) -> Result<bool> {
        if !self.trigger() {
            return Ok(false);
        }
        let target = self.generation;
        while let Ok(outcome) = self.outcome_rx.recv() {
            let done = outcome.generation == target;
            self.on_outcome(outcome)?;
            if done {
                break;
            }
        }
        Ok(true)
    }
}

/// One complete pass: walk the tree into a fresh map, then reduce every
/// registered metric over it.
fn run_pass(
    source: &dyn DocSource,
    root: &DocNode,
    root_path: &str,
    cancel: &CancelToken,
) -> Result<RunData, WalkError> {
    let mut map = AggregateMap::new();
    compute_stats(source, root, &mut map, cancel)?;

    let values = registry()
        .iter()
        .map(|metric| (metric.name, (metric.reduce)(&map, root_path)))
        .collect();

    Ok(RunData { map, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemSource;
    use std::sync::{Arc as StdArc, Mutex};

    /// Renderer that records every frame it is handed.
    #[derive(Clone, Default)]
    struct RecordingRenderer {
        frames: StdArc<Mutex<Vec<(AggregateMap, Vec<MeterReading>)>>>,
    }

    impl ProgressRenderer for RecordingRenderer {
        fn render(&mut self, map: &AggregateMap, meters: &[MeterReading]) -> Result<()> {
            self.frames
                .lock()
                .unwrap()
                .push((map.clone(), meters.to_vec()));
            Ok(())
        }
    }

    /// Notifier that records every message.
    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: StdArc<Mutex<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, message: &str, _duration_ms: u64) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn scenario_source() -> MemSource {
        let source = MemSource::new();
        source.add_file("book/a.md", "one two three", 50, 100);
        source.add_file("book/b.md", "four five", 150, 200);
        source
    }

    fn engine_for(
        source: MemSource,
    ) -> (Engine, StdArc<MemSource>, RecordingRenderer, RecordingNotifier) {
        let source = StdArc::new(source);
        let renderer = RecordingRenderer::default();
        let notifier = RecordingNotifier::default();
        let settings = Settings {
            folder_path: "book".to_string(),
            ..Settings::default()
        };
        let engine = Engine::new(
            source.clone(),
            settings,
            Box::new(renderer.clone()),
            Box::new(notifier.clone()),
        );
        (engine, source, renderer, notifier)
    }

    #[test]
    fn test_recompute_renders_scenario_values() {
        let (mut engine, _source, renderer, _notifier) = engine_for(scenario_source());
        engine.recompute_blocking().unwrap();

        let frames = renderer.frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        let (map, meters) = &frames[0];
        assert_eq!(map["book"].word_count, 5);

        let value_of = |name: &str| {
            meters
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.value)
                .unwrap()
        };
        assert_eq!(value_of("total_wc"), 5);
        assert_eq!(value_of("num_chapters"), 2);
        assert_eq!(value_of("latest_chapter_wc"), 2);
    }

    #[test]
    fn test_missing_root_aborts_without_rendering() {
        let source = MemSource::new();
        source.add_file("elsewhere/a.md", "words", 1, 2);
        let (mut engine, _source, renderer, _notifier) = engine_for(source);
        engine.update_settings(Settings {
            folder_path: "book".to_string(),
            ..Settings::default()
        });

        engine.recompute_blocking().unwrap();
        assert!(renderer.frames.lock().unwrap().is_empty());
    }

    #[test]
    fn test_leaf_root_aborts_without_rendering() {
        let source = MemSource::new();
        source.add_file("book/a.md", "words", 1, 2);
        let (mut engine, _source, renderer, _notifier) = engine_for(source);
        engine.update_settings(Settings {
            folder_path: "book/a.md".to_string(),
            ..Settings::default()
        });

        engine.recompute_blocking().unwrap();
        assert!(renderer.frames.lock().unwrap().is_empty());
    }

    #[test]
    fn test_superseded_outcome_is_dropped() {
        let (mut engine, _source, renderer, _notifier) = engine_for(scenario_source());

        assert!(engine.trigger());
        assert!(engine.trigger());

        // Both workers may complete; only the second generation renders.
        let rx = engine.outcome_receiver();
        let mut accepted = 0;
        for _ in 0..2 {
            match rx.recv_timeout(std::time::Duration::from_secs(5)) {
                Ok(outcome) => {
                    engine.on_outcome(outcome).unwrap();
                    accepted += 1;
                }
                Err(_) => break,
            }
        }
        assert!(accepted >= 1);
        assert_eq!(renderer.frames.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_first_pass_never_notifies() {
        let (mut engine, _source, _renderer, notifier) = engine_for(scenario_source());
        let mut settings = Settings {
            folder_path: "book".to_string(),
            ..Settings::default()
        };
        // Tiny breakpoints that the very first pass already exceeds
        settings
            .break_points
            .insert("total_wc".to_string(), "1, 2".to_string());
        engine.update_settings(settings);

        engine.recompute_blocking().unwrap();
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_crossing_notifies_once() {
        let (mut engine, source, _renderer, notifier) = engine_for(scenario_source());
        let mut settings = Settings {
            folder_path: "book".to_string(),
            ..Settings::default()
        };
        settings
            .break_points
            .insert("total_wc".to_string(), "6, 100".to_string());
        engine.update_settings(settings);

        // First pass: total 5, ceiling 6, baseline established
        engine.recompute_blocking().unwrap();
        assert!(notifier.messages.lock().unwrap().is_empty());

        // Grow chapter B past the ceiling
        source.set_content("book/b.md", "four five six seven", 300);

        engine.recompute_blocking().unwrap();
        let messages = notifier.messages.lock().unwrap();
        assert_eq!(
            messages
                .iter()
                .filter(|m| m.contains("Book Length"))
                .count(),
            1
        );
    }

    #[test]
    fn test_notify_disabled_suppresses_notifications() {
        let (mut engine, _source, _renderer, notifier) = engine_for(scenario_source());
        let mut settings = Settings {
            folder_path: "book".to_string(),
            notify: false,
            ..Settings::default()
        };
        settings
            .break_points
            .insert("total_wc".to_string(), "1".to_string());
        engine.update_settings(settings);

        engine.recompute_blocking().unwrap();
        engine.recompute_blocking().unwrap();
        assert!(notifier.messages.lock().unwrap().is_empty());
    }
}
