//! Settings store
//!
//! This module handles:
//! - Loading `draftmeter.toml` from the project directory, with a
//!   user-level fallback (~/.config/draftmeter/config.toml)
//! - Defaults for every missing key
//! - Per-metric breakpoint overrides in compact notation
//!
//! # Configuration Format
//!
//! ```toml
//! # draftmeter.toml
//!
//! folder_path = "chapters"
//! include_extensions = "md,txt"
//! notify = true
//! notification_duration_ms = 5000
//!
//! [break_points]
//! total_wc = "10K, 50K, 100K"
//! latest_chapter_wc = "2K, 4K, 8K"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::format::parse_breakpoint_list;
use crate::metrics::Metric;

pub const SETTINGS_FILE: &str = "draftmeter.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root container path, relative to the project directory
    pub folder_path: String,

    /// Comma-separated list of eligible file extensions; empty admits all
    pub include_extensions: String,

    /// Whether breakpoint crossings produce notifications
    pub notify: bool,

    /// How long a notification should stay visible
    pub notification_duration_ms: u64,

    /// Per-metric breakpoint lists in compact notation ("10K, 50K")
    pub break_points: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            folder_path: ".".to_string(),
            include_extensions: "md,txt".to_string(),
            notify: true,
            notification_duration_ms: 5_000,
            break_points: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings for a project directory, with priority:
    /// 1. `<project>/draftmeter.toml`
    /// 2. User config (~/.config/draftmeter/config.toml)
    /// 3. Built-in defaults
    ///
    /// A missing file is normal; an unreadable or malformed file logs a
    /// warning and falls back to the next source. Loading never fails.
    pub fn load(project_dir: &Path) -> Self {
        let candidates: Vec<PathBuf> = [Some(Self::project_path(project_dir)), Self::user_path()]
            .into_iter()
            .flatten()
            .collect();
        Self::load_first(&candidates)
    }

    /// Load the first readable, parseable settings file from `candidates`,
    /// or the defaults when none qualifies.
    fn load_first(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_file(path) {
                Ok(settings) => {
                    debug!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => warn!("Ignoring settings at {}: {}", path.display(), e),
            }
        }
        Settings::default()
    }

    /// Parse one settings file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Write settings back to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("cannot serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    /// The project-level settings path.
    pub fn project_path(project_dir: &Path) -> PathBuf {
        project_dir.join(SETTINGS_FILE)
    }

    /// The user-level settings path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("draftmeter").join("config.toml"))
    }

    /// Breakpoints for a metric: the configured list when present and
    /// parseable, otherwise the metric's defaults. A malformed list only
    /// affects its own metric.
    pub fn breakpoints_for(&self, metric: &Metric) -> Vec<u64> {
        match self.break_points.get(metric.name) {
            Some(raw) => match parse_breakpoint_list(raw) {
                Some(parsed) => parsed,
                None => {
                    warn!(
                        "Malformed breakpoints for {} ({:?}); using defaults",
                        metric.name, raw
                    );
                    metric.default_breakpoints.to_vec()
                }
            },
            None => metric.default_breakpoints.to_vec(),
        }
    }

    /// Eligible file extensions, lowercased, empty entries dropped.
    pub fn extensions(&self) -> Vec<String> {
        self.include_extensions
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Write a commented example settings file. Refuses to overwrite.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example = r#"# Draftmeter configuration

# Folder tree to track, relative to this file's directory
folder_path = "."

# Comma-separated extensions of documents to count
include_extensions = "md,txt"

# Notify when a progress breakpoint is crossed
notify = true
notification_duration_ms = 5000

# Per-metric breakpoints in compact notation.
# Metrics: latest_chapter_wc, wc_weekly_pace, num_chapters, total_wc
[break_points]
# total_wc = "10K, 50K, 100K"
# latest_chapter_wc = "2K, 4K, 8K"
"#;
        std::fs::write(path, example)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.folder_path, ".");
        assert_eq!(settings.extensions(), vec!["md", "txt"]);
        assert!(settings.notify);
        assert_eq!(settings.notification_duration_ms, 5_000);
        assert!(settings.break_points.is_empty());
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("folder_path = \"chapters\"").unwrap();
        assert_eq!(settings.folder_path, "chapters");
        assert_eq!(settings.include_extensions, "md,txt");
        assert!(settings.notify);
    }

    #[test]
    fn test_breakpoints_parse_from_compact_notation() {
        let toml_str = r#"
[break_points]
total_wc = "10K, 50K"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        let metric = metrics::by_name("total_wc").unwrap();
        assert_eq!(settings.breakpoints_for(metric), vec![10_000, 50_000]);
    }

    #[test]
    fn test_malformed_breakpoints_fall_back_per_metric() {
        let toml_str = r#"
[break_points]
total_wc = "not numbers"
num_chapters = "5, 15"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();

        let total = metrics::by_name("total_wc").unwrap();
        assert_eq!(settings.breakpoints_for(total), total.default_breakpoints);

        // The well-formed metric keeps its configured list
        let chapters = metrics::by_name("num_chapters").unwrap();
        assert_eq!(settings.breakpoints_for(chapters), vec![5, 15]);
    }

    #[test]
    fn test_unconfigured_metric_uses_defaults() {
        let settings = Settings::default();
        let metric = metrics::by_name("wc_weekly_pace").unwrap();
        assert_eq!(settings.breakpoints_for(metric), metric.default_breakpoints);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.folder_path = "chapters".to_string();
        settings
            .break_points
            .insert("total_wc".to_string(), "10K, 50K".to_string());
        settings.save(&path).unwrap();

        let loaded = Settings::load_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_with_bad_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "not [[ valid toml").unwrap();
        let settings = Settings::load_first(&[path]);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_skips_missing_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let present = dir.path().join(SETTINGS_FILE);
        std::fs::write(&present, "folder_path = \"chapters\"").unwrap();

        let settings = Settings::load_first(&[missing, present]);
        assert_eq!(settings.folder_path, "chapters");
    }

    #[test]
    fn test_write_example_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        Settings::write_example(&path).unwrap();

        let parsed = Settings::load_file(&path).unwrap();
        assert_eq!(parsed.folder_path, ".");
        assert!(Settings::write_example(&path).is_err());
    }
}
