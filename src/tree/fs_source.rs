//! Filesystem-backed document source
//!
//! Maps a base directory to a document tree: subdirectories become
//! containers, files with an eligible extension become leaves. Hidden
//! entries (dot-prefixed) are skipped. Node paths are relative to the base
//! directory, `/`-separated, so the aggregate map reads the same on every
//! platform.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::{ContainerNode, DocNode, DocSource, LeafNode};

pub struct FsSource {
    base: PathBuf,
    extensions: Vec<String>,
}

impl FsSource {
    /// Create a source rooted at `base`, admitting files whose extension is
    /// in `extensions` (lowercase, without the dot). An empty list admits
    /// every file.
    pub fn new(base: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            base: base.into(),
            extensions,
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        if path.is_empty() || path == "." {
            self.base.clone()
        } else {
            self.base.join(path)
        }
    }

    fn is_eligible_file(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        self.extensions.contains(&ext)
    }

    fn node_for(&self, tree_path: String, full: &Path) -> Option<DocNode> {
        let meta = match fs::metadata(full) {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Cannot stat {}: {}", full.display(), e);
                return None;
            }
        };

        if meta.is_dir() {
            return Some(DocNode::Container(ContainerNode { path: tree_path }));
        }
        if !meta.is_file() || !self.is_eligible_file(full) {
            return None;
        }

        // Creation time is not available on every filesystem; 0 marks it
        // unknown and the aggregation's min-non-zero rule ignores it.
        let created_ms = meta.created().map(system_time_ms).unwrap_or(0);
        let modified_ms = meta.modified().map(system_time_ms).unwrap_or(0);

        Some(DocNode::Leaf(LeafNode {
            path: tree_path,
            created_ms,
            modified_ms,
        }))
    }
}

fn system_time_ms(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl DocSource for FsSource {
    fn resolve(&self, path: &str) -> Option<DocNode> {
        self.node_for(path.to_string(), &self.full_path(path))
    }

    fn children(&self, container: &ContainerNode) -> Vec<DocNode> {
        let full = self.full_path(&container.path);
        let entries = match fs::read_dir(&full) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {}: {}", full.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| !is_hidden(name))
            .collect();
        names.sort();

        names
            .into_iter()
            .filter_map(|name| {
                let tree_path = if container.path.is_empty() || container.path == "." {
                    name.clone()
                } else {
                    format!("{}/{}", container.path, name)
                };
                self.node_for(tree_path, &full.join(&name))
            })
            .collect()
    }

    fn read(&self, leaf: &LeafNode) -> io::Result<String> {
        fs::read_to_string(self.full_path(&leaf.path))
    }
}
