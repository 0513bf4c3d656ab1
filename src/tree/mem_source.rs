//! In-memory document source
//!
//! Backs unit and integration tests with a tree that needs no filesystem:
//! deterministic timestamps, mutable contents, and injectable read failures.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::Mutex;

use super::{ContainerNode, DocNode, DocSource, LeafNode};

#[derive(Debug, Clone)]
struct FileEntry {
    content: String,
    created_ms: i64,
    modified_ms: i64,
}

#[derive(Debug, Default)]
struct Inner {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, FileEntry>,
    unreadable: BTreeSet<String>,
}

/// A fully in-memory [`DocSource`].
#[derive(Debug, Default)]
pub struct MemSource {
    inner: Mutex<Inner>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container at `path` (and all its ancestors).
    pub fn add_dir(&self, path: &str) {
        let mut inner = self.inner.lock().expect("source lock");
        add_ancestors(&mut inner.dirs, path);
        inner.dirs.insert(path.to_string());
    }

    /// Register a document with its content and timestamps. Parent
    /// containers are created implicitly.
    pub fn add_file(&self, path: &str, content: &str, created_ms: i64, modified_ms: i64) {
        let mut inner = self.inner.lock().expect("source lock");
        add_ancestors(&mut inner.dirs, path);
        inner.files.insert(
            path.to_string(),
            FileEntry {
                content: content.to_string(),
                created_ms,
                modified_ms,
            },
        );
    }

    /// Replace a document's content and bump its modification time.
    pub fn set_content(&self, path: &str, content: &str, modified_ms: i64) {
        let mut inner = self.inner.lock().expect("source lock");
        if let Some(entry) = inner.files.get_mut(path) {
            entry.content = content.to_string();
            entry.modified_ms = modified_ms;
        }
    }

    /// Make every future read of `path` fail.
    pub fn mark_unreadable(&self, path: &str) {
        let mut inner = self.inner.lock().expect("source lock");
        inner.unreadable.insert(path.to_string());
    }
}

fn add_ancestors(dirs: &mut BTreeSet<String>, path: &str) {
    let mut prefix = String::new();
    for part in path.split('/') {
        if !prefix.is_empty() {
            dirs.insert(prefix.clone());
            prefix.push('/');
        }
        prefix.push_str(part);
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

impl DocSource for MemSource {
    fn resolve(&self, path: &str) -> Option<DocNode> {
        let inner = self.inner.lock().expect("source lock");
        if inner.dirs.contains(path) {
            return Some(DocNode::Container(ContainerNode {
                path: path.to_string(),
            }));
        }
        inner.files.get(path).map(|entry| {
            DocNode::Leaf(LeafNode {
                path: path.to_string(),
                created_ms: entry.created_ms,
                modified_ms: entry.modified_ms,
            })
        })
    }

    fn children(&self, container: &ContainerNode) -> Vec<DocNode> {
        let inner = self.inner.lock().expect("source lock");
        let mut nodes: Vec<DocNode> = Vec::new();
        for dir in &inner.dirs {
            if parent_of(dir) == container.path && *dir != container.path {
                nodes.push(DocNode::Container(ContainerNode { path: dir.clone() }));
            }
        }
        for (path, entry) in &inner.files {
            if parent_of(path) == container.path {
                nodes.push(DocNode::Leaf(LeafNode {
                    path: path.clone(),
                    created_ms: entry.created_ms,
                    modified_ms: entry.modified_ms,
                }));
            }
        }
        nodes.sort_by(|a, b| a.path().cmp(b.path()));
        nodes
    }

    fn read(&self, leaf: &LeafNode) -> io::Result<String> {
        let inner = self.inner.lock().expect("source lock");
        if inner.unreadable.contains(&leaf.path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "unreadable document",
            ));
        }
        inner
            .files
            .get(&leaf.path)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such document"))
    }
}
