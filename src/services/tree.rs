//! Directory tree of source-bearing directories.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::markers::{MarkerKind, MarkerMatcher};
use crate::analysis::frontend_for_path;
use crate::config::Settings;
use crate::files::walk;

/// One directory of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the root; empty for the root itself.
    pub path: PathBuf,
    pub depth: usize,
    /// Source files in this directory and below.
    pub sources: usize,
    pub marker: Option<MarkerKind>,
}

#[derive(Debug, Clone)]
pub struct DirectoryTree {
    root_name: String,
    entries: Vec<TreeEntry>,
}

impl DirectoryTree {
    /// Walk `root` and count analyzable sources per directory.
    pub fn build(root: &Path, settings: &Settings) -> anyhow::Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("not a directory: {}", root.display());
        }
        let markers = MarkerMatcher::new(&settings.markers)?;

        let mut entries: Vec<TreeEntry> = Vec::new();
        let mut index: HashMap<PathBuf, usize> = HashMap::new();

        for entry in walk(root, &settings.excluded_dirs) {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf();
            if entry.file_type().is_dir() {
                index.insert(relative.clone(), entries.len());
                entries.push(TreeEntry {
                    path: relative,
                    depth: entry.depth(),
                    sources: 0,
                    marker: None,
                });
                continue;
            }

            let parent = relative.parent().map(Path::to_path_buf).unwrap_or_default();
            if let Some(kind) = markers.classify(&entry.file_name().to_string_lossy()) {
                if let Some(&i) = index.get(&parent) {
                    let current = entries[i].marker;
                    entries[i].marker = Some(current.map_or(kind, |c| c.min(kind)));
                }
            }
            if frontend_for_path(entry.path()).is_some() {
                let mut dir = Some(parent.as_path());
                while let Some(d) = dir {
                    if let Some(&i) = index.get(d) {
                        entries[i].sources += 1;
                    }
                    dir = d.parent();
                }
            }
        }

        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());

        Ok(Self { root_name, entries })
    }

    /// Directories holding sources or a marker, in walk order.
    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries
            .iter()
            .filter(|e| e.sources > 0 || e.marker.is_some())
    }

    /// Indented text rendering, one directory per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.entries() {
            let name = if entry.depth == 0 {
                self.root_name.clone()
            } else {
                entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            };
            let _ = write!(out, "{}{}/", "  ".repeat(entry.depth), name);
            if let Some(kind) = entry.marker {
                let _ = write!(out, " [{}]", kind);
            }
            let _ = writeln!(out, " ({} sources)", entry.sources);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_counts_and_markers() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "orders/go.mod");
        touch(root, "orders/api/handler.go");
        touch(root, "orders/api/routes.go");
        touch(root, "docs/guide.md");
        touch(root, "web/app.js");

        let tree = DirectoryTree::build(root, &Settings::default()).unwrap();
        let entries: Vec<_> = tree.entries().collect();
        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::new(),
                PathBuf::from("orders"),
                PathBuf::from("orders/api"),
                PathBuf::from("web"),
            ]
        );
        assert_eq!(entries[0].sources, 3);
        assert_eq!(entries[1].marker, Some(MarkerKind::Project));
        assert_eq!(entries[2].sources, 2);

        let rendered = tree.render();
        assert!(rendered.contains("  orders/ [project] (2 sources)"));
        assert!(rendered.contains("    api/ (2 sources)"));
        assert!(!rendered.contains("docs"));
    }
}
