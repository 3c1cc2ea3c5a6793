//! Source file enumeration.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::analysis::frontend_for_path;
use crate::config::Settings;

/// Walk `root`, pruning excluded and hidden directories.
///
/// Entries come back sorted by file name within each directory. Unreadable
/// entries are logged and skipped.
pub fn walk<'a>(root: &Path, excluded_dirs: &'a [String]) -> impl Iterator<Item = DirEntry> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| !is_pruned(e, excluded_dirs))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
}

fn is_pruned(entry: &DirEntry, excluded_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || excluded_dirs.iter().any(|d| d.as_str() == name.as_ref())
}

/// Collects analyzable source files below a root.
pub struct SourceCollector {
    excluded_dirs: Vec<String>,
    test_files: GlobSet,
    include_tests: bool,
}

impl SourceCollector {
    pub fn new(settings: &Settings, include_tests: bool) -> anyhow::Result<Self> {
        Ok(Self {
            excluded_dirs: settings.excluded_dirs.clone(),
            test_files: build_globset(&settings.test_file_patterns)?,
            include_tests,
        })
    }

    /// Source files under `root` with a registered front end, in walk order.
    pub fn collect(&self, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            anyhow::bail!("not a directory: {}", root.display());
        }

        let mut files = Vec::new();
        for entry in walk(root, &self.excluded_dirs) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if frontend_for_path(path).is_none() {
                continue;
            }
            // Skip test files unless explicitly included
            if !self.include_tests {
                let relative = path.strip_prefix(root).unwrap_or(path);
                if self.is_test_file(relative) {
                    continue;
                }
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Whether a path (relative to the walk root) looks like a test.
    pub fn is_test_file(&self, relative: &Path) -> bool {
        self.test_files.is_match(relative)
    }
}

/// Compile glob patterns into a set.
pub fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid glob {:?}: {}", pattern, e))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Repository-relative path with `/` separators.
pub fn relative_path_string(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
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

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files.iter().map(|f| relative_path_string(root, f)).collect()
    }

    #[test]
    fn test_collect_prunes_and_filters() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "src/b.js");
        touch(root, "src/a.ts");
        touch(root, "src/readme.md");
        touch(root, "node_modules/lib/index.js");
        touch(root, ".git/hooks/pre-commit.py");
        touch(root, "src/cart.test.js");
        touch(root, "test/helpers.py");

        let collector = SourceCollector::new(&Settings::default(), false).unwrap();
        let files = collector.collect(root).unwrap();
        assert_eq!(names(root, &files), vec!["src/a.ts", "src/b.js"]);
    }

    #[test]
    fn test_collect_includes_tests_when_asked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "pkg/server.go");
        touch(root, "pkg/server_test.go");

        let collector = SourceCollector::new(&Settings::default(), true).unwrap();
        let files = collector.collect(root).unwrap();
        assert_eq!(names(root, &files), vec!["pkg/server.go", "pkg/server_test.go"]);
    }

    #[test]
    fn test_is_test_file() {
        let collector = SourceCollector::new(&Settings::default(), false).unwrap();
        assert!(collector.is_test_file(Path::new("src/test/java/CartTest.java")));
        assert!(collector.is_test_file(Path::new("CartTests.cs")));
        assert!(collector.is_test_file(Path::new("spec/models/user_spec.rb")));
        assert!(!collector.is_test_file(Path::new("src/main/java/Cart.java")));
    }

    #[test]
    fn test_collect_rejects_missing_root() {
        let collector = SourceCollector::new(&Settings::default(), false).unwrap();
        assert!(collector.collect(Path::new("/definitely/not/here")).is_err());
    }
}
