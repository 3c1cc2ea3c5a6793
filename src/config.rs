//! Settings schema for microanalyzer.
//!
//! Settings are read from an optional YAML file. Every field has a default,
//! so an empty or missing file yields the stock behavior.

use globset::Glob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::DepthPolicy;

/// File names probed in the repository root, in order.
pub const SETTINGS_FILE_NAMES: &[&str] = &["microanalyzer.yaml", ".microanalyzer.yaml"];

/// Top-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Maximum enclosing types for an emitted type (default: 0)
    #[serde(default)]
    pub max_class_depth: usize,
    /// Maximum enclosing types plus executables for an emitted executable (default: 1)
    #[serde(default = "default_max_method_depth")]
    pub max_method_depth: usize,
    /// Whether to include test files in analysis (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Extract files of a service in parallel (default: true)
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Directory names pruned from every walk.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
    #[serde(default)]
    pub markers: MarkerSettings,
    /// Glob patterns identifying test files.
    #[serde(default = "default_test_file_patterns")]
    pub test_file_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_class_depth: 0,
            max_method_depth: default_max_method_depth(),
            include_test_files: None,
            parallel: true,
            excluded_dirs: default_excluded_dirs(),
            markers: MarkerSettings::default(),
            test_file_patterns: default_test_file_patterns(),
        }
    }
}

impl Settings {
    /// Parse settings from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Locate a settings file in `repo_root`.
    pub fn find_in(repo_root: &Path) -> Option<PathBuf> {
        SETTINGS_FILE_NAMES
            .iter()
            .map(|name| repo_root.join(name))
            .find(|path| path.is_file())
    }

    /// Load the explicit file if given, else the discovered one, else defaults.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_in(repo_root),
        };
        match path {
            Some(path) => Self::parse_file(&path).map_err(|e| {
                anyhow::anyhow!("failed to load settings {}: {}", path.display(), e)
            }),
            None => Ok(Self::default()),
        }
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    pub fn depth_policy(&self) -> DepthPolicy {
        DepthPolicy {
            max_class_depth: self.max_class_depth,
            max_method_depth: self.max_method_depth,
        }
    }
}

/// Marker file globs, matched against file names.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkerSettings {
    /// Markers grouping several projects (default: `*.sln`).
    #[serde(default = "default_solution_markers")]
    pub solution: Vec<String>,
    /// Markers of one buildable unit.
    #[serde(default = "default_project_markers")]
    pub project: Vec<String>,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            solution: default_solution_markers(),
            project: default_project_markers(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_method_depth() -> usize {
    1
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_excluded_dirs() -> Vec<String> {
    to_strings(&[
        "node_modules",
        ".git",
        "dist",
        "build",
        "bin",
        "obj",
        "target",
        "vendor",
        "__pycache__",
        ".venv",
        "venv",
    ])
}

fn default_solution_markers() -> Vec<String> {
    to_strings(&["*.sln"])
}

fn default_project_markers() -> Vec<String> {
    to_strings(&[
        "*.csproj",
        "*.fsproj",
        "*.vbproj",
        "pom.xml",
        "build.gradle",
        "build.gradle.kts",
        "package.json",
        "go.mod",
        "pyproject.toml",
        "setup.py",
        "Gemfile",
    ])
}

fn default_test_file_patterns() -> Vec<String> {
    to_strings(&[
        "**/test/**",
        "**/tests/**",
        "**/__tests__/**",
        "**/spec/**",
        "**/*_test.go",
        "**/*Test.java",
        "**/*Tests.java",
        "**/*Test.cs",
        "**/*Tests.cs",
        "**/test_*.py",
        "**/*_test.py",
        "**/*.test.js",
        "**/*.spec.js",
        "**/*.test.ts",
        "**/*.spec.ts",
        "**/*_spec.rb",
        "**/*_test.rb",
    ])
}

/// Validate settings for internal consistency.
pub fn validate(settings: &Settings) -> anyhow::Result<()> {
    let globs = settings
        .markers
        .solution
        .iter()
        .chain(&settings.markers.project)
        .chain(&settings.test_file_patterns);
    for pattern in globs {
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob {:?}: {}", pattern, e))?;
    }

    if settings.excluded_dirs.iter().any(|d| d.contains('/') || d.contains('\\')) {
        anyhow::bail!("excluded_dirs must be plain directory names, not paths");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.depth_policy(), DepthPolicy::default());
        assert!(settings.parallel);
        assert!(!settings.should_include_test_files());
        assert!(settings.excluded_dirs.iter().any(|d| d == "node_modules"));
        assert_eq!(settings.markers.solution, vec!["*.sln"]);
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::parse_str("max_method_depth: 3\nparallel: false\n").unwrap();
        assert_eq!(settings.max_class_depth, 0);
        assert_eq!(settings.max_method_depth, 3);
        assert!(!settings.parallel);
        assert!(settings.markers.project.iter().any(|m| m == "go.mod"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let settings = Settings::parse_str("  \n").unwrap();
        assert_eq!(settings.max_method_depth, 1);
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "include_test_files: true").unwrap();
        writeln!(file, "markers:").unwrap();
        writeln!(file, "  project: [\"*.csproj\"]").unwrap();

        let settings = Settings::parse_file(file.path()).unwrap();
        assert!(settings.should_include_test_files());
        assert_eq!(settings.markers.project, vec!["*.csproj"]);
        assert_eq!(settings.markers.solution, vec!["*.sln"]);
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut settings = Settings::default();
        settings.test_file_patterns.push("**/[unclosed".to_string());
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_validate_rejects_path_exclusion() {
        let mut settings = Settings::default();
        settings.excluded_dirs.push("src/generated".to_string());
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_find_in() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::find_in(dir.path()).is_none());
        std::fs::write(dir.path().join(".microanalyzer.yaml"), "parallel: false").unwrap();
        let found = Settings::find_in(dir.path()).unwrap();
        assert!(found.ends_with(".microanalyzer.yaml"));
        let settings = Settings::load(None, dir.path()).unwrap();
        assert!(!settings.parallel);
    }
}
