//! Marker file classification.

use globset::GlobSet;

use crate::config::MarkerSettings;
use crate::files::build_globset;

/// Kind of marker, which also selects the nesting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
    /// Groups several projects (`*.sln`).
    Solution,
    /// One buildable unit (`*.csproj`, `go.mod`, ...).
    Project,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Solution => "solution",
            MarkerKind::Project => "project",
        }
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matches file names against the configured marker globs.
pub struct MarkerMatcher {
    solution: GlobSet,
    project: GlobSet,
}

impl MarkerMatcher {
    pub fn new(settings: &MarkerSettings) -> anyhow::Result<Self> {
        Ok(Self {
            solution: build_globset(&settings.solution)?,
            project: build_globset(&settings.project)?,
        })
    }

    /// Classify a bare file name. Solution markers win over project markers.
    pub fn classify(&self, file_name: &str) -> Option<MarkerKind> {
        if self.solution.is_match(file_name) {
            Some(MarkerKind::Solution)
        } else if self.project.is_match(file_name) {
            Some(MarkerKind::Project)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults() {
        let matcher = MarkerMatcher::new(&MarkerSettings::default()).unwrap();
        assert_eq!(matcher.classify("Shop.sln"), Some(MarkerKind::Solution));
        assert_eq!(matcher.classify("Shop.Api.csproj"), Some(MarkerKind::Project));
        assert_eq!(matcher.classify("go.mod"), Some(MarkerKind::Project));
        assert_eq!(matcher.classify("package.json"), Some(MarkerKind::Project));
        assert_eq!(matcher.classify("README.md"), None);
    }
}
