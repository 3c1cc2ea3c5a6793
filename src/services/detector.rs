//! Service boundary detection.
//!
//! Service roots are found purely from the location of marker files. The
//! marker kind in use picks the nesting mode:
//! - project mode keeps the outermost root of each nested group
//! - solution mode keeps the innermost one

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use super::markers::{MarkerKind, MarkerMatcher};
use crate::config::Settings;
use crate::files::walk;
use crate::model::ServiceDescriptor;

/// Separator joining path components into a service name.
pub const SERVICE_NAME_DELIMITER: &str = "-";

/// Minimum number of marker directories for a split into services.
const MIN_SERVICES: usize = 2;

/// Directories holding each kind of marker.
#[derive(Debug, Clone, Default)]
pub struct MarkerScan {
    pub solution: BTreeSet<PathBuf>,
    pub project: BTreeSet<PathBuf>,
}

/// Partitions a repository into service roots.
pub struct ServiceDetector {
    markers: MarkerMatcher,
    excluded_dirs: Vec<String>,
}

impl ServiceDetector {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            markers: MarkerMatcher::new(&settings.markers)?,
            excluded_dirs: settings.excluded_dirs.clone(),
        })
    }

    /// Find every directory containing a marker file.
    pub fn scan(&self, repo_root: &Path) -> MarkerScan {
        let mut scan = MarkerScan::default();
        for entry in walk(repo_root, &self.excluded_dirs) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            let Some(kind) = self.markers.classify(&name) else {
                continue;
            };
            let Some(dir) = entry.path().parent() else {
                continue;
            };
            let dir = dir.to_path_buf();
            match kind {
                MarkerKind::Solution => scan.solution.insert(dir),
                MarkerKind::Project => scan.project.insert(dir),
            };
        }
        scan
    }

    /// Map service name to root path.
    ///
    /// Falls back to a single `{app_name: repo_root}` service when fewer than
    /// two marker directories of either kind exist.
    pub fn detect(&self, repo_root: &Path, app_name: &str) -> anyhow::Result<BTreeMap<String, PathBuf>> {
        let _span = info_span!("detect_services", app = %app_name).entered();
        if !repo_root.is_dir() {
            anyhow::bail!("not a directory: {}", repo_root.display());
        }

        let scan = self.scan(repo_root);
        let (mode, dirs) = if scan.solution.len() >= MIN_SERVICES {
            (MarkerKind::Solution, scan.solution)
        } else if scan.project.len() >= MIN_SERVICES {
            (MarkerKind::Project, scan.project)
        } else {
            info!("fewer than two marker directories, analyzing as one service");
            let mut single = BTreeMap::new();
            single.insert(app_name.to_string(), repo_root.to_path_buf());
            return Ok(single);
        };
        debug!(mode = %mode, candidates = dirs.len(), "selected nesting mode");

        let mut services = BTreeMap::new();
        for root in exclude_nested(dirs.into_iter().collect(), mode) {
            let name = service_name(repo_root, &root, app_name);
            debug!(service = %name, root = %root.display(), "accepted service root");
            if let Some(previous) = services.insert(name.clone(), root) {
                warn!(
                    service = %name,
                    replaced = %previous.display(),
                    "service name collision, keeping the last root"
                );
            }
        }

        info!(services = services.len(), "detected services");
        Ok(services)
    }

    /// Detected services as descriptors, ordered by name.
    pub fn descriptors(&self, repo_root: &Path, app_name: &str) -> anyhow::Result<Vec<ServiceDescriptor>> {
        Ok(self
            .detect(repo_root, app_name)?
            .into_iter()
            .map(|(name, root)| ServiceDescriptor::new(name, root))
            .collect())
    }
}

/// Drop nested candidate roots in a single sorted pass.
///
/// Paths sort component-wise so a directory is always followed by its
/// descendants. Solution mode walks the reversed order.
pub fn exclude_nested(mut dirs: Vec<PathBuf>, mode: MarkerKind) -> Vec<PathBuf> {
    dirs.sort();
    if mode == MarkerKind::Solution {
        dirs.reverse();
    }

    let mut accepted: Vec<PathBuf> = Vec::new();
    for current in dirs {
        let keep = match (accepted.last(), mode) {
            (None, _) => true,
            (Some(last), MarkerKind::Project) => !current.starts_with(last),
            (Some(last), MarkerKind::Solution) => !last.starts_with(&current),
        };
        if keep {
            accepted.push(current);
        }
    }
    accepted
}

/// Components of `dir` below `repo_root` joined by `-`, or `app_name` for the root itself.
pub fn service_name(repo_root: &Path, dir: &Path, app_name: &str) -> String {
    let relative = dir.strip_prefix(repo_root).unwrap_or(dir);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        app_name.to_string()
    } else {
        parts.join(SERVICE_NAME_DELIMITER)
    }
}
