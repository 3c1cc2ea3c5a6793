//! Analysis runner that orchestrates detection, extraction and persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::analysis::{extract, frontend_for_path, AnalysisContext, SignatureResolver, SyntaxTree};
use crate::config::Settings;
use crate::files::{relative_path_string, SourceCollector};
use crate::model::{Extraction, ServiceDescriptor};
use crate::services::ServiceDetector;
use crate::store::JsonStore;

/// Per-service counts for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub service_name: String,
    pub root_path: PathBuf,
    pub files: usize,
    pub skipped_files: usize,
    pub types: usize,
    pub executables: usize,
}

/// Result of one completed run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub app_name: String,
    pub services: Vec<ServiceSummary>,
    pub extraction: Extraction,
}

impl AnalysisReport {
    pub fn total_files(&self) -> usize {
        self.services.iter().map(|s| s.files).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.services.iter().map(|s| s.skipped_files).sum()
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Output for the application already existed; nothing was done.
    AlreadyAnalyzed,
    Completed(AnalysisReport),
}

/// Executes analysis runs against repositories.
pub struct Runner {
    settings: Settings,
    store: JsonStore,
    signatures: Option<Arc<dyn SignatureResolver>>,
}

impl Runner {
    /// Create a new analysis runner.
    pub fn new(settings: Settings, store: JsonStore) -> Self {
        Self {
            settings,
            store,
            signatures: None,
        }
    }

    /// Use a semantic signature resolver for executable names.
    pub fn with_signature_resolver(mut self, resolver: Arc<dyn SignatureResolver>) -> Self {
        self.signatures = Some(resolver);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Analyze a repository and persist the result.
    ///
    /// Skips the run when output for `app_name` already exists. A failure to
    /// persist is returned as an error.
    pub fn analyze(
        &self,
        repo_root: &Path,
        app_name: &str,
        include_tests: bool,
        distributed: bool,
    ) -> anyhow::Result<AnalysisOutcome> {
        if self.store.exists(app_name) {
            info!(
                app = %app_name,
                dir = %self.store.app_dir(app_name).display(),
                "already analyzed, skipping"
            );
            return Ok(AnalysisOutcome::AlreadyAnalyzed);
        }

        let report = self.extract(repo_root, app_name, include_tests, distributed)?;
        self.store
            .save(app_name, &report.extraction.types, &report.extraction.executables)?;
        Ok(AnalysisOutcome::Completed(report))
    }

    /// Extract entities without touching the store.
    pub fn extract(
        &self,
        repo_root: &Path,
        app_name: &str,
        include_tests: bool,
        distributed: bool,
    ) -> anyhow::Result<AnalysisReport> {
        let _span = info_span!("analyze", app = %app_name).entered();

        let services = if distributed {
            ServiceDetector::new(&self.settings)?.descriptors(repo_root, app_name)?
        } else {
            vec![ServiceDescriptor::new("", repo_root)]
        };
        let mode = if distributed { "distributed" } else { "monolithic" };
        info!(services = services.len(), mode, "starting analysis");

        let mut report = AnalysisReport {
            app_name: app_name.to_string(),
            services: Vec::with_capacity(services.len()),
            extraction: Extraction::new(),
        };
        for service in &services {
            let (summary, extraction) = self.analyze_service(repo_root, service, include_tests)?;
            report.services.push(summary);
            report.extraction.merge(extraction);
        }

        info!(
            types = report.extraction.types.len(),
            executables = report.extraction.executables.len(),
            "analysis finished"
        );
        Ok(report)
    }

    /// Extract every source file of one service.
    ///
    /// Results are ordered by repository-relative file path whether or not
    /// extraction ran in parallel.
    pub fn analyze_service(
        &self,
        repo_root: &Path,
        service: &ServiceDescriptor,
        include_tests: bool,
    ) -> anyhow::Result<(ServiceSummary, Extraction)> {
        let _span = info_span!("service", name = %service.service_name).entered();

        let collector = SourceCollector::new(&self.settings, include_tests)?;
        let files = collector.collect(&service.root_path)?;
        debug!(files = files.len(), root = %service.root_path.display(), "collected sources");

        let (summary, extraction) = self.extract_files(repo_root, service, &files);
        info!(
            types = summary.types,
            executables = summary.executables,
            skipped = summary.skipped_files,
            "service analyzed"
        );
        Ok((summary, extraction))
    }

    /// Extract the given files of one service.
    ///
    /// A file that cannot be read or parsed is logged, counted as skipped and
    /// does not stop the others.
    pub fn extract_files(
        &self,
        repo_root: &Path,
        service: &ServiceDescriptor,
        files: &[PathBuf],
    ) -> (ServiceSummary, Extraction) {
        let extract_one = |path: &PathBuf| match self.extract_file(repo_root, service, path) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping file");
                None
            }
        };
        let mut results: Vec<(String, Extraction)> = if self.settings.parallel {
            files.par_iter().filter_map(extract_one).collect()
        } else {
            files.iter().filter_map(extract_one).collect()
        };
        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut extraction = Extraction::new();
        let extracted = results.len();
        for (_, file_extraction) in results {
            extraction.merge(file_extraction);
        }

        let summary = ServiceSummary {
            service_name: service.service_name.clone(),
            root_path: service.root_path.clone(),
            files: extracted,
            skipped_files: files.len() - extracted,
            types: extraction.types.len(),
            executables: extraction.executables.len(),
        };
        (summary, extraction)
    }

    /// Parse, lower and extract a single file.
    ///
    /// Returns the repository-relative path with the file's entities.
    pub fn extract_file(
        &self,
        repo_root: &Path,
        service: &ServiceDescriptor,
        path: &Path,
    ) -> anyhow::Result<(String, Extraction)> {
        let file_path = relative_path_string(repo_root, path);
        let _span = info_span!("file", path = %file_path).entered();

        let frontend = frontend_for_path(path)
            .ok_or_else(|| anyhow::anyhow!("no front end for {}", path.display()))?;
        let source = std::fs::read(path)?;
        let parsed = frontend.parse(path, &source)?;
        let tree = SyntaxTree::lower(&parsed, frontend);
        if tree.has_errors() {
            debug!(language = frontend.language_id(), "syntax errors, extracting what parsed");
        }

        let service_relative = path.strip_prefix(&service.root_path).unwrap_or(path);
        let ctx = AnalysisContext::for_tree(
            &tree,
            service_relative,
            file_path.clone(),
            service.service_name.clone(),
            self.settings.depth_policy(),
        );
        let extraction = extract(&tree, ctx, self.signatures.as_deref());
        Ok((file_path, extraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_monolithic_uses_unnamed_service() {
        let repo = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(repo.path(), "app/main.py", "def main():\n    pass\n");

        let runner = Runner::new(Settings::default(), JsonStore::new(out.path()));
        let report = runner.extract(repo.path(), "demo", false, false).unwrap();

        assert_eq!(report.services.len(), 1);
        assert_eq!(report.services[0].service_name, "");
        assert_eq!(report.extraction.executables[0].service_name, "");
        assert_eq!(report.extraction.executables[0].full_name, "app/main$main()");
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let repo = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        for i in 0..12 {
            write(
                repo.path(),
                &format!("src/m{i:02}.js"),
                &format!("function f{i}() {{ return () => {i}; }}\n"),
            );
        }

        let parallel = Runner::new(Settings::default(), JsonStore::new(out.path()));
        let sequential = Runner::new(
            Settings {
                parallel: false,
                ..Settings::default()
            },
            JsonStore::new(out.path()),
        );

        let a = parallel.extract(repo.path(), "demo", false, false).unwrap();
        let b = sequential.extract(repo.path(), "demo", false, false).unwrap();
        assert_eq!(a.extraction, b.extraction);
        assert_eq!(a.extraction.executables.len(), 24);
        assert_eq!(a.extraction.executables[0].full_name, "src/m00$f0()");
    }

    #[test]
    fn test_syntax_errors_still_extracted() {
        let repo = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(repo.path(), "lib/broken.rb", "class Broken\n  def x(\nend\n");
        write(repo.path(), "lib/ok.rb", "class Ok\nend\n");

        let runner = Runner::new(Settings::default(), JsonStore::new(out.path()));
        let report = runner.extract(repo.path(), "demo", false, false).unwrap();
        assert!(report.extraction.types.iter().any(|t| t.simple_name == "Ok"));
        assert_eq!(report.total_files(), 2);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        crate::init();
        let repo = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(repo.path(), "pkg/a.py", "def a():\n    pass\n");
        write(repo.path(), "pkg/c.py", "class C:\n    pass\n");

        let runner = Runner::new(Settings::default(), JsonStore::new(out.path()));
        let service = ServiceDescriptor::new("pkg", repo.path().join("pkg"));
        let files = vec![
            repo.path().join("pkg/a.py"),
            repo.path().join("pkg/b.py"),
            repo.path().join("pkg/c.py"),
        ];
        let (summary, extraction) = runner.extract_files(repo.path(), &service, &files);

        assert_eq!(summary.files, 2);
        assert_eq!(summary.skipped_files, 1);
        assert_eq!(extraction.executables[0].full_name, "a$a()");
        assert_eq!(extraction.types[0].full_name, "c$C");
    }

    #[test]
    fn test_analyze_persists_and_then_skips() {
        let repo = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write(repo.path(), "Main.java", "class Main { void run() {} }");

        let runner = Runner::new(Settings::default(), JsonStore::new(out.path()));
        let first = runner.analyze(repo.path(), "demo", false, true).unwrap();
        assert!(matches!(first, AnalysisOutcome::Completed(_)));
        assert_eq!(runner.store().load_types("demo").unwrap().len(), 1);

        let second = runner.analyze(repo.path(), "demo", false, true).unwrap();
        assert!(matches!(second, AnalysisOutcome::AlreadyAnalyzed));
    }
}
