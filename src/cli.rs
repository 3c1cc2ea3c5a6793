//! Command-line interface for microanalyzer.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::config::{self, Settings};
use crate::logging::{self, LogLevel};
use crate::report;
use crate::runner::{AnalysisOutcome, Runner};
use crate::services::{DirectoryTree, ServiceDetector};
use crate::store::JsonStore;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ALREADY_ANALYZED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default output root for analysis results.
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Extract types and executables from multi-language repositories.
///
/// Microanalyzer splits a repository into services using build marker files,
/// parses every supported source file and writes the qualified declarations
/// it finds as JSON.
#[derive(Parser)]
#[command(name = "microanalyzer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository and write typeData.json and methodData.json
    Analyze(AnalyzeArgs),
    /// Print the service roots that would be analyzed
    Services(ServicesArgs),
    /// Print source directories, marking those that carry marker files
    Tree(TreeArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Repository to analyze
    #[arg(short, long)]
    pub path: PathBuf,

    /// Output root; results land in <output>/<application>/
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Include test files
    #[arg(short, long)]
    pub test: bool,

    /// Treat the whole repository as a single unnamed service
    #[arg(short, long)]
    pub monolithic: bool,

    /// Log verbosity
    #[arg(short, long, value_enum, default_value_t = LogLevel::Default)]
    pub logging: LogLevel,

    /// Path to settings YAML file (default: auto-discover in the repository)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Application name (default: last component of the repository path)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for the services command.
#[derive(Parser)]
pub struct ServicesArgs {
    /// Repository to inspect
    pub path: PathBuf,

    /// Application name used for a service rooted at the repository itself
    #[arg(short, long)]
    pub name: Option<String>,

    /// Path to settings YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the tree command.
#[derive(Parser)]
pub struct TreeArgs {
    /// Repository to inspect
    pub path: PathBuf,

    /// Path to settings YAML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Canonical repository path plus the settings that apply to it.
struct Workspace {
    root: PathBuf,
    app_name: String,
    settings: Settings,
}

/// Resolve the path, derive the application name and load settings.
///
/// Prints the problem and returns `None` when any step fails.
fn open_workspace(path: &Path, name: Option<&str>, config_path: Option<&Path>) -> Option<Workspace> {
    let root = match path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", path, e);
            return None;
        }
    };
    if !root.is_dir() {
        eprintln!("Error: not a directory: {}", root.display());
        return None;
    }

    let app_name = match name {
        Some(n) => n.to_string(),
        None => application_name(&root),
    };
    if app_name.is_empty() {
        eprintln!("Error: cannot derive an application name from {}", root.display());
        eprintln!("Pass one with --name");
        return None;
    }

    let settings = match Settings::load(config_path, &root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return None;
        }
    };
    if let Err(e) = config::validate(&settings) {
        eprintln!("Error: invalid settings: {}", e);
        return None;
    }

    Some(Workspace {
        root,
        app_name,
        settings,
    })
}

/// Last component of a path, used as the default application name.
pub fn application_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_format(format: &str) -> bool {
    if format != "pretty" && format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", format);
        return false;
    }
    true
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    crate::init();

    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let Some(workspace) = open_workspace(&args.path, args.name.as_deref(), args.config.as_deref())
    else {
        return Ok(EXIT_ERROR);
    };

    let store = JsonStore::new(&args.output);
    if let Err(e) = logging::init(args.logging, Some(&store.log_file(&workspace.app_name))) {
        // A subscriber may already be installed when driven from tests.
        debug!(error = %e, "logging not initialized");
    }

    let include_tests = args.test || workspace.settings.should_include_test_files();
    let runner = Runner::new(workspace.settings, store);
    let outcome = match runner.analyze(
        &workspace.root,
        &workspace.app_name,
        include_tests,
        !args.monolithic,
    ) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "analysis failed");
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match args.format.as_str() {
        "json" => {
            report::write_json(&workspace.app_name, &workspace.root, &args.output, &outcome)?;
        }
        _ => {
            report::write_pretty(&workspace.app_name, &workspace.root, &args.output, &outcome);
        }
    }

    match outcome {
        AnalysisOutcome::AlreadyAnalyzed => Ok(EXIT_ALREADY_ANALYZED),
        AnalysisOutcome::Completed(_) => Ok(EXIT_SUCCESS),
    }
}

/// Run the services command.
pub fn run_services(args: &ServicesArgs) -> anyhow::Result<i32> {
    crate::init();
    if let Err(e) = logging::init(LogLevel::Warning, None) {
        debug!(error = %e, "logging not initialized");
    }

    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let Some(workspace) = open_workspace(&args.path, args.name.as_deref(), args.config.as_deref())
    else {
        return Ok(EXIT_ERROR);
    };

    let detector = ServiceDetector::new(&workspace.settings)?;
    let services = detector.detect(&workspace.root, &workspace.app_name)?;
    report::write_services(&services, args.format == "json")?;
    Ok(EXIT_SUCCESS)
}

/// Run the tree command.
pub fn run_tree(args: &TreeArgs) -> anyhow::Result<i32> {
    crate::init();
    if let Err(e) = logging::init(LogLevel::Warning, None) {
        debug!(error = %e, "logging not initialized");
    }

    let Some(workspace) = open_workspace(&args.path, None, args.config.as_deref()) else {
        return Ok(EXIT_ERROR);
    };

    let tree = DirectoryTree::build(&workspace.root, &workspace.settings)?;
    print!("{}", tree.render());
    Ok(EXIT_SUCCESS)
}
