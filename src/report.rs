//! Output formatting for analysis runs.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::runner::{AnalysisOutcome, AnalysisReport};

/// Status string for a run that produced output.
pub const STATUS_COMPLETED: &str = "completed";
/// Status string for a run skipped because output existed.
pub const STATUS_ALREADY_ANALYZED: &str = "already_analyzed";

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub version: String,
    pub application: String,
    pub source: String,
    pub output: String,
    pub status: String,
    pub files_analyzed: usize,
    pub files_skipped: usize,
    pub types: usize,
    pub executables: usize,
    pub services: Vec<JsonService>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonService {
    pub service_name: String,
    pub root_path: String,
    pub files: usize,
    pub types: usize,
    pub executables: usize,
}

/// Build the JSON summary of a run.
pub fn build_json_report(
    app_name: &str,
    source: &Path,
    output_dir: &Path,
    outcome: &AnalysisOutcome,
) -> JsonReport {
    let mut report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        application: app_name.to_string(),
        source: source.display().to_string(),
        output: output_dir.display().to_string(),
        status: STATUS_ALREADY_ANALYZED.to_string(),
        files_analyzed: 0,
        files_skipped: 0,
        types: 0,
        executables: 0,
        services: Vec::new(),
    };

    if let AnalysisOutcome::Completed(run) = outcome {
        report.status = STATUS_COMPLETED.to_string();
        report.files_analyzed = run.total_files();
        report.files_skipped = run.total_skipped();
        report.types = run.extraction.types.len();
        report.executables = run.extraction.executables.len();
        report.services = run
            .services
            .iter()
            .map(|s| JsonService {
                service_name: s.service_name.clone(),
                root_path: s.root_path.display().to_string(),
                files: s.files,
                types: s.types,
                executables: s.executables,
            })
            .collect();
    }

    report
}

/// Write run results in JSON format.
pub fn write_json(
    app_name: &str,
    source: &Path,
    output_dir: &Path,
    outcome: &AnalysisOutcome,
) -> anyhow::Result<()> {
    let report = build_json_report(app_name, source, output_dir, outcome);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write run results in colored terminal format.
pub fn write_pretty(app_name: &str, source: &Path, output_dir: &Path, outcome: &AnalysisOutcome) {
    // Header
    println!();
    print!("  ");
    print!("{}", "microanalyzer".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Application: ".dimmed());
    println!("{}", app_name);
    print!("  {}", "Source:      ".dimmed());
    println!("{}", source.display());
    print!("  {}", "Output:      ".dimmed());
    println!("{}", output_dir.display());
    println!();

    match outcome {
        AnalysisOutcome::AlreadyAnalyzed => {
            println!(
                "  {}  output already exists, nothing to do",
                "• SKIPPED".yellow()
            );
        }
        AnalysisOutcome::Completed(run) => {
            write_services_table(run);
            println!();
            write_totals(run);
        }
    }
    println!();
}

fn write_services_table(run: &AnalysisReport) {
    println!("  {}", "Services".bold());
    let width = run
        .services
        .iter()
        .map(|s| display_service_name(&s.service_name).len())
        .max()
        .unwrap_or(0);

    for service in &run.services {
        let name = display_service_name(&service.service_name);
        print!("    {:<width$}", name, width = width);
        print!(
            "  {} files  {} types  {} executables",
            service.files.to_string().bold(),
            service.types.to_string().bold(),
            service.executables.to_string().bold()
        );
        if service.skipped_files > 0 {
            print!(
                "  {}",
                format!("({} skipped)", service.skipped_files).dimmed()
            );
        }
        println!();
    }
}

fn write_totals(run: &AnalysisReport) {
    print!("  {}", "✓ DONE".green());
    print!(
        "  {} types, {} executables from {} files",
        run.extraction.types.len(),
        run.extraction.executables.len(),
        run.total_files()
    );
    if run.total_skipped() > 0 {
        print!(
            "  {}",
            format!("({} skipped)", run.total_skipped()).yellow()
        );
    }
    println!();
}

fn display_service_name(name: &str) -> String {
    if name.is_empty() {
        "(monolith)".to_string()
    } else {
        name.to_string()
    }
}

// =============================================================================
// Service listing
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonServiceRoot {
    pub service_name: String,
    pub root_path: String,
}

/// Print detected service roots, as a table or as JSON.
pub fn write_services(services: &BTreeMap<String, PathBuf>, json: bool) -> anyhow::Result<()> {
    if json {
        let roots: Vec<JsonServiceRoot> = services
            .iter()
            .map(|(name, root)| JsonServiceRoot {
                service_name: name.clone(),
                root_path: root.display().to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&roots)?);
        return Ok(());
    }

    let width = services.keys().map(|k| k.len()).max().unwrap_or(0);
    for (name, root) in services {
        println!("  {:<width$}  {}", name.cyan(), root.display(), width = width);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Extraction;
    use crate::runner::ServiceSummary;

    #[test]
    fn test_json_report_completed() {
        let run = AnalysisReport {
            app_name: "shop".to_string(),
            services: vec![ServiceSummary {
                service_name: "orders".to_string(),
                root_path: PathBuf::from("/repo/orders"),
                files: 3,
                skipped_files: 1,
                types: 2,
                executables: 5,
            }],
            extraction: Extraction::new(),
        };
        let outcome = AnalysisOutcome::Completed(run);
        let report = build_json_report("shop", Path::new("/repo"), Path::new("./data"), &outcome);

        assert_eq!(report.status, STATUS_COMPLETED);
        assert_eq!(report.files_analyzed, 3);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.services[0].service_name, "orders");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filesAnalyzed"], 3);
        assert_eq!(json["services"][0]["rootPath"], "/repo/orders");
    }

    #[test]
    fn test_json_report_already_analyzed() {
        let report = build_json_report(
            "shop",
            Path::new("/repo"),
            Path::new("./data"),
            &AnalysisOutcome::AlreadyAnalyzed,
        );
        assert_eq!(report.status, STATUS_ALREADY_ANALYZED);
        assert!(report.services.is_empty());
    }

    #[test]
    fn test_display_service_name() {
        assert_eq!(display_service_name(""), "(monolith)");
        assert_eq!(display_service_name("orders"), "orders");
    }
}
