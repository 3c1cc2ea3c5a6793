//! Microanalyzer - static inventory of types and executables.
//!
//! Microanalyzer walks a repository, splits it into services by the build
//! marker files it finds, parses every supported source file with tree-sitter
//! and records each type and executable under a deterministic qualified name.
//!
//! # Architecture
//!
//! - `services`: Service boundary detection from marker files
//! - `files`: Source discovery with directory pruning and test filtering
//! - `analysis`: Language front ends, the lowered syntax tree and the extractor
//! - `runner`: Orchestrates detection, extraction and persistence
//! - `store`: JSON persistence of the extracted entities
//! - `config`: YAML settings schema
//! - `report`: Output formatting (pretty, JSON)
//!
//! # Adding a New Language
//!
//! See `src/analysis/languages/` for examples. Implement `LanguageFrontend`
//! and register it in `languages/mod.rs`.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod files;
pub mod logging;
pub mod model;
pub mod report;
pub mod runner;
pub mod services;
pub mod store;

pub use analysis::{
    extract, register_frontends, AnalysisContext, DepthPolicy, Extractor, LanguageFrontend,
    SignatureResolver, SyntaxTree,
};
pub use config::Settings;
pub use model::{Executable, Extraction, ServiceDescriptor, Type};
pub use runner::{AnalysisOutcome, AnalysisReport, Runner, ServiceSummary};
pub use services::ServiceDetector;
pub use store::{JsonStore, StoreError};

/// Initialize all subsystems.
///
/// Call this once at startup.
pub fn init() {
    register_frontends();
}
