//! AST-backed entity extraction.
//!
//! This module turns source files into Type and Executable records:
//! - front ends parse with tree-sitter and classify concrete nodes
//! - the lowered [`SyntaxTree`] keeps only declarations and scopes
//! - the [`Extractor`] walks it, names declarations and applies the depth policy
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source Files    │────▶│ Front ends   │────▶│ SyntaxTree    │
//! └─────────────────┘     │ (Go, Java..) │     │ (Namespace,   │
//!                         └──────────────┘     │  Type, Exec)  │
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ Extraction   │◀────│ Extractor     │
//!                         │ (records)    │     │ + ScopeChain  │
//!                         └──────────────┘     └───────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/` (e.g., `kotlin.rs`)
//! 2. Implement `LanguageFrontend` and map node kinds in `classify`
//! 3. Register the front end in `languages/mod.rs`
//!
//! See `languages/java.rs` for a reference implementation.

mod context;
mod extractor;
mod languages;
pub mod naming;
mod traits;
mod tree;

pub use context::{AnalysisContext, DepthPolicy};
pub use extractor::{extract, walk, DeclarationVisitor, Extractor};
pub use languages::{
    frontend_for_path, get_frontend, register_frontends, registered_extensions,
    registered_languages, CSharpFrontend, GoFrontend, JavaFrontend, JavaScriptFrontend,
    PythonFrontend, RubyFrontend, TypeScriptFrontend,
};
pub use traits::{LanguageFrontend, ParsedFile, SignatureResolver};
pub use tree::{
    ExecutableDecl, ExecutableRole, NodeId, NodeKind, PackageScope, SyntaxNode, SyntaxTree,
    TypeDecl, TypeFlavor,
};
