//! Core traits for language front ends.

use std::path::Path;

use super::tree::{NodeId, NodeKind, PackageScope, SyntaxTree};

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Kept separate from [`SyntaxTree`] so the concrete tree can be queried
/// (package clauses, file-scoped namespaces) before lowering.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific front end.
///
/// Each language (Java, Go, ...) implements this trait to turn source text
/// into a concrete tree and to classify concrete nodes into the
/// language-neutral [`NodeKind`] variants the extractor understands.
///
/// # Thread Safety
///
/// Note: tree_sitter::Parser is not Sync, so implementations create a parser
/// per call to [`LanguageFrontend::parse`].
pub trait LanguageFrontend: Send + Sync {
    /// Returns the language identifier (e.g., "go", "java").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this front end handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Returns an error only if no tree could be produced at all. Syntax
    /// errors still yield a tree containing ERROR nodes.
    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile>;

    /// Classify one named concrete node.
    fn classify(&self, node: tree_sitter::Node, source: &[u8]) -> NodeKind;

    /// Namespace declared for the whole file (Java `package`, C# file-scoped
    /// `namespace`). Empty when the file declares none.
    fn file_namespace(&self, _parsed: &ParsedFile) -> Vec<String> {
        Vec::new()
    }

    /// How the path-derived package prefix is built for this language.
    fn package_scope(&self) -> PackageScope {
        PackageScope::File
    }

    /// Check if this front end handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

/// Optional semantic signature lookup for executable declarations.
///
/// Implementations backed by a compiler or symbol table can return a richer
/// signature (resolved parameter types, generic arity). Returning `None`
/// makes the extractor fall back to the syntactic signature.
pub trait SignatureResolver: Send + Sync {
    fn resolve_signature(&self, tree: &SyntaxTree, node: NodeId) -> Option<String>;
}
