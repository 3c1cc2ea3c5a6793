//! JavaScript front end using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{field_text, parse_source};
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, ParsedFile, TypeDecl, TypeFlavor,
};

/// Method name tree-sitter reports for class constructors.
const CONSTRUCTOR_NAME: &str = "constructor";

pub struct JavaScriptFrontend {
    language: Language,
}

impl JavaScriptFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl Default for JavaScriptFrontend {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify the declaration shapes JavaScript and TypeScript share.
pub(crate) fn classify_script(node: Node, source: &[u8]) -> NodeKind {
    match node.kind() {
        "class_declaration" | "class" => NodeKind::Type(TypeDecl {
            name: field_text(node, "name", source),
            arity: 0,
            flavor: TypeFlavor::Class,
        }),
        "function_declaration"
        | "generator_function_declaration"
        | "function_expression"
        | "function"
        | "generator_function"
        | "arrow_function" => NodeKind::Executable(ExecutableDecl {
            name: field_text(node, "name", source),
            ..ExecutableDecl::anonymous()
        }),
        "method_definition" => match field_text(node, "name", source) {
            Some(name) if name == CONSTRUCTOR_NAME => NodeKind::Executable(ExecutableDecl {
                name: None,
                role: ExecutableRole::Constructor,
                parameter_types: Vec::new(),
                receiver: None,
            }),
            Some(name) => NodeKind::Executable(ExecutableDecl::named(name, ExecutableRole::Method)),
            None => NodeKind::Executable(ExecutableDecl::anonymous()),
        },
        _ => NodeKind::Other,
    }
}

impl LanguageFrontend for JavaScriptFrontend {
    fn language_id(&self) -> &'static str {
        "javascript"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        parse_source(&self.language, "JavaScript", path, source)
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        classify_script(node, source)
    }
}
