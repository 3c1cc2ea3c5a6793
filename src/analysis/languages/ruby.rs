//! Ruby front end using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node};

use super::helpers::{field_text, parse_source, split_qualified};
use crate::analysis::{
    ExecutableDecl, ExecutableRole, LanguageFrontend, NodeKind, ParsedFile, TypeDecl, TypeFlavor,
};

const INITIALIZER_NAME: &str = "initialize";
const SCOPE_RESOLUTION: &str = "::";

pub struct RubyFrontend {
    language: Language,
}

impl RubyFrontend {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_ruby::LANGUAGE.into(),
        }
    }
}

impl Default for RubyFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFrontend for RubyFrontend {
    fn language_id(&self) -> &'static str {
        "ruby"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        parse_source(&self.language, "Ruby", path, source)
    }

    fn classify(&self, node: Node, source: &[u8]) -> NodeKind {
        match node.kind() {
            "module" => match field_text(node, "name", source) {
                Some(name) => NodeKind::Namespace(split_qualified(&name, SCOPE_RESOLUTION)),
                None => NodeKind::Other,
            },
            "class" => match field_text(node, "name", source) {
                Some(name) => NodeKind::Type(TypeDecl::named(name, TypeFlavor::Class)),
                None => NodeKind::Other,
            },
            "method" | "singleton_method" => match field_text(node, "name", source) {
                Some(name) => {
                    let role = if name == INITIALIZER_NAME {
                        ExecutableRole::Constructor
                    } else {
                        ExecutableRole::Method
                    };
                    NodeKind::Executable(ExecutableDecl::named(name, role))
                }
                None => NodeKind::Other,
            },
            "lambda" => NodeKind::Executable(ExecutableDecl::anonymous()),
            _ => NodeKind::Other,
        }
    }
}
